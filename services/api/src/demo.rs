use crate::infra::{parse_date, parse_lmh_label, parse_rating, parse_risk_level, LocalAssessmentStore};
use chrono::{Local, NaiveDate, Utc};
use clap::Args;
use road_risk::assessment::{
    render, AssessmentMethod, AssessmentRecord, AssessmentService, AssessmentServiceError,
    AssessmentSubmission, BasicInfo, ExportError, ExportFormat, GeoPoint, MethodInputs,
    OverrideRequest, PhotoReference, RiskOutcome,
};
use road_risk::config::AppConfig;
use road_risk::error::AppError;
use road_risk::risk::{
    apply_override_at, ConsequenceFactorInputs, FactorRating, HazardFactorInputs, LmhEngine,
    LmhInputs, LmhLabel, LmhResult, Overridable, RiskLevel, RiskResult, ScorecardEngine,
    ScorecardInputs,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct ClassifyScorecardArgs {
    /// Hazard total (10-50). Use with --consequence-score instead of factor ratings.
    #[arg(long, requires = "consequence_score")]
    pub(crate) hazard_score: Option<u32>,
    /// Consequence total (8-40).
    #[arg(long, requires = "hazard_score")]
    pub(crate) consequence_score: Option<u32>,
    #[arg(long, value_parser = parse_rating)]
    pub(crate) terrain_stability: Option<FactorRating>,
    #[arg(long, value_parser = parse_rating)]
    pub(crate) slope_grade: Option<FactorRating>,
    #[arg(long, value_parser = parse_rating)]
    pub(crate) geology: Option<FactorRating>,
    #[arg(long, value_parser = parse_rating)]
    pub(crate) drainage_provision: Option<FactorRating>,
    #[arg(long, value_parser = parse_rating)]
    pub(crate) failure_history: Option<FactorRating>,
    #[arg(long, value_parser = parse_rating)]
    pub(crate) proximity_to_water: Option<FactorRating>,
    #[arg(long, value_parser = parse_rating)]
    pub(crate) downstream_infrastructure: Option<FactorRating>,
    #[arg(long, value_parser = parse_rating)]
    pub(crate) public_use: Option<FactorRating>,
    #[arg(long, value_parser = parse_rating)]
    pub(crate) environmental_value: Option<FactorRating>,
    #[command(flatten)]
    pub(crate) judgment: JudgmentArgs,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl ClassifyScorecardArgs {
    fn inputs(&self) -> ScorecardInputs {
        ScorecardInputs {
            hazard_factors: HazardFactorInputs {
                terrain_stability: self.terrain_stability,
                slope_grade: self.slope_grade,
                geology: self.geology,
                drainage_provision: self.drainage_provision,
                failure_history: self.failure_history,
            },
            consequence_factors: ConsequenceFactorInputs {
                proximity_to_water: self.proximity_to_water,
                downstream_infrastructure: self.downstream_infrastructure,
                public_use: self.public_use,
                environmental_value: self.environmental_value,
            },
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ClassifyLmhArgs {
    /// Likelihood label: very-low, low, moderate or high
    #[arg(long, value_parser = parse_lmh_label)]
    pub(crate) likelihood: LmhLabel,
    /// Consequence label: very-low, low, moderate or high
    #[arg(long, value_parser = parse_lmh_label)]
    pub(crate) consequence: LmhLabel,
    #[command(flatten)]
    pub(crate) judgment: JudgmentArgs,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

/// Optional professional override applied to a classification preview.
#[derive(Args, Debug, Default)]
pub(crate) struct JudgmentArgs {
    /// Replace the calculated level: low, moderate, high or very-high
    #[arg(long = "override", value_parser = parse_risk_level, requires = "justification")]
    pub(crate) override_level: Option<RiskLevel>,
    /// Reason recorded with the override
    #[arg(long)]
    pub(crate) justification: Option<String>,
}

impl JudgmentArgs {
    fn apply<T: Overridable>(&self, result: T) -> T {
        match self.override_level {
            Some(level) => apply_override_at(
                &result,
                level,
                self.justification.as_deref().unwrap_or_default(),
                Utc::now(),
            ),
            None => result,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// json, csv or geojson
    #[arg(long, default_value = "csv")]
    pub(crate) format: String,
    /// Assessment store file (defaults to ASSESSMENT_STORE_PATH)
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,
    /// Write to this file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Assessment store file. The demo uses an in-memory store when omitted.
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,
    /// Assessment date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) assessed_on: Option<NaiveDate>,
    /// Print an export of the demo records at the end (json, csv or geojson)
    #[arg(long)]
    pub(crate) export: Option<String>,
}

pub(crate) fn run_classify_scorecard(args: ClassifyScorecardArgs) -> Result<(), AppError> {
    let engine = ScorecardEngine;
    let result = match (args.hazard_score, args.consequence_score) {
        (Some(hazard), Some(consequence)) => Some(engine.calculate_initial_risk(hazard, consequence)),
        _ => engine.calculate(&args.inputs()),
    };

    let Some(result) = result else {
        print_incomplete(&args.inputs().missing());
        return Ok(());
    };
    let result = args.judgment.apply(result);

    if args.json {
        return print_json(&result);
    }
    render_scorecard(&result);
    Ok(())
}

pub(crate) fn run_classify_lmh(args: ClassifyLmhArgs) -> Result<(), AppError> {
    let engine = LmhEngine;
    let result = args
        .judgment
        .apply(engine.classify_pair(args.likelihood, args.consequence));

    if args.json {
        return print_json(&result);
    }
    render_lmh(&result);
    match engine.field_guidance(Some(args.likelihood), Some(args.consequence)) {
        Some(guidance) => println!("Field guidance: {}", guidance.message),
        None => println!("Field guidance: not available for Very Low ratings"),
    }
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let format = ExportFormat::from_key(&args.format)?;
    let config = AppConfig::load()?;
    let Some(path) = args.store.or(config.assessment.store_path) else {
        eprintln!("no assessment store configured; pass --store or set ASSESSMENT_STORE_PATH");
        return Ok(());
    };

    let store = LocalAssessmentStore::open(path).map_err(AssessmentServiceError::from)?;
    let service = AssessmentService::new(Arc::new(store));
    let records = service.list()?;
    let body = render(format, &records)?;

    match args.output {
        Some(output) => {
            std::fs::write(&output, body)?;
            println!(
                "Exported {} assessment(s) to {}",
                records.len(),
                output.display()
            );
        }
        None => std::io::stdout().write_all(&body)?,
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        store,
        assessed_on,
        export,
    } = args;

    let config = AppConfig::load()?;
    let assessed_on = assessed_on.unwrap_or_else(|| Local::now().date_naive());
    let store = LocalAssessmentStore::from_path(store.as_deref())
        .map_err(AssessmentServiceError::from)?;
    let service = AssessmentService::new(Arc::new(store));

    println!("Forest road risk assessment demo");
    println!(
        "Default method: {}",
        config.assessment.default_method.label()
    );

    for submission in walkthrough_submissions(config.assessment.default_method, assessed_on) {
        let record = service.save(submission)?;
        println!();
        render_record(&record);
    }

    println!("\nProfessional override");
    let mut unattributed = override_submission(assessed_on);
    if let Some(request) = unattributed.override_request.as_mut() {
        request.designation.clear();
    }
    match service.save(unattributed) {
        Err(AssessmentServiceError::Violation(violation)) => {
            println!("- rejected without attribution: {violation}")
        }
        Err(other) => return Err(other.into()),
        Ok(record) => println!("- unexpectedly saved {}", record.id.0),
    }

    let overridden = service.save(override_submission(assessed_on))?;
    render_record(&overridden);

    let reset = service.reset_override(&overridden.id)?;
    println!(
        "- override reset: {} is back to {} ({})",
        reset.id.0,
        reset.outcome.final_risk(),
        reset.status().label()
    );

    println!("\nSaved assessments");
    for record in service.list()? {
        let view = record.summary_view();
        println!(
            "- {} | {} | {} | final {} ({}) | {}",
            view.assessment_id.0,
            view.road_name,
            view.method.label(),
            view.final_risk,
            view.final_color,
            view.priority
        );
    }

    if let Some(format) = export {
        let format = ExportFormat::from_key(&format)?;
        let body = render(format, &service.list()?)?;
        println!("\nExport ({})", format.extension());
        std::io::stdout().write_all(&body)?;
        println!();
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let encoded = serde_json::to_string_pretty(value).map_err(ExportError::from)?;
    println!("{encoded}");
    Ok(())
}

fn print_incomplete(missing: &[String]) {
    println!("Incomplete: rate every factor before classifying");
    for name in missing {
        println!("- {name}");
    }
}

fn render_scorecard(result: &RiskResult) {
    println!(
        "Hazard {} ({}) x consequence {} ({}) = {}",
        result.hazard_score,
        result.hazard_band.label(),
        result.consequence_score,
        result.consequence_band.label(),
        result.risk_score
    );
    println!("Calculated risk: {}", result.risk_level);
    println!("{}", result.reasoning);
    render_final(result);
    for issue in &result.validation.issues {
        println!("Warning: {issue}");
    }
    println!("Recommended actions:");
    for action in ScorecardEngine.management_recommendations(result.final_risk()) {
        println!("- {action}");
    }
}

fn render_lmh(result: &LmhResult) {
    println!(
        "Likelihood {} x consequence {} = class {}",
        result.likelihood, result.consequence, result.risk_class
    );
    println!("Calculated risk: {}", result.risk_level);
    render_final(result);
}

fn render_final<T: Overridable>(result: &T) {
    let state = result.override_state();
    println!(
        "Final risk: {} ({}) | {}",
        state.final_risk,
        state.final_color,
        state.final_risk.priority()
    );
    if let Some(details) = &state.override_details {
        println!(
            "Overridden from {} to {} at {}",
            details.original_risk,
            details.override_risk,
            details.timestamp.to_rfc3339()
        );
    }
}

fn render_record(record: &AssessmentRecord) {
    println!(
        "{} | {} | {} | {}",
        record.id.0,
        record.basic_info.road_name,
        record.method().label(),
        record.status().label()
    );
    match &record.outcome {
        RiskOutcome::Scorecard(result) => render_scorecard(result),
        RiskOutcome::Lmh(result) => render_lmh(result),
    }
    if let Some(audit) = &record.override_record {
        println!(
            "Override by {} ({}): {}",
            audit.professional_name, audit.designation, audit.justification
        );
    }
}

fn basic_info(road_name: &str, assessed_on: NaiveDate, location: GeoPoint) -> BasicInfo {
    BasicInfo {
        road_name: road_name.to_string(),
        road_section: Some("km 0.0 - 2.5".to_string()),
        district: Some("Chilliwack".to_string()),
        assessor: "Field Crew 3".to_string(),
        assessed_on,
        location: Some(location),
        weather_conditions: Some("Showers overnight".to_string()),
    }
}

/// Both methods, the configured default first.
fn walkthrough_submissions(
    default_method: AssessmentMethod,
    assessed_on: NaiveDate,
) -> Vec<AssessmentSubmission> {
    let mut submissions = vec![
        scorecard_submission(assessed_on),
        lmh_submission(assessed_on),
    ];
    if default_method == AssessmentMethod::Lmh {
        submissions.reverse();
    }
    submissions
}

fn scorecard_submission(assessed_on: NaiveDate) -> AssessmentSubmission {
    AssessmentSubmission {
        basic_info: basic_info(
            "Foley Creek FSR",
            assessed_on,
            GeoPoint {
                latitude: 49.1208,
                longitude: -121.6412,
                accuracy_m: Some(6.0),
            },
        ),
        inputs: MethodInputs::Scorecard(ScorecardInputs {
            hazard_factors: HazardFactorInputs {
                terrain_stability: Some(FactorRating::High),
                slope_grade: Some(FactorRating::High),
                geology: Some(FactorRating::Moderate),
                drainage_provision: Some(FactorRating::VeryHigh),
                failure_history: Some(FactorRating::Moderate),
            },
            consequence_factors: ConsequenceFactorInputs {
                proximity_to_water: Some(FactorRating::VeryHigh),
                downstream_infrastructure: Some(FactorRating::Moderate),
                public_use: Some(FactorRating::High),
                environmental_value: Some(FactorRating::High),
            },
        }),
        override_request: None,
        field_notes: "Blocked ditch line at km 1.8; fill slope saturated.".to_string(),
        photos: vec![PhotoReference {
            file_name: "foley-km1_8-ditch.jpg".to_string(),
            caption: Some("Blocked ditch inlet".to_string()),
            captured_at: None,
        }],
    }
}

fn lmh_submission(assessed_on: NaiveDate) -> AssessmentSubmission {
    AssessmentSubmission {
        basic_info: basic_info(
            "Tamihi Mainline",
            assessed_on,
            GeoPoint {
                latitude: 49.0712,
                longitude: -121.8274,
                accuracy_m: None,
            },
        ),
        inputs: MethodInputs::Lmh(LmhInputs {
            likelihood: Some(LmhLabel::Moderate),
            consequence: Some(LmhLabel::High),
        }),
        override_request: None,
        field_notes: String::new(),
        photos: Vec::new(),
    }
}

fn override_submission(assessed_on: NaiveDate) -> AssessmentSubmission {
    AssessmentSubmission {
        basic_info: basic_info(
            "Chipmunk Creek Spur",
            assessed_on,
            GeoPoint {
                latitude: 49.0415,
                longitude: -121.7033,
                accuracy_m: Some(3.0),
            },
        ),
        inputs: MethodInputs::Lmh(LmhInputs {
            likelihood: Some(LmhLabel::Low),
            consequence: Some(LmhLabel::Low),
        }),
        override_request: Some(OverrideRequest {
            enabled: true,
            final_risk_level: "High".to_string(),
            professional_name: "A. Okafor".to_string(),
            designation: "P.Eng.".to_string(),
            justification: "Fresh scarp above the road prism not reflected in the ratings."
                .to_string(),
        }),
        field_notes: "Scarp roughly 12 m upslope of the outside edge.".to_string(),
        photos: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walkthrough_starts_with_the_configured_method() {
        let assessed_on = NaiveDate::from_ymd_opt(2025, 9, 2).expect("valid date");

        let lmh_first = walkthrough_submissions(AssessmentMethod::Lmh, assessed_on);
        assert!(matches!(lmh_first[0].inputs, MethodInputs::Lmh(_)));
        assert!(matches!(lmh_first[1].inputs, MethodInputs::Scorecard(_)));

        let scorecard_first = walkthrough_submissions(AssessmentMethod::Scorecard, assessed_on);
        assert!(matches!(scorecard_first[0].inputs, MethodInputs::Scorecard(_)));
        assert_eq!(scorecard_first.len(), 2);
    }
}
