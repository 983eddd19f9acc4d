use super::super::level::RiskLevel;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const HAZARD_RANGE: RangeInclusive<u32> = 10..=50;
pub const CONSEQUENCE_RANGE: RangeInclusive<u32> = 8..=40;
pub const RISK_SCORE_RANGE: RangeInclusive<u64> = 80..=2000;

/// Upper bound (inclusive) of each band below Very High.
const LOW_MAX: u64 = 250;
const MODERATE_MAX: u64 = 750;
const HIGH_MAX: u64 = 1400;

/// Map a hazard × consequence product onto its band. Scores under 80 stay Low.
pub fn risk_level_for(risk_score: u64) -> RiskLevel {
    if risk_score <= LOW_MAX {
        RiskLevel::Low
    } else if risk_score <= MODERATE_MAX {
        RiskLevel::Moderate
    } else if risk_score <= HIGH_MAX {
        RiskLevel::High
    } else {
        RiskLevel::VeryHigh
    }
}

/// Nominal score range for a band, as printed on the methodology card.
pub const fn band_range(level: RiskLevel) -> (u64, u64) {
    match level {
        RiskLevel::Low => (80, LOW_MAX),
        RiskLevel::Moderate => (LOW_MAX + 1, MODERATE_MAX),
        RiskLevel::High => (MODERATE_MAX + 1, HIGH_MAX),
        RiskLevel::VeryHigh => (HIGH_MAX + 1, 2000),
    }
}

pub(crate) const fn band_summary(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => {
            "Failure is unlikely or would have limited impact; routine inspection cycles are adequate."
        }
        RiskLevel::Moderate => {
            "Conditions could produce a failure with noticeable impact; increase inspection frequency."
        }
        RiskLevel::High => {
            "Failure is likely or would cause significant damage; plan mitigation works."
        }
        RiskLevel::VeryHigh => {
            "Failure is probable with severe consequences; intervene before the next storm season."
        }
    }
}

/// Descriptive band for a single sub-score, used for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScoreBand {
    #[serde(rename = "very low")]
    VeryLow,
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "moderate")]
    Moderate,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "very high")]
    VeryHigh,
}

impl ScoreBand {
    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryLow => "very low",
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
            Self::VeryHigh => "very high",
        }
    }

    pub fn for_hazard(hazard_score: u32) -> Self {
        match hazard_score {
            0..=14 => Self::VeryLow,
            15..=19 => Self::Low,
            20..=29 => Self::Moderate,
            30..=39 => Self::High,
            _ => Self::VeryHigh,
        }
    }

    pub fn for_consequence(consequence_score: u32) -> Self {
        match consequence_score {
            0..=11 => Self::VeryLow,
            12..=15 => Self::Low,
            16..=23 => Self::Moderate,
            24..=31 => Self::High,
            _ => Self::VeryHigh,
        }
    }

    pub(crate) const fn hazard_description(self) -> &'static str {
        match self {
            Self::VeryLow => "Very low hazard: stable terrain with no signs of instability",
            Self::Low => "Low hazard: minor instability indicators, adequate drainage",
            Self::Moderate => "Moderate hazard: some instability indicators or drainage concerns",
            Self::High => "High hazard: clear instability indicators on steep or weak ground",
            Self::VeryHigh => "Very high hazard: active movement or repeated past failures",
        }
    }

    pub(crate) const fn consequence_description(self) -> &'static str {
        match self {
            Self::VeryLow => "Very low consequence: isolated site with little downstream exposure",
            Self::Low => "Low consequence: limited exposure of water, infrastructure or users",
            Self::Moderate => "Moderate consequence: nearby watercourses or regular road use",
            Self::High => "High consequence: sensitive streams, structures or public traffic at risk",
            Self::VeryHigh => "Very high consequence: critical infrastructure, fish habitat or heavy public use",
        }
    }
}

/// Non-fatal range diagnostics attached to every scorecard result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreValidation {
    pub valid: bool,
    #[serde(default)]
    pub issues: Vec<String>,
}

pub fn validate_scores(hazard_score: u32, consequence_score: u32) -> ScoreValidation {
    let mut issues = Vec::new();

    if !HAZARD_RANGE.contains(&hazard_score) {
        issues.push(format!(
            "hazard score {hazard_score} is outside the expected range {}-{}",
            HAZARD_RANGE.start(),
            HAZARD_RANGE.end()
        ));
    }

    if !CONSEQUENCE_RANGE.contains(&consequence_score) {
        issues.push(format!(
            "consequence score {consequence_score} is outside the expected range {}-{}",
            CONSEQUENCE_RANGE.start(),
            CONSEQUENCE_RANGE.end()
        ));
    }

    ScoreValidation {
        valid: issues.is_empty(),
        issues,
    }
}

pub const fn management_recommendations(level: RiskLevel) -> &'static [&'static str] {
    match level {
        RiskLevel::Low => &[
            "Continue routine maintenance on the standard schedule",
            "Inspect drainage structures during scheduled patrols",
            "Record observations for trend monitoring",
        ],
        RiskLevel::Moderate => &[
            "Increase inspection frequency, including after major storms",
            "Clear and maintain ditches, culverts and cross-drains",
            "Monitor cut and fill slopes for tension cracks or seepage",
            "Schedule minor drainage improvements",
        ],
        RiskLevel::High => &[
            "Prepare a site-specific management plan",
            "Install or upgrade drainage to control surface water",
            "Consider slope stabilization or load reduction on fill slopes",
            "Restrict heavy traffic during and after wet weather",
            "Engage a qualified professional for field review",
        ],
        RiskLevel::VeryHigh => &[
            "Take immediate action to reduce risk",
            "Consider temporary road closure or traffic restrictions",
            "Obtain a professional geotechnical assessment",
            "Implement engineered stabilization or road deactivation",
            "Notify downstream water users and infrastructure owners",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_switch_at_inclusive_upper_bounds() {
        assert_eq!(risk_level_for(80), RiskLevel::Low);
        assert_eq!(risk_level_for(250), RiskLevel::Low);
        assert_eq!(risk_level_for(251), RiskLevel::Moderate);
        assert_eq!(risk_level_for(750), RiskLevel::Moderate);
        assert_eq!(risk_level_for(751), RiskLevel::High);
        assert_eq!(risk_level_for(1400), RiskLevel::High);
        assert_eq!(risk_level_for(1401), RiskLevel::VeryHigh);
        assert_eq!(risk_level_for(2000), RiskLevel::VeryHigh);
    }

    #[test]
    fn scores_below_the_band_floor_classify_low() {
        assert_eq!(risk_level_for(0), RiskLevel::Low);
        assert_eq!(risk_level_for(79), RiskLevel::Low);
    }

    #[test]
    fn bands_partition_the_full_score_range() {
        let mut previous = RiskLevel::Low;
        for score in 0..=2000u64 {
            let level = risk_level_for(score);
            assert!(level >= previous, "bands must be monotonic at {score}");
            if score >= 80 {
                let (low, high) = band_range(level);
                assert!((low..=high).contains(&score), "{score} outside {level} range");
            }
            previous = level;
        }
    }

    #[test]
    fn hazard_sub_bands() {
        assert_eq!(ScoreBand::for_hazard(10), ScoreBand::VeryLow);
        assert_eq!(ScoreBand::for_hazard(14), ScoreBand::VeryLow);
        assert_eq!(ScoreBand::for_hazard(15), ScoreBand::Low);
        assert_eq!(ScoreBand::for_hazard(19), ScoreBand::Low);
        assert_eq!(ScoreBand::for_hazard(20), ScoreBand::Moderate);
        assert_eq!(ScoreBand::for_hazard(30), ScoreBand::High);
        assert_eq!(ScoreBand::for_hazard(39), ScoreBand::High);
        assert_eq!(ScoreBand::for_hazard(40), ScoreBand::VeryHigh);
    }

    #[test]
    fn consequence_sub_bands() {
        assert_eq!(ScoreBand::for_consequence(8), ScoreBand::VeryLow);
        assert_eq!(ScoreBand::for_consequence(12), ScoreBand::Low);
        assert_eq!(ScoreBand::for_consequence(15), ScoreBand::Low);
        assert_eq!(ScoreBand::for_consequence(16), ScoreBand::Moderate);
        assert_eq!(ScoreBand::for_consequence(23), ScoreBand::Moderate);
        assert_eq!(ScoreBand::for_consequence(24), ScoreBand::High);
        assert_eq!(ScoreBand::for_consequence(32), ScoreBand::VeryHigh);
    }

    #[test]
    fn validation_reports_each_out_of_range_total() {
        assert_eq!(
            validate_scores(10, 8),
            ScoreValidation {
                valid: true,
                issues: Vec::new()
            }
        );

        let report = validate_scores(9, 41);
        assert!(!report.valid);
        assert_eq!(report.issues.len(), 2);
        assert!(report.issues[0].contains("hazard score 9"));
        assert!(report.issues[1].contains("consequence score 41"));
    }

    #[test]
    fn every_level_has_recommendations() {
        for level in RiskLevel::ordered() {
            assert!(!management_recommendations(level).is_empty());
        }
    }
}
