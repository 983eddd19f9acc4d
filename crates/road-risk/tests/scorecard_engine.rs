use road_risk::risk::{
    ConsequenceFactors, FactorRating, HazardFactors, RiskLevel, ScoreBand, ScorecardEngine,
    ScorecardInputs,
};

const RATINGS: [FactorRating; 4] = [
    FactorRating::Low,
    FactorRating::Moderate,
    FactorRating::High,
    FactorRating::VeryHigh,
];

#[test]
fn concrete_scorecard_scenarios() {
    let engine = ScorecardEngine;

    let minimum = engine.calculate_initial_risk(10, 8);
    assert_eq!(minimum.risk_score, 80);
    assert_eq!(minimum.risk_level, RiskLevel::Low);

    let maximum = engine.calculate_initial_risk(50, 40);
    assert_eq!(maximum.risk_score, 2000);
    assert_eq!(maximum.risk_level, RiskLevel::VeryHigh);

    let boundary = engine.calculate_initial_risk(25, 30);
    assert_eq!(boundary.risk_score, 750);
    assert_eq!(boundary.risk_level, RiskLevel::Moderate);
    assert_eq!(
        engine.calculate_initial_risk(751, 1).risk_level,
        RiskLevel::High
    );
}

#[test]
fn every_valid_pair_is_multiplicative_and_deterministic() {
    let engine = ScorecardEngine;

    for hazard in 10..=50u32 {
        for consequence in 8..=40u32 {
            let first = engine.calculate_initial_risk(hazard, consequence);
            let second = engine.calculate_initial_risk(hazard, consequence);

            assert_eq!(first, second, "non-deterministic at {hazard}x{consequence}");
            assert_eq!(first.risk_score, u64::from(hazard) * u64::from(consequence));
            assert!(first.validation.valid);
            assert_eq!(first.overrides.final_risk, first.risk_level);
            assert!(!first.overrides.is_overridden);
        }
    }
}

#[test]
fn bands_partition_the_score_range() {
    let engine = ScorecardEngine;
    let mut previous = RiskLevel::Low;

    for score in 0..=2000u32 {
        let level = engine.calculate_initial_risk(score, 1).risk_level;
        let expected = match score {
            0..=250 => RiskLevel::Low,
            251..=750 => RiskLevel::Moderate,
            751..=1400 => RiskLevel::High,
            _ => RiskLevel::VeryHigh,
        };
        assert_eq!(level, expected, "score {score}");
        assert!(level >= previous, "bands must be monotonic at {score}");
        previous = level;
    }
}

#[test]
fn out_of_range_totals_are_flagged_but_still_classified() {
    let result = ScorecardEngine.calculate_initial_risk(60, 5);

    assert!(!result.validation.valid);
    assert_eq!(result.validation.issues.len(), 2);
    assert_eq!(result.risk_score, 300);
    assert_eq!(result.risk_level, RiskLevel::Moderate);
}

#[test]
fn factor_totals_feed_the_multiplication() {
    let engine = ScorecardEngine;

    for &hazard_rating in &RATINGS {
        for &consequence_rating in &RATINGS {
            let hazard = HazardFactors {
                terrain_stability: hazard_rating,
                slope_grade: FactorRating::Low,
                geology: FactorRating::Low,
                drainage_provision: FactorRating::Low,
                failure_history: hazard_rating,
            };
            let consequence = ConsequenceFactors {
                proximity_to_water: consequence_rating,
                downstream_infrastructure: FactorRating::Low,
                public_use: FactorRating::Low,
                environmental_value: consequence_rating,
            };

            let result = engine.calculate_from_factors(&hazard, &consequence);
            assert_eq!(result.hazard_score, hazard.total());
            assert_eq!(result.consequence_score, consequence.total());
            assert_eq!(
                result.risk_score,
                u64::from(hazard.total()) * u64::from(consequence.total())
            );
        }
    }
}

#[test]
fn incomplete_inputs_produce_no_result() {
    let engine = ScorecardEngine;
    let mut inputs = ScorecardInputs {
        hazard_factors: HazardFactors {
            terrain_stability: FactorRating::High,
            slope_grade: FactorRating::High,
            geology: FactorRating::High,
            drainage_provision: FactorRating::High,
            failure_history: FactorRating::High,
        }
        .into(),
        consequence_factors: ConsequenceFactors {
            proximity_to_water: FactorRating::High,
            downstream_infrastructure: FactorRating::High,
            public_use: FactorRating::High,
            environmental_value: FactorRating::High,
        }
        .into(),
    };
    assert!(engine.calculate(&inputs).is_some());

    inputs.consequence_factors.environmental_value = None;
    assert!(engine.calculate(&inputs).is_none());
    assert_eq!(
        inputs.missing(),
        vec!["consequenceFactors.environmentalValue".to_string()]
    );
}

#[test]
fn descriptive_bands_follow_totals() {
    let result = ScorecardEngine.calculate_initial_risk(50, 8);

    assert_eq!(result.hazard_band, ScoreBand::for_hazard(50));
    assert_eq!(result.consequence_band, ScoreBand::for_consequence(8));
    assert!(!result.hazard_description.is_empty());
    assert!(!result.consequence_description.is_empty());
    assert!(result.reasoning.contains("400"));
}

#[test]
fn factor_weights_reject_unknown_values_on_the_wire() {
    let parsed: Result<ScorecardInputs, _> =
        serde_json::from_str(r#"{"hazardFactors":{"slopeGrade":3}}"#);
    assert!(parsed.is_err());

    let parsed: ScorecardInputs =
        serde_json::from_str(r#"{"hazardFactors":{"slopeGrade":10}}"#).expect("valid weight");
    assert_eq!(
        parsed.hazard_factors.slope_grade,
        Some(FactorRating::VeryHigh)
    );
}
