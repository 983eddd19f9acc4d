use super::common::*;
use crate::assessment::domain::{AssessmentMethod, GeoPoint, MethodInputs};
use crate::assessment::guard::{OverrideField, SaveGuard, SavePolicy, SaveViolation};
use crate::risk::{LmhInputs, LmhLabel, RiskLevel, ScorecardInputs};

#[test]
fn accepts_complete_submission_without_override() {
    let clearance = guard()
        .check(&low_scorecard_submission())
        .expect("complete submission passes");
    assert_eq!(clearance.override_level, None);
}

#[test]
fn disabled_override_section_is_ignored() {
    let mut submission = low_scorecard_submission();
    let mut request = override_request("High");
    request.enabled = false;
    request.professional_name.clear();
    submission.override_request = Some(request);

    let clearance = guard().check(&submission).expect("disabled override ignored");
    assert_eq!(clearance.override_level, None);
}

#[test]
fn rejects_blank_road_name() {
    let mut submission = low_scorecard_submission();
    submission.basic_info.road_name = "   ".to_string();

    match guard().check(&submission) {
        Err(SaveViolation::MissingBasicInfo { field }) => assert_eq!(field, "roadName"),
        other => panic!("expected missing road name, got {other:?}"),
    }
}

#[test]
fn rejects_out_of_range_coordinates() {
    let mut submission = low_scorecard_submission();
    submission.basic_info.location = Some(GeoPoint {
        latitude: 91.0,
        longitude: -123.0,
        accuracy_m: None,
    });

    assert!(matches!(
        guard().check(&submission),
        Err(SaveViolation::InvalidLocation { .. })
    ));
}

#[test]
fn location_required_only_when_policy_says_so() {
    let mut submission = low_scorecard_submission();
    submission.basic_info.location = None;

    assert!(guard().check(&submission).is_ok());

    let strict = SaveGuard::with_policy(SavePolicy {
        require_location: true,
    });
    assert!(strict.policy().require_location);
    assert!(matches!(
        strict.check(&submission),
        Err(SaveViolation::MissingLocation)
    ));
}

#[test]
fn incomplete_scorecard_lists_unrated_factors() {
    let mut inputs = uniform_scorecard(crate::risk::FactorRating::Moderate);
    inputs.hazard_factors.failure_history = None;
    inputs.consequence_factors.public_use = None;
    let mut submission = low_scorecard_submission();
    submission.inputs = MethodInputs::Scorecard(inputs);

    match guard().check(&submission) {
        Err(SaveViolation::IncompleteFactors { method, missing }) => {
            assert_eq!(method, AssessmentMethod::Scorecard);
            assert_eq!(
                missing,
                vec![
                    "hazardFactors.failureHistory".to_string(),
                    "consequenceFactors.publicUse".to_string(),
                ]
            );
        }
        other => panic!("expected incomplete factors, got {other:?}"),
    }
}

#[test]
fn empty_scorecard_is_incomplete() {
    let mut submission = low_scorecard_submission();
    submission.inputs = MethodInputs::Scorecard(ScorecardInputs::default());

    match guard().check(&submission) {
        Err(SaveViolation::IncompleteFactors { missing, .. }) => assert_eq!(missing.len(), 9),
        other => panic!("expected incomplete factors, got {other:?}"),
    }
}

#[test]
fn incomplete_lmh_names_missing_axis() {
    let mut submission = lmh_submission(LmhLabel::High, LmhLabel::High);
    submission.inputs = MethodInputs::Lmh(LmhInputs {
        likelihood: Some(LmhLabel::High),
        consequence: None,
    });

    match guard().check(&submission) {
        Err(SaveViolation::IncompleteFactors { method, missing }) => {
            assert_eq!(method, AssessmentMethod::Lmh);
            assert_eq!(missing, vec!["consequence".to_string()]);
        }
        other => panic!("expected incomplete factors, got {other:?}"),
    }
}

#[test]
fn override_with_full_attribution_is_cleared() {
    let clearance = guard()
        .check(&overridden_submission("High"))
        .expect("override passes");
    assert_eq!(clearance.override_level, Some(RiskLevel::High));
}

#[test]
fn override_requires_each_attribution_field() {
    let blankers: [(OverrideField, fn(&mut crate::assessment::OverrideRequest)); 3] = [
        (OverrideField::ProfessionalName, |request| {
            request.professional_name.clear()
        }),
        (OverrideField::Designation, |request| {
            request.designation = "  ".to_string()
        }),
        (OverrideField::Justification, |request| {
            request.justification.clear()
        }),
    ];

    for (field, blank) in blankers {
        let mut request = override_request("High");
        blank(&mut request);

        match guard().check_override(&request) {
            Err(SaveViolation::MissingOverrideFields { fields }) => {
                assert_eq!(fields, vec![field]);
            }
            other => panic!("expected missing {field}, got {other:?}"),
        }
    }
}

#[test]
fn override_reports_every_blank_field() {
    let mut request = override_request("High");
    request.professional_name.clear();
    request.designation.clear();
    request.justification.clear();

    match guard().check_override(&request) {
        Err(error @ SaveViolation::MissingOverrideFields { .. }) => {
            let message = error.to_string();
            assert!(message.contains("professionalName"));
            assert!(message.contains("designation"));
            assert!(message.contains("justification"));
        }
        other => panic!("expected missing fields, got {other:?}"),
    }
}

#[test]
fn override_level_must_be_a_known_label() {
    match guard().check_override(&override_request("Extreme")) {
        Err(SaveViolation::InvalidOverrideLevel(error)) => {
            assert_eq!(error.value, "Extreme");
            assert!(error.to_string().contains("Very High"));
        }
        other => panic!("expected invalid override level, got {other:?}"),
    }
}
