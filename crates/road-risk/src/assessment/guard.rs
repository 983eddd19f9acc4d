use std::fmt;

use super::domain::{AssessmentMethod, AssessmentSubmission, OverrideRequest};
use crate::risk::{InvalidRiskLevel, RiskLevel};

/// Override fields that must be filled before an override can be saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideField {
    ProfessionalName,
    Designation,
    Justification,
}

impl OverrideField {
    pub const fn key(self) -> &'static str {
        match self {
            Self::ProfessionalName => "professionalName",
            Self::Designation => "designation",
            Self::Justification => "justification",
        }
    }
}

impl fmt::Display for OverrideField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Validation errors raised at the save boundary.
#[derive(Debug, thiserror::Error)]
pub enum SaveViolation {
    #[error("basic info is missing required field '{field}'")]
    MissingBasicInfo { field: &'static str },
    #[error("location ({latitude}, {longitude}) is not a valid WGS84 coordinate")]
    InvalidLocation { latitude: f64, longitude: f64 },
    #[error("site location is required")]
    MissingLocation,
    #[error("{method} assessment is incomplete; unrated: {}", .missing.join(", "))]
    IncompleteFactors {
        method: AssessmentMethod,
        missing: Vec<String>,
    },
    #[error("override is missing required field(s): {}", join_fields(.fields))]
    MissingOverrideFields { fields: Vec<OverrideField> },
    #[error("override level rejected: {0}")]
    InvalidOverrideLevel(#[from] InvalidRiskLevel),
}

fn join_fields(fields: &[OverrideField]) -> String {
    fields
        .iter()
        .map(|field| field.key())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Policy dial backing save validation.
#[derive(Debug, Clone, Default)]
pub struct SavePolicy {
    pub require_location: bool,
}

/// What the guard established about a submission it accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveClearance {
    pub override_level: Option<RiskLevel>,
}

/// Guard responsible for deciding whether a submission may be persisted.
#[derive(Debug, Clone, Default)]
pub struct SaveGuard {
    policy: SavePolicy,
}

impl SaveGuard {
    pub fn with_policy(policy: SavePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SavePolicy {
        &self.policy
    }

    pub fn check(&self, submission: &AssessmentSubmission) -> Result<SaveClearance, SaveViolation> {
        let info = &submission.basic_info;
        if info.road_name.trim().is_empty() {
            return Err(SaveViolation::MissingBasicInfo { field: "roadName" });
        }
        if info.assessor.trim().is_empty() {
            return Err(SaveViolation::MissingBasicInfo { field: "assessor" });
        }

        match info.location {
            Some(point) if !point.is_valid() => {
                return Err(SaveViolation::InvalidLocation {
                    latitude: point.latitude,
                    longitude: point.longitude,
                });
            }
            None if self.policy.require_location => return Err(SaveViolation::MissingLocation),
            _ => {}
        }

        let missing = submission.inputs.missing();
        if !missing.is_empty() {
            return Err(SaveViolation::IncompleteFactors {
                method: submission.inputs.method(),
                missing,
            });
        }

        let override_level = match &submission.override_request {
            Some(request) if request.enabled => Some(self.check_override(request)?),
            _ => None,
        };

        Ok(SaveClearance { override_level })
    }

    /// All three attribution fields are required; every blank one is reported.
    pub fn check_override(&self, request: &OverrideRequest) -> Result<RiskLevel, SaveViolation> {
        let fields: Vec<OverrideField> = [
            (OverrideField::ProfessionalName, &request.professional_name),
            (OverrideField::Designation, &request.designation),
            (OverrideField::Justification, &request.justification),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if !fields.is_empty() {
            return Err(SaveViolation::MissingOverrideFields { fields });
        }

        Ok(request.final_risk_level.parse::<RiskLevel>()?)
    }
}
