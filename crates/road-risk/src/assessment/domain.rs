use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::risk::{
    apply_override_at, reset_override, LmhEngine, LmhInputs, LmhResult, Overridable,
    OverrideState, RiskLevel, RiskResult, RiskStatus, ScorecardEngine, ScorecardInputs,
};

/// Identifier wrapper for saved assessments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

/// WGS84 position captured at the site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_m: Option<f64>,
}

impl GeoPoint {
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Site and assessor details from the first form section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    pub road_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub road_section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    pub assessor: String,
    pub assessed_on: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_conditions: Option<String>,
}

/// Photo taken in the field. Only the reference is kept; the file lives elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoReference {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentMethod {
    Scorecard,
    Lmh,
}

impl AssessmentMethod {
    pub fn from_key(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "scorecard" | "matrix" => Some(Self::Scorecard),
            "lmh" => Some(Self::Lmh),
            _ => None,
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Scorecard => "scorecard",
            Self::Lmh => "lmh",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Scorecard => "Scorecard",
            Self::Lmh => "Likelihood x Consequence",
        }
    }
}

impl std::fmt::Display for AssessmentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Factor payload for whichever method the assessor picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum MethodInputs {
    Scorecard(ScorecardInputs),
    Lmh(LmhInputs),
}

impl MethodInputs {
    pub const fn method(&self) -> AssessmentMethod {
        match self {
            Self::Scorecard(_) => AssessmentMethod::Scorecard,
            Self::Lmh(_) => AssessmentMethod::Lmh,
        }
    }

    pub fn missing(&self) -> Vec<String> {
        match self {
            Self::Scorecard(inputs) => inputs.missing(),
            Self::Lmh(inputs) => inputs.missing(),
        }
    }

    /// Run the matching engine; `None` while the factor set is incomplete.
    pub fn classify(&self) -> Option<RiskOutcome> {
        match self {
            Self::Scorecard(inputs) => ScorecardEngine.calculate(inputs).map(RiskOutcome::Scorecard),
            Self::Lmh(inputs) => LmhEngine.classify_inputs(inputs).map(RiskOutcome::Lmh),
        }
    }
}

/// Engine output for either method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum RiskOutcome {
    Scorecard(RiskResult),
    Lmh(LmhResult),
}

impl RiskOutcome {
    pub const fn method(&self) -> AssessmentMethod {
        match self {
            Self::Scorecard(_) => AssessmentMethod::Scorecard,
            Self::Lmh(_) => AssessmentMethod::Lmh,
        }
    }

    pub fn calculated_level(&self) -> RiskLevel {
        match self {
            Self::Scorecard(result) => result.calculated_level(),
            Self::Lmh(result) => result.calculated_level(),
        }
    }

    pub fn override_state(&self) -> &OverrideState {
        match self {
            Self::Scorecard(result) => result.override_state(),
            Self::Lmh(result) => result.override_state(),
        }
    }

    pub fn final_risk(&self) -> RiskLevel {
        self.override_state().final_risk
    }

    pub fn is_overridden(&self) -> bool {
        self.override_state().is_overridden
    }

    pub fn status(&self) -> RiskStatus {
        match self {
            Self::Scorecard(result) => RiskStatus::of(Some(result)),
            Self::Lmh(result) => RiskStatus::of(Some(result)),
        }
    }

    pub fn risk_score(&self) -> Option<u64> {
        match self {
            Self::Scorecard(result) => Some(result.risk_score),
            Self::Lmh(_) => None,
        }
    }

    pub fn risk_class(&self) -> Option<u8> {
        match self {
            Self::Scorecard(_) => None,
            Self::Lmh(result) => Some(result.risk_class),
        }
    }

    pub fn with_override(
        &self,
        level: RiskLevel,
        justification: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        match self {
            Self::Scorecard(result) => {
                Self::Scorecard(apply_override_at(result, level, justification, timestamp))
            }
            Self::Lmh(result) => Self::Lmh(apply_override_at(result, level, justification, timestamp)),
        }
    }

    pub fn without_override(&self) -> Self {
        match self {
            Self::Scorecard(result) => Self::Scorecard(reset_override(result)),
            Self::Lmh(result) => Self::Lmh(reset_override(result)),
        }
    }
}

/// Override section of the form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRequest {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub final_risk_level: String,
    #[serde(default)]
    pub professional_name: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub justification: String,
}

/// Persisted audit entry for a professional override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRecord {
    pub enabled: bool,
    pub final_risk_level: RiskLevel,
    pub professional_name: String,
    pub designation: String,
    pub justification: String,
    pub original_calculated_level: RiskLevel,
    pub timestamp: DateTime<Utc>,
}

/// Completed form session handed to the save boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSubmission {
    pub basic_info: BasicInfo,
    pub inputs: MethodInputs,
    #[serde(default, rename = "override", skip_serializing_if = "Option::is_none")]
    pub override_request: Option<OverrideRequest>,
    #[serde(default)]
    pub field_notes: String,
    #[serde(default)]
    pub photos: Vec<PhotoReference>,
}

/// Saved assessment: inputs, engine output and audit metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub id: AssessmentId,
    pub basic_info: BasicInfo,
    pub inputs: MethodInputs,
    pub outcome: RiskOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_record: Option<OverrideRecord>,
    #[serde(default)]
    pub field_notes: String,
    #[serde(default)]
    pub photos: Vec<PhotoReference>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AssessmentRecord {
    pub fn method(&self) -> AssessmentMethod {
        self.outcome.method()
    }

    pub fn status(&self) -> RiskStatus {
        self.outcome.status()
    }
}
