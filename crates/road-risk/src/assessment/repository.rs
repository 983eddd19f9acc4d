use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::domain::{AssessmentId, AssessmentMethod, AssessmentRecord};
use crate::risk::{RiskLevel, RiskStatus};

/// Storage abstraction so the service module can be exercised in isolation.
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError>;
    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError>;
    fn delete(&self, id: &AssessmentId) -> Result<(), RepositoryError>;
    fn list(&self) -> Result<Vec<AssessmentRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Compact listing view of a saved assessment.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentSummaryView {
    pub assessment_id: AssessmentId,
    pub road_name: String,
    pub assessed_on: NaiveDate,
    pub method: AssessmentMethod,
    pub status: RiskStatus,
    pub calculated_risk: RiskLevel,
    pub final_risk: RiskLevel,
    pub final_color: String,
    pub is_overridden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_class: Option<u8>,
    pub priority: &'static str,
    pub updated_at: DateTime<Utc>,
}

impl AssessmentRecord {
    pub fn summary_view(&self) -> AssessmentSummaryView {
        let overrides = self.outcome.override_state();
        AssessmentSummaryView {
            assessment_id: self.id.clone(),
            road_name: self.basic_info.road_name.clone(),
            assessed_on: self.basic_info.assessed_on,
            method: self.method(),
            status: self.status(),
            calculated_risk: self.outcome.calculated_level(),
            final_risk: overrides.final_risk,
            final_color: overrides.final_color.clone(),
            is_overridden: overrides.is_overridden,
            risk_score: self.outcome.risk_score(),
            risk_class: self.outcome.risk_class(),
            priority: overrides.final_risk.priority(),
            updated_at: self.updated_at,
        }
    }
}
