//! Assessment lifecycle: save validation, classification, override audit, storage and export.

pub mod domain;
pub mod export;
pub(crate) mod guard;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AssessmentId, AssessmentMethod, AssessmentRecord, AssessmentSubmission, BasicInfo, GeoPoint,
    MethodInputs, OverrideRecord, OverrideRequest, PhotoReference, RiskOutcome,
};
pub use export::{render, ExportError, ExportFormat, ExportRow};
pub use guard::{OverrideField, SaveClearance, SaveGuard, SavePolicy, SaveViolation};
pub use repository::{AssessmentRepository, AssessmentSummaryView, RepositoryError};
pub use router::assessment_router;
pub use service::{AssessmentService, AssessmentServiceError};
