use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::domain::{
    AssessmentId, AssessmentRecord, AssessmentSubmission, MethodInputs, OverrideRecord,
    RiskOutcome,
};
use super::guard::{SaveGuard, SaveViolation};
use super::repository::{AssessmentRepository, RepositoryError};
use crate::risk::RiskStatus;

/// Service composing the save guard, the classification engines, and the record store.
pub struct AssessmentService<R> {
    guard: Arc<SaveGuard>,
    repository: Arc<R>,
}

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id(now: DateTime<Utc>) -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("ra-{}-{id:06}", now.format("%Y%m%d%H%M%S")))
}

impl<R> AssessmentService<R>
where
    R: AssessmentRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_guard(SaveGuard::default(), repository)
    }

    pub fn with_guard(guard: SaveGuard, repository: Arc<R>) -> Self {
        Self {
            guard: Arc::new(guard),
            repository,
        }
    }

    /// Preview classification for a form in progress. `None` until every factor is rated.
    pub fn classify(&self, inputs: &MethodInputs) -> Option<RiskOutcome> {
        inputs.classify()
    }

    /// Validate, classify, and persist a completed form session.
    pub fn save(
        &self,
        submission: AssessmentSubmission,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let now = Utc::now();
        let record = self.build_record(next_assessment_id(now), submission, now, now)?;
        let stored = self.repository.insert(record)?;

        info!(
            assessment_id = %stored.id.0,
            method = stored.method().key(),
            final_risk = %stored.outcome.final_risk(),
            overridden = stored.outcome.is_overridden(),
            "assessment saved"
        );
        Ok(stored)
    }

    /// Explicit edit flow: recompute from the new submission, keeping identity and creation time.
    pub fn edit(
        &self,
        assessment_id: &AssessmentId,
        submission: AssessmentSubmission,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let existing = self.get(assessment_id)?;
        let now = Utc::now();
        let record = self.build_record(existing.id, submission, existing.created_at, now)?;
        self.repository.update(record.clone())?;

        info!(assessment_id = %record.id.0, final_risk = %record.outcome.final_risk(), "assessment edited");
        Ok(record)
    }

    /// Drop a professional override, returning the record to its calculated level.
    pub fn reset_override(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let mut record = self.get(assessment_id)?;
        let from = record.status();
        if !from.can_transition_to(RiskStatus::Calculated) {
            return Err(AssessmentServiceError::InvalidTransition {
                from,
                to: RiskStatus::Calculated,
            });
        }

        record.outcome = record.outcome.without_override();
        record.override_record = None;
        record.updated_at = Utc::now();
        self.repository.update(record.clone())?;

        info!(assessment_id = %record.id.0, "assessment override reset");
        Ok(record)
    }

    pub fn delete(&self, assessment_id: &AssessmentId) -> Result<(), AssessmentServiceError> {
        self.repository.delete(assessment_id)?;
        info!(assessment_id = %assessment_id.0, "assessment deleted");
        Ok(())
    }

    pub fn get(
        &self,
        assessment_id: &AssessmentId,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let record = self
            .repository
            .fetch(assessment_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn list(&self) -> Result<Vec<AssessmentRecord>, AssessmentServiceError> {
        let mut records = self.repository.list()?;
        records.sort_by(|left, right| left.id.cmp(&right.id));
        Ok(records)
    }

    fn build_record(
        &self,
        id: AssessmentId,
        submission: AssessmentSubmission,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        let clearance = self.guard.check(&submission)?;

        let calculated = submission
            .inputs
            .classify()
            .ok_or_else(|| SaveViolation::IncompleteFactors {
                method: submission.inputs.method(),
                missing: submission.inputs.missing(),
            })?;

        let (outcome, override_record) = match (clearance.override_level, &submission.override_request)
        {
            (Some(level), Some(request)) => {
                let outcome = calculated.with_override(level, &request.justification, now);
                let record = OverrideRecord {
                    enabled: true,
                    final_risk_level: level,
                    professional_name: request.professional_name.trim().to_string(),
                    designation: request.designation.trim().to_string(),
                    justification: request.justification.clone(),
                    original_calculated_level: calculated.calculated_level(),
                    timestamp: now,
                };
                (outcome, Some(record))
            }
            _ => (calculated, None),
        };

        Ok(AssessmentRecord {
            id,
            basic_info: submission.basic_info,
            inputs: submission.inputs,
            outcome,
            override_record,
            field_notes: submission.field_notes,
            photos: submission.photos,
            created_at,
            updated_at: now,
        })
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Violation(#[from] SaveViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("cannot move risk status from {} to {}", .from.label(), .to.label())]
    InvalidTransition { from: RiskStatus, to: RiskStatus },
}
