use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::assessment::domain::{
    AssessmentId, AssessmentRecord, AssessmentSubmission, BasicInfo, GeoPoint, MethodInputs,
    OverrideRequest, PhotoReference,
};
use crate::assessment::guard::SaveGuard;
use crate::assessment::repository::{AssessmentRepository, RepositoryError};
use crate::assessment::{assessment_router, AssessmentService};
use crate::risk::{
    ConsequenceFactors, FactorRating, HazardFactors, LmhInputs, LmhLabel, ScorecardInputs,
};

pub(super) fn basic_info() -> BasicInfo {
    BasicInfo {
        road_name: "Cedar Creek FSR".to_string(),
        road_section: Some("km 4.2 - 5.0".to_string()),
        district: Some("Sunshine Coast".to_string()),
        assessor: "J. Alvarez".to_string(),
        assessed_on: NaiveDate::from_ymd_opt(2025, 9, 18).expect("valid date"),
        location: Some(GeoPoint {
            latitude: 49.6112,
            longitude: -123.8121,
            accuracy_m: Some(4.5),
        }),
        weather_conditions: Some("Overcast, light rain".to_string()),
    }
}

pub(super) fn uniform_scorecard(rating: FactorRating) -> ScorecardInputs {
    ScorecardInputs {
        hazard_factors: HazardFactors {
            terrain_stability: rating,
            slope_grade: rating,
            geology: rating,
            drainage_provision: rating,
            failure_history: rating,
        }
        .into(),
        consequence_factors: ConsequenceFactors {
            proximity_to_water: rating,
            downstream_infrastructure: rating,
            public_use: rating,
            environmental_value: rating,
        }
        .into(),
    }
}

/// Every factor rated Low: hazard 10, consequence 8, score 80.
pub(super) fn low_scorecard_submission() -> AssessmentSubmission {
    AssessmentSubmission {
        basic_info: basic_info(),
        inputs: MethodInputs::Scorecard(uniform_scorecard(FactorRating::Low)),
        override_request: None,
        field_notes: "Minor ravelling on cutslope.".to_string(),
        photos: vec![PhotoReference {
            file_name: "cedar-creek-km4.jpg".to_string(),
            caption: Some("Cutslope looking north".to_string()),
            captured_at: None,
        }],
    }
}

pub(super) fn lmh_submission(likelihood: LmhLabel, consequence: LmhLabel) -> AssessmentSubmission {
    AssessmentSubmission {
        inputs: MethodInputs::Lmh(LmhInputs {
            likelihood: Some(likelihood),
            consequence: Some(consequence),
        }),
        ..low_scorecard_submission()
    }
}

pub(super) fn override_request(level: &str) -> OverrideRequest {
    OverrideRequest {
        enabled: true,
        final_risk_level: level.to_string(),
        professional_name: "Dana Whitfield".to_string(),
        designation: "P.Geo.".to_string(),
        justification: "Tension cracks observed upslope of the running surface.".to_string(),
    }
}

pub(super) fn overridden_submission(level: &str) -> AssessmentSubmission {
    AssessmentSubmission {
        override_request: Some(override_request(level)),
        ..low_scorecard_submission()
    }
}

pub(super) fn build_service() -> (AssessmentService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = AssessmentService::new(repository.clone());
    (service, repository)
}

pub(super) fn guard() -> SaveGuard {
    SaveGuard::default()
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<AssessmentId, AssessmentRecord>>>,
}

impl AssessmentRepository for MemoryRepository {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if !guard.contains_key(&record.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &AssessmentId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn list(&self) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) struct ConflictRepository;

impl AssessmentRepository for ConflictRepository {
    fn insert(&self, _record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: AssessmentRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        Ok(None)
    }

    fn delete(&self, _id: &AssessmentId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn list(&self) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn insert(&self, _record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn update(&self, _record: AssessmentRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn fetch(&self, _id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn delete(&self, _id: &AssessmentId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }

    fn list(&self) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk offline".to_string()))
    }
}

pub(super) fn assert_conflict_response(response: Response) {
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assessment_router_with_service(
    service: AssessmentService<MemoryRepository>,
) -> axum::Router {
    assessment_router(Arc::new(service))
}
