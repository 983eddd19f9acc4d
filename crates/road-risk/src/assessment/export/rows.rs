use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::super::domain::{AssessmentRecord, RiskOutcome};
use crate::risk::{LmhLabel, RiskLevel};

/// One flattened line per assessment, shared by the CSV and GeoJSON exports.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow {
    pub id: String,
    pub road_name: String,
    pub road_section: Option<String>,
    pub district: Option<String>,
    pub assessor: String,
    pub assessed_on: NaiveDate,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub method: &'static str,
    pub hazard_score: Option<u32>,
    pub consequence_score: Option<u32>,
    pub risk_score: Option<u64>,
    pub likelihood: Option<LmhLabel>,
    pub consequence: Option<LmhLabel>,
    pub risk_class: Option<u8>,
    pub calculated_risk: RiskLevel,
    pub final_risk: RiskLevel,
    pub priority: &'static str,
    pub status: &'static str,
    pub overridden: bool,
    pub override_professional: Option<String>,
    pub override_designation: Option<String>,
    pub override_justification: Option<String>,
    pub override_timestamp: Option<DateTime<Utc>>,
    pub field_notes: String,
    pub photo_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&AssessmentRecord> for ExportRow {
    fn from(record: &AssessmentRecord) -> Self {
        let info = &record.basic_info;
        let (hazard_score, consequence_score, likelihood, consequence) = match &record.outcome {
            RiskOutcome::Scorecard(result) => (
                Some(result.hazard_score),
                Some(result.consequence_score),
                None,
                None,
            ),
            RiskOutcome::Lmh(result) => (None, None, Some(result.likelihood), Some(result.consequence)),
        };
        let audit = record.override_record.as_ref();
        let final_risk = record.outcome.final_risk();

        Self {
            id: record.id.0.clone(),
            road_name: info.road_name.clone(),
            road_section: info.road_section.clone(),
            district: info.district.clone(),
            assessor: info.assessor.clone(),
            assessed_on: info.assessed_on,
            latitude: info.location.map(|point| point.latitude),
            longitude: info.location.map(|point| point.longitude),
            method: record.method().key(),
            hazard_score,
            consequence_score,
            risk_score: record.outcome.risk_score(),
            likelihood,
            consequence,
            risk_class: record.outcome.risk_class(),
            calculated_risk: record.outcome.calculated_level(),
            final_risk,
            priority: final_risk.priority(),
            status: record.status().label(),
            overridden: record.outcome.is_overridden(),
            override_professional: audit.map(|entry| entry.professional_name.clone()),
            override_designation: audit.map(|entry| entry.designation.clone()),
            override_justification: audit.map(|entry| entry.justification.clone()),
            override_timestamp: audit.map(|entry| entry.timestamp),
            field_notes: record.field_notes.clone(),
            photo_count: record.photos.len(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

pub fn export_rows(records: &[AssessmentRecord]) -> Vec<ExportRow> {
    records.iter().map(ExportRow::from).collect()
}
