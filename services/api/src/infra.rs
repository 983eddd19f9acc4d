use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use road_risk::assessment::{
    AssessmentId, AssessmentMethod, AssessmentRecord, AssessmentRepository, RepositoryError,
};
use road_risk::risk::{FactorRating, LmhLabel, RiskLevel};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) default_method: AssessmentMethod,
}

/// Record store for a single device: in memory, optionally mirrored to a JSON file.
#[derive(Default, Clone)]
pub(crate) struct LocalAssessmentStore {
    records: Arc<Mutex<BTreeMap<AssessmentId, AssessmentRecord>>>,
    path: Option<PathBuf>,
}

impl LocalAssessmentStore {
    pub(crate) fn in_memory() -> Self {
        Self::default()
    }

    /// Load an existing store file, or start empty if it does not exist yet.
    pub(crate) fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let records: BTreeMap<AssessmentId, AssessmentRecord> = if path.exists() {
            let raw = fs::read(&path).map_err(|err| unavailable(&path, err))?;
            let records: Vec<AssessmentRecord> =
                serde_json::from_slice(&raw).map_err(|err| unavailable(&path, err))?;
            records
                .into_iter()
                .map(|record| (record.id.clone(), record))
                .collect()
        } else {
            BTreeMap::new()
        };

        info!(path = %path.display(), records = records.len(), "assessment store opened");
        Ok(Self {
            records: Arc::new(Mutex::new(records)),
            path: Some(path),
        })
    }

    pub(crate) fn from_path(path: Option<&Path>) -> Result<Self, RepositoryError> {
        match path {
            Some(path) => Self::open(path),
            None => Ok(Self::in_memory()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<AssessmentId, AssessmentRecord>>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("assessment store lock poisoned".to_string()))
    }

    fn persist(&self, records: &BTreeMap<AssessmentId, AssessmentRecord>) -> Result<(), RepositoryError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| unavailable(path, err))?;
        }

        let snapshot: Vec<&AssessmentRecord> = records.values().collect();
        let encoded = serde_json::to_vec_pretty(&snapshot).map_err(|err| unavailable(path, err))?;
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, encoded).map_err(|err| unavailable(&staging, err))?;
        fs::rename(&staging, path).map_err(|err| unavailable(path, err))?;

        debug!(path = %path.display(), records = snapshot.len(), "assessment store flushed");
        Ok(())
    }
}

fn unavailable(path: &Path, err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Unavailable(format!("{}: {err}", path.display()))
}

impl AssessmentRepository for LocalAssessmentStore {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        let mut staged = guard.clone();
        staged.insert(record.id.clone(), record.clone());
        self.persist(&staged)?;
        *guard = staged;
        Ok(record)
    }

    fn update(&self, record: AssessmentRecord) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        if !guard.contains_key(&record.id) {
            return Err(RepositoryError::NotFound);
        }
        let mut staged = guard.clone();
        staged.insert(record.id.clone(), record);
        self.persist(&staged)?;
        *guard = staged;
        Ok(())
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &AssessmentId) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let mut staged = guard.clone();
        if staged.remove(id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        self.persist(&staged)?;
        *guard = staged;
        Ok(())
    }

    fn list(&self) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.values().cloned().collect())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Accepts a factor weight (`2`, `4`, `6`, `10`) or its label.
pub(crate) fn parse_rating(raw: &str) -> Result<FactorRating, String> {
    let normalized = raw.trim().to_ascii_lowercase().replace(['-', '_'], " ");
    match normalized.as_str() {
        "low" => Ok(FactorRating::Low),
        "moderate" => Ok(FactorRating::Moderate),
        "high" => Ok(FactorRating::High),
        "very high" => Ok(FactorRating::VeryHigh),
        other => other
            .parse::<u8>()
            .ok()
            .and_then(|weight| FactorRating::try_from(weight).ok())
            .ok_or_else(|| {
                format!("'{raw}' is not a factor rating (use 2, 4, 6, 10 or low..very-high)")
            }),
    }
}

pub(crate) fn parse_lmh_label(raw: &str) -> Result<LmhLabel, String> {
    let normalized = raw.trim().to_ascii_lowercase().replace(['-', '_'], " ");
    match normalized.as_str() {
        "very low" => Ok(LmhLabel::VeryLow),
        "low" => Ok(LmhLabel::Low),
        "moderate" => Ok(LmhLabel::Moderate),
        "high" => Ok(LmhLabel::High),
        _ => Err(format!(
            "'{raw}' is not a likelihood/consequence label (use very-low, low, moderate or high)"
        )),
    }
}

pub(crate) fn parse_risk_level(raw: &str) -> Result<RiskLevel, String> {
    let normalized = raw.trim().to_ascii_lowercase().replace(['-', '_'], " ");
    RiskLevel::allowed_labels()
        .iter()
        .find(|label| label.to_ascii_lowercase() == normalized)
        .ok_or_else(|| format!("'{raw}' is not a risk level (use low, moderate, high or very-high)"))
        .and_then(|label| label.parse::<RiskLevel>().map_err(|err| err.to_string()))
}
