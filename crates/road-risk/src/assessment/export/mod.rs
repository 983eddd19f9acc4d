//! Export of saved assessments for reporting and GIS use.

mod geojson;
mod rows;

pub use geojson::feature_collection;
pub use rows::{export_rows, ExportRow};

use super::domain::AssessmentRecord;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    GeoJson,
}

impl ExportFormat {
    pub fn from_key(value: &str) -> Result<Self, ExportError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "geojson" => Ok(Self::GeoJson),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }

    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv; charset=utf-8",
            Self::GeoJson => "application/geo+json",
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::GeoJson => "geojson",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("unsupported export format '{0}' (expected json, csv or geojson)")]
    UnknownFormat(String),
    #[error("failed to encode JSON export: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to encode CSV export: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

pub fn write_json<W: Write>(records: &[AssessmentRecord], writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, records)?;
    Ok(())
}

pub fn write_csv<W: Write>(records: &[AssessmentRecord], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    for row in export_rows(records) {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_geojson<W: Write>(
    records: &[AssessmentRecord],
    writer: W,
) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, &feature_collection(records)?)?;
    Ok(())
}

pub fn render(format: ExportFormat, records: &[AssessmentRecord]) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Vec::new();
    match format {
        ExportFormat::Json => write_json(records, &mut buffer)?,
        ExportFormat::Csv => write_csv(records, &mut buffer)?,
        ExportFormat::GeoJson => write_geojson(records, &mut buffer)?,
    }
    Ok(buffer)
}
