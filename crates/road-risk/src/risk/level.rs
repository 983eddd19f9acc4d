use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Final classification shared by the scorecard and likelihood/consequence engines.
///
/// The serialized labels are part of the export format and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskLevel {
    pub const fn ordered() -> [Self; 4] {
        [Self::Low, Self::Moderate, Self::High, Self::VeryHigh]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }

    /// Display colour used by reports and map layers.
    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "#2e7d32",
            Self::Moderate => "#f9a825",
            Self::High => "#ef6c00",
            Self::VeryHigh => "#c62828",
        }
    }

    pub const fn priority(self) -> &'static str {
        match self {
            Self::Low => "Routine maintenance / standard monitoring",
            Self::Moderate => "Enhanced monitoring",
            Self::High => "Active management required",
            Self::VeryHigh => "Immediate action required",
        }
    }

    pub fn allowed_labels() -> Vec<&'static str> {
        Self::ordered().into_iter().map(Self::label).collect()
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RiskLevel {
    type Err = InvalidRiskLevel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ordered()
            .into_iter()
            .find(|level| level.label() == trimmed)
            .ok_or_else(|| InvalidRiskLevel {
                value: value.to_string(),
                allowed: Self::allowed_labels(),
            })
    }
}

/// Raised when a caller supplies a risk level outside the fixed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid risk level '{value}' (expected one of: {})", .allowed.join(", "))]
pub struct InvalidRiskLevel {
    pub value: String,
    pub allowed: Vec<&'static str>,
}
