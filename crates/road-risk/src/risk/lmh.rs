//! Likelihood × consequence classification.
//!
//! The standard table is a cited reference matrix and is reproduced cell by cell, including
//! its asymmetries. The field guidance table is a coarser 3×3 view used for on-screen
//! priority text only.

use super::judgment::{Overridable, OverrideState};
use super::level::RiskLevel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordinal label for either axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LmhLabel {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Moderate,
    High,
}

impl LmhLabel {
    pub const fn ordered() -> [Self; 4] {
        [Self::VeryLow, Self::Low, Self::Moderate, Self::High]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }

    const fn row(self) -> usize {
        match self {
            Self::High => 0,
            Self::Moderate => 1,
            Self::Low => 2,
            Self::VeryLow => 3,
        }
    }
}

impl fmt::Display for LmhLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LmhLabel {
    type Err = InvalidLmhLabel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ordered()
            .into_iter()
            .find(|label| label.label() == trimmed)
            .ok_or_else(|| InvalidLmhLabel(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid likelihood/consequence label '{0}' (expected one of: Very Low, Low, Moderate, High)")]
pub struct InvalidLmhLabel(pub String);

/// Rows are likelihood, columns are consequence, both ordered High, Moderate, Low, Very Low.
const STANDARD_CLASSES: [[u8; 4]; 4] = [
    [5, 4, 3, 1],
    [4, 3, 2, 1],
    [3, 2, 2, 1],
    [1, 1, 1, 1],
];

pub const fn class_level(risk_class: u8) -> RiskLevel {
    match risk_class {
        5 => RiskLevel::VeryHigh,
        4 => RiskLevel::High,
        2 | 3 => RiskLevel::Moderate,
        _ => RiskLevel::Low,
    }
}

/// Which lookup table a caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LmhMatrix {
    Standard,
    FieldGuidance,
}

/// Form payload for the likelihood/consequence method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LmhInputs {
    #[serde(default)]
    pub likelihood: Option<LmhLabel>,
    #[serde(default)]
    pub consequence: Option<LmhLabel>,
}

impl LmhInputs {
    pub fn missing(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.likelihood.is_none() {
            missing.push("likelihood".to_string());
        }
        if self.consequence.is_none() {
            missing.push("consequence".to_string());
        }
        missing
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LmhResult {
    pub likelihood: LmhLabel,
    pub consequence: LmhLabel,
    pub risk_class: u8,
    pub risk_level: RiskLevel,
    pub color: String,
    pub priority: String,
    #[serde(flatten)]
    pub overrides: OverrideState,
}

impl Overridable for LmhResult {
    fn calculated_level(&self) -> RiskLevel {
        self.risk_level
    }

    fn override_state(&self) -> &OverrideState {
        &self.overrides
    }

    fn override_state_mut(&mut self) -> &mut OverrideState {
        &mut self.overrides
    }
}

/// Coarse guidance text from the 3×3 field table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldGuidance {
    pub level: RiskLevel,
    pub priority: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LmhEngine;

impl LmhEngine {
    /// `None` while either axis is still unselected.
    pub fn classify(
        &self,
        likelihood: Option<LmhLabel>,
        consequence: Option<LmhLabel>,
    ) -> Option<LmhResult> {
        Some(self.classify_pair(likelihood?, consequence?))
    }

    pub fn classify_inputs(&self, inputs: &LmhInputs) -> Option<LmhResult> {
        self.classify(inputs.likelihood, inputs.consequence)
    }

    pub fn classify_pair(&self, likelihood: LmhLabel, consequence: LmhLabel) -> LmhResult {
        let risk_class = self.risk_class(likelihood, consequence);
        let risk_level = class_level(risk_class);
        LmhResult {
            likelihood,
            consequence,
            risk_class,
            risk_level,
            color: risk_level.color().to_string(),
            priority: risk_level.priority().to_string(),
            overrides: OverrideState::calculated(risk_level),
        }
    }

    pub fn risk_class(&self, likelihood: LmhLabel, consequence: LmhLabel) -> u8 {
        STANDARD_CLASSES[likelihood.row()][consequence.row()]
    }

    /// Level from the requested table; the field table has no `Very Low` entries.
    pub fn level(
        &self,
        matrix: LmhMatrix,
        likelihood: LmhLabel,
        consequence: LmhLabel,
    ) -> Option<RiskLevel> {
        match matrix {
            LmhMatrix::Standard => Some(class_level(self.risk_class(likelihood, consequence))),
            LmhMatrix::FieldGuidance => field_level(likelihood, consequence),
        }
    }

    pub fn field_guidance(
        &self,
        likelihood: Option<LmhLabel>,
        consequence: Option<LmhLabel>,
    ) -> Option<FieldGuidance> {
        let level = field_level(likelihood?, consequence?)?;
        Some(FieldGuidance {
            level,
            priority: level.priority().to_string(),
            message: field_message(level).to_string(),
        })
    }
}

fn field_level(likelihood: LmhLabel, consequence: LmhLabel) -> Option<RiskLevel> {
    use LmhLabel::{High, Low, Moderate};

    let level = match (likelihood, consequence) {
        (High, High) => RiskLevel::VeryHigh,
        (High, Moderate) | (Moderate, High) => RiskLevel::High,
        (High, Low) | (Low, High) | (Moderate, Moderate) => RiskLevel::Moderate,
        (Moderate, Low) | (Low, Moderate) | (Low, Low) => RiskLevel::Low,
        _ => return None,
    };
    Some(level)
}

const fn field_message(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "Low risk. Continue regular inspections and routine maintenance.",
        RiskLevel::Moderate => {
            "Moderate risk. Inspect after significant rainfall and keep drainage clear."
        }
        RiskLevel::High => "High risk. Plan mitigation and consult a qualified professional.",
        RiskLevel::VeryHigh => {
            "Very high risk. Act immediately and consider restricting road use."
        }
    }
}
