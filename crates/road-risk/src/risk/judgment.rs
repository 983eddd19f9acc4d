//! Professional judgment overrides.
//!
//! A qualified assessor may replace the calculated classification with a manual level. The
//! calculated level is never touched; the override lives in [`OverrideState`] next to it so
//! exports can render both values and the audit details.

use super::level::{InvalidRiskLevel, RiskLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit trail captured when an override is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideDetails {
    pub original_risk: RiskLevel,
    pub override_risk: RiskLevel,
    pub changed: bool,
    pub timestamp: DateTime<Utc>,
}

/// Post-override view of a classification. Flattened into each engine's result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideState {
    pub is_overridden: bool,
    pub final_risk: RiskLevel,
    pub final_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_justification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_details: Option<OverrideDetails>,
}

impl OverrideState {
    pub fn calculated(level: RiskLevel) -> Self {
        Self {
            is_overridden: false,
            final_risk: level,
            final_color: level.color().to_string(),
            override_justification: None,
            override_details: None,
        }
    }
}

/// Engine output that carries a calculated level and an override slot.
pub trait Overridable: Clone {
    fn calculated_level(&self) -> RiskLevel;
    fn override_state(&self) -> &OverrideState;
    fn override_state_mut(&mut self) -> &mut OverrideState;

    fn final_risk(&self) -> RiskLevel {
        self.override_state().final_risk
    }

    fn is_overridden(&self) -> bool {
        self.override_state().is_overridden
    }
}

/// Replace the final level of `result` with `override_level`, stamped with the current time.
pub fn apply_direct_override<T: Overridable>(
    result: &T,
    override_level: &str,
    justification: &str,
) -> Result<T, InvalidRiskLevel> {
    let level = override_level.parse::<RiskLevel>()?;
    Ok(apply_override_at(result, level, justification, Utc::now()))
}

pub fn apply_override_at<T: Overridable>(
    result: &T,
    level: RiskLevel,
    justification: &str,
    timestamp: DateTime<Utc>,
) -> T {
    let original = result.calculated_level();
    let mut overridden = result.clone();
    *overridden.override_state_mut() = OverrideState {
        is_overridden: true,
        final_risk: level,
        final_color: level.color().to_string(),
        override_justification: Some(justification.to_string()),
        override_details: Some(OverrideDetails {
            original_risk: original,
            override_risk: level,
            changed: level != original,
            timestamp,
        }),
    };
    overridden
}

pub fn reset_override<T: Overridable>(result: &T) -> T {
    let mut restored = result.clone();
    *restored.override_state_mut() = OverrideState::calculated(result.calculated_level());
    restored
}

/// Lifecycle of a single assessment's risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskStatus {
    Incomplete,
    Calculated,
    Overridden,
}

impl RiskStatus {
    pub fn of<T: Overridable>(result: Option<&T>) -> Self {
        match result {
            None => Self::Incomplete,
            Some(result) if result.is_overridden() => Self::Overridden,
            Some(_) => Self::Calculated,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Incomplete => "Incomplete",
            Self::Calculated => "Calculated",
            Self::Overridden => "Overridden",
        }
    }

    /// Saved records must be in one of these states.
    pub const fn is_persistable(self) -> bool {
        matches!(self, Self::Calculated | Self::Overridden)
    }

    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Incomplete, Self::Calculated)
                | (Self::Calculated, Self::Overridden)
                | (Self::Overridden, Self::Calculated)
        )
    }
}
