mod factors;
mod thresholds;

pub use factors::{
    ConsequenceFactorInputs, ConsequenceFactors, FactorRating, HazardFactorInputs, HazardFactors,
    InvalidFactorRating, ScorecardInputs,
};
pub use thresholds::{
    band_range, risk_level_for, ScoreBand, ScoreValidation, CONSEQUENCE_RANGE, HAZARD_RANGE,
    RISK_SCORE_RANGE,
};

use super::judgment::{Overridable, OverrideState};
use super::level::RiskLevel;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Stateless hazard × consequence calculator. Free to copy or share between sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScorecardEngine;

impl ScorecardEngine {
    /// Classify a complete form payload; `None` until every factor is rated.
    pub fn calculate(&self, inputs: &ScorecardInputs) -> Option<RiskResult> {
        let (hazard, consequence) = inputs.complete()?;
        Some(self.calculate_from_factors(&hazard, &consequence))
    }

    pub fn calculate_from_factors(
        &self,
        hazard: &HazardFactors,
        consequence: &ConsequenceFactors,
    ) -> RiskResult {
        self.calculate_initial_risk(hazard.total(), consequence.total())
    }

    pub fn calculate_risk_score(&self, hazard_score: u32, consequence_score: u32) -> u64 {
        u64::from(hazard_score) * u64::from(consequence_score)
    }

    pub fn validate_scores(&self, hazard_score: u32, consequence_score: u32) -> ScoreValidation {
        thresholds::validate_scores(hazard_score, consequence_score)
    }

    /// Totals outside the methodology ranges are still classified; the issues travel in
    /// `RiskResult::validation`.
    pub fn calculate_initial_risk(&self, hazard_score: u32, consequence_score: u32) -> RiskResult {
        let validation = self.validate_scores(hazard_score, consequence_score);
        if !validation.valid {
            warn!(
                hazard_score,
                consequence_score,
                issues = ?validation.issues,
                "scorecard totals outside methodology range"
            );
        }

        let risk_score = self.calculate_risk_score(hazard_score, consequence_score);
        let risk_level = risk_level_for(risk_score);
        let hazard_band = ScoreBand::for_hazard(hazard_score);
        let consequence_band = ScoreBand::for_consequence(consequence_score);

        RiskResult {
            hazard_score,
            consequence_score,
            risk_score,
            risk_level,
            reasoning: reasoning(hazard_score, consequence_score, risk_score, risk_level),
            priority: risk_level.priority().to_string(),
            hazard_band,
            consequence_band,
            hazard_description: hazard_band.hazard_description().to_string(),
            consequence_description: consequence_band.consequence_description().to_string(),
            validation,
            overrides: OverrideState::calculated(risk_level),
        }
    }

    pub fn management_recommendations(&self, level: RiskLevel) -> &'static [&'static str] {
        thresholds::management_recommendations(level)
    }
}

fn reasoning(hazard_score: u32, consequence_score: u32, risk_score: u64, level: RiskLevel) -> String {
    let (low, high) = band_range(level);
    format!(
        "Risk score {risk_score} (hazard {hazard_score} x consequence {consequence_score}) falls in the {} band ({low}-{high}). {}",
        level.label(),
        thresholds::band_summary(level)
    )
}

/// Scorecard classification, including the override slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResult {
    pub hazard_score: u32,
    pub consequence_score: u32,
    pub risk_score: u64,
    pub risk_level: RiskLevel,
    pub reasoning: String,
    pub priority: String,
    pub hazard_band: ScoreBand,
    pub consequence_band: ScoreBand,
    pub hazard_description: String,
    pub consequence_description: String,
    pub validation: ScoreValidation,
    #[serde(flatten)]
    pub overrides: OverrideState,
}

impl Overridable for RiskResult {
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
