//! Risk classification core: the scorecard and likelihood/consequence engines and the shared
//! professional override.

pub mod judgment;
pub mod level;
pub mod lmh;
pub mod scorecard;

pub use judgment::{
    apply_direct_override, apply_override_at, reset_override, Overridable, OverrideDetails,
    OverrideState, RiskStatus,
};
pub use level::{InvalidRiskLevel, RiskLevel};
pub use lmh::{FieldGuidance, LmhEngine, LmhInputs, LmhLabel, LmhMatrix, LmhResult};
pub use scorecard::{
    ConsequenceFactorInputs, ConsequenceFactors, FactorRating, HazardFactorInputs, HazardFactors,
    RiskResult, ScoreBand, ScoreValidation, ScorecardEngine, ScorecardInputs,
};
