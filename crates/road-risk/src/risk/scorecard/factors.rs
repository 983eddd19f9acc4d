use serde::{Deserialize, Serialize};

/// Ordinal severity assigned to a single factor. Serialized as the bare weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FactorRating {
    Low = 2,
    Moderate = 4,
    High = 6,
    VeryHigh = 10,
}

impl FactorRating {
    pub const fn ordered() -> [Self; 4] {
        [Self::Low, Self::Moderate, Self::High, Self::VeryHigh]
    }

    pub const fn weight(self) -> u32 {
        self as u32
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

impl From<FactorRating> for u8 {
    fn from(rating: FactorRating) -> Self {
        rating as u8
    }
}

impl TryFrom<u8> for FactorRating {
    type Error = InvalidFactorRating;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::Low),
            4 => Ok(Self::Moderate),
            6 => Ok(Self::High),
            10 => Ok(Self::VeryHigh),
            other => Err(InvalidFactorRating(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("factor rating {0} is not one of 2, 4, 6, 10")]
pub struct InvalidFactorRating(pub u8);

/// Probability-side factors. Totals range 10-50.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardFactors {
    pub terrain_stability: FactorRating,
    pub slope_grade: FactorRating,
    pub geology: FactorRating,
    pub drainage_provision: FactorRating,
    pub failure_history: FactorRating,
}

impl HazardFactors {
    pub const FACTOR_COUNT: usize = 5;

    pub fn ratings(&self) -> [FactorRating; Self::FACTOR_COUNT] {
        [
            self.terrain_stability,
            self.slope_grade,
            self.geology,
            self.drainage_provision,
            self.failure_history,
        ]
    }

    pub fn total(&self) -> u32 {
        self.ratings().iter().map(|rating| rating.weight()).sum()
    }
}

/// Impact-side factors. Totals range 8-40.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsequenceFactors {
    pub proximity_to_water: FactorRating,
    pub downstream_infrastructure: FactorRating,
    pub public_use: FactorRating,
    pub environmental_value: FactorRating,
}

impl ConsequenceFactors {
    pub const FACTOR_COUNT: usize = 4;

    pub fn ratings(&self) -> [FactorRating; Self::FACTOR_COUNT] {
        [
            self.proximity_to_water,
            self.downstream_infrastructure,
            self.public_use,
            self.environmental_value,
        ]
    }

    pub fn total(&self) -> u32 {
        self.ratings().iter().map(|rating| rating.weight()).sum()
    }
}

/// Hazard ratings as collected by the form; any factor may still be unrated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HazardFactorInputs {
    #[serde(default)]
    pub terrain_stability: Option<FactorRating>,
    #[serde(default)]
    pub slope_grade: Option<FactorRating>,
    #[serde(default)]
    pub geology: Option<FactorRating>,
    #[serde(default)]
    pub drainage_provision: Option<FactorRating>,
    #[serde(default)]
    pub failure_history: Option<FactorRating>,
}

impl HazardFactorInputs {
    pub fn complete(&self) -> Option<HazardFactors> {
        Some(HazardFactors {
            terrain_stability: self.terrain_stability?,
            slope_grade: self.slope_grade?,
            geology: self.geology?,
            drainage_provision: self.drainage_provision?,
            failure_history: self.failure_history?,
        })
    }

    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("terrainStability", self.terrain_stability),
            ("slopeGrade", self.slope_grade),
            ("geology", self.geology),
            ("drainageProvision", self.drainage_provision),
            ("failureHistory", self.failure_history),
        ]
        .into_iter()
        .filter_map(|(name, rating)| rating.is_none().then_some(name))
        .collect()
    }
}

impl From<HazardFactors> for HazardFactorInputs {
    fn from(factors: HazardFactors) -> Self {
        Self {
            terrain_stability: Some(factors.terrain_stability),
            slope_grade: Some(factors.slope_grade),
            geology: Some(factors.geology),
            drainage_provision: Some(factors.drainage_provision),
            failure_history: Some(factors.failure_history),
        }
    }
}

/// Consequence ratings as collected by the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsequenceFactorInputs {
    #[serde(default)]
    pub proximity_to_water: Option<FactorRating>,
    #[serde(default)]
    pub downstream_infrastructure: Option<FactorRating>,
    #[serde(default)]
    pub public_use: Option<FactorRating>,
    #[serde(default)]
    pub environmental_value: Option<FactorRating>,
}

impl ConsequenceFactorInputs {
    pub fn complete(&self) -> Option<ConsequenceFactors> {
        Some(ConsequenceFactors {
            proximity_to_water: self.proximity_to_water?,
            downstream_infrastructure: self.downstream_infrastructure?,
            public_use: self.public_use?,
            environmental_value: self.environmental_value?,
        })
    }

    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("proximityToWater", self.proximity_to_water),
            ("downstreamInfrastructure", self.downstream_infrastructure),
            ("publicUse", self.public_use),
            ("environmentalValue", self.environmental_value),
        ]
        .into_iter()
        .filter_map(|(name, rating)| rating.is_none().then_some(name))
        .collect()
    }
}

impl From<ConsequenceFactors> for ConsequenceFactorInputs {
    fn from(factors: ConsequenceFactors) -> Self {
        Self {
            proximity_to_water: Some(factors.proximity_to_water),
            downstream_infrastructure: Some(factors.downstream_infrastructure),
            public_use: Some(factors.public_use),
            environmental_value: Some(factors.environmental_value),
        }
    }
}

/// Scorecard payload submitted by the form layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorecardInputs {
    #[serde(default)]
    pub hazard_factors: HazardFactorInputs,
    #[serde(default)]
    pub consequence_factors: ConsequenceFactorInputs,
}

impl ScorecardInputs {
    pub fn complete(&self) -> Option<(HazardFactors, ConsequenceFactors)> {
        Some((
            self.hazard_factors.complete()?,
            self.consequence_factors.complete()?,
        ))
    }

    /// Unrated factors, prefixed with their group.
    pub fn missing(&self) -> Vec<String> {
        let hazard = self
            .hazard_factors
            .missing()
            .into_iter()
            .map(|name| format!("hazardFactors.{name}"));
        let consequence = self
            .consequence_factors
            .missing()
            .into_iter()
            .map(|name| format!("consequenceFactors.{name}"));
        hazard.chain(consequence).collect()
    }
}
