mod config;
mod rules;
mod tokens;

pub use config::{EstimatorConfig, OverlapWeights};

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::domain::{CompatibilityResult, PairKey, Profile};

/// Stateless scorer that applies an [`EstimatorConfig`] to a pair of profiles.
///
/// The estimate depends only on the two profiles, so the same estimator can be
/// shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct CompatibilityEstimator {
    config: EstimatorConfig,
}

impl CompatibilityEstimator {
    pub fn new(config: EstimatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn estimate(&self, a: &Profile, b: &Profile) -> EstimatedScore {
        let (components, raw_total) = rules::score_pair(a, b, &self.config);
        let floor = i32::from(self.config.min_score);
        let ceiling = i32::from(self.config.max_score).max(floor);
        let score = raw_total.clamp(floor, ceiling) as u8;

        EstimatedScore {
            pair: PairKey::for_profiles(a, b),
            score,
            raw_total,
            components,
        }
    }

    pub fn score(&self, a: &Profile, b: &Profile) -> u8 {
        self.estimate(a, b).score
    }
}

/// Scores a pair with the default weights.
pub fn compute_estimated_score(a: &Profile, b: &Profile) -> u8 {
    static DEFAULT: OnceLock<CompatibilityEstimator> = OnceLock::new();
    DEFAULT
        .get_or_init(CompatibilityEstimator::default)
        .score(a, b)
}

/// Signal that contributed to an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffinityFactor {
    Chemistry,
    Zodiac,
    Personality,
    AgeGap,
    SharedInterests,
    SharedAnswers,
}

/// Discrete contribution to an estimate, kept for transparent breakdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: AffinityFactor,
    pub score: i32,
    pub notes: String,
}

/// Estimate output: the clamped score plus the trail that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatedScore {
    pub pair: PairKey,
    pub score: u8,
    /// Base plus every contribution, before clamping.
    pub raw_total: i32,
    pub components: Vec<ScoreComponent>,
}

impl EstimatedScore {
    pub fn contribution(&self, factor: AffinityFactor) -> i32 {
        self.components
            .iter()
            .filter(|component| component.factor == factor)
            .map(|component| component.score)
            .sum()
    }

    pub fn result(&self) -> CompatibilityResult {
        CompatibilityResult::estimated(self.score)
    }
}
