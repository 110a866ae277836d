use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::tokens::default_stop_words;

/// Weights and limits for the compatibility heuristic.
///
/// Deserializing a partial document fills every missing field from
/// [`EstimatorConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    pub base_score: i32,
    pub min_score: u8,
    /// Kept below 90 so estimates never look like confirmed scores.
    pub max_score: u8,
    pub chemistry_modulus: i32,
    pub same_element_bonus: i32,
    pub complementary_element_bonus: i32,
    pub clashing_element_penalty: i32,
    pub personality_max_per_dimension: f64,
    pub personality_distance_divisor: f64,
    pub age_gap_tolerance: u16,
    pub age_penalty_per_year: i32,
    pub age_penalty_cap: i32,
    pub interests: OverlapWeights,
    pub questions: OverlapWeights,
    pub min_token_chars: usize,
    pub stop_words: BTreeSet<String>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            base_score: 18,
            min_score: 15,
            max_score: 88,
            chemistry_modulus: 17,
            same_element_bonus: 7,
            complementary_element_bonus: 3,
            clashing_element_penalty: 5,
            personality_max_per_dimension: 8.0,
            personality_distance_divisor: 6.25,
            age_gap_tolerance: 3,
            age_penalty_per_year: 2,
            age_penalty_cap: 15,
            interests: OverlapWeights {
                first_match: 14,
                cap: 28,
            },
            questions: OverlapWeights {
                first_match: 6,
                cap: 12,
            },
            min_token_chars: 3,
            stop_words: default_stop_words(),
        }
    }
}

/// Diminishing-returns schedule: the first match is worth `first_match`,
/// every further match half of the previous one, the sum never above `cap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapWeights {
    pub first_match: i32,
    pub cap: i32,
}

impl OverlapWeights {
    pub fn points_for(&self, matches: usize) -> i32 {
        let mut total = 0;
        let mut worth = self.first_match;
        for _ in 0..matches {
            if worth <= 0 {
                break;
            }
            total += worth;
            worth /= 2;
        }
        total.min(self.cap)
    }
}
