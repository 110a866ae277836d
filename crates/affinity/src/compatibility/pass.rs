use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::domain::{CompatibilityResult, PairKey, Profile, ProfileId};
use super::estimation::CompatibilityEstimator;

/// Memoizes estimates for the duration of one render pass.
pub struct ScoringPass<'a> {
    estimator: &'a CompatibilityEstimator,
    memo: HashMap<PairKey, u8>,
}

impl<'a> ScoringPass<'a> {
    pub fn new(estimator: &'a CompatibilityEstimator) -> Self {
        Self {
            estimator,
            memo: HashMap::new(),
        }
    }

    pub fn score(&mut self, a: &Profile, b: &Profile) -> u8 {
        let estimator = self.estimator;
        *self
            .memo
            .entry(PairKey::for_profiles(a, b))
            .or_insert_with(|| estimator.score(a, b))
    }

    /// Distinct pairs computed in this pass.
    pub fn len(&self) -> usize {
        self.memo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }
}

/// Candidate entry in a viewer's ranked match list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub profile_id: ProfileId,
    pub result: CompatibilityResult,
}

/// One viewer's ranked match list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerMatches {
    pub viewer: ProfileId,
    pub matches: Vec<RankedCandidate>,
}

/// Highest score first; ties broken by identifier for a stable listing.
pub(crate) fn sort_candidates(candidates: &mut [RankedCandidate]) {
    candidates.sort_by(|left, right| match right.result.score.cmp(&left.result.score) {
        Ordering::Equal => left.profile_id.cmp(&right.profile_id),
        other => other,
    });
}
