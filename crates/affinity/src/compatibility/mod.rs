//! Pairwise compatibility: the heuristic estimate, the confirmed tier, and
//! the reconciliation between them.

pub mod domain;
pub mod estimation;
pub mod import;
pub mod memory;
pub mod pass;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use domain::{
    CompatibilityResult, ConfirmedScore, Element, InterestFields, PairKey, PersonalityTraits,
    Profile, ProfileId, QuestionAnswers, ScoreOrigin, ZodiacSign,
};
pub use estimation::{
    compute_estimated_score, AffinityFactor, CompatibilityEstimator, EstimatedScore,
    EstimatorConfig, OverlapWeights, ScoreComponent,
};
pub use import::{ProfileCsvImporter, ProfileImportError};
pub use memory::{InMemoryProfileDirectory, InMemoryScoreCache, InMemoryScoreStore};
pub use pass::{RankedCandidate, ScoringPass, ViewerMatches};
pub use router::compatibility_router;
pub use service::{
    CompatibilityService, CompatibilityServiceError, PairView, Reconciliation, ScoreTransition,
    CONFIRMED_SCORE_MAX,
};
pub use store::{LocalCache, ProfileError, ProfileProvider, ScoreStore, StoreError};
