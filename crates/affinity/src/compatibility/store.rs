use super::domain::{CompatibilityResult, ConfirmedScore, PairKey, Profile, ProfileId};

/// Authoritative store for confirmed scores.
pub trait ScoreStore: Send + Sync {
    fn get_confirmed(&self, pair: &PairKey) -> Result<Option<ConfirmedScore>, StoreError>;
    fn create(
        &self,
        pair: &PairKey,
        score: u8,
        explanation: Option<String>,
    ) -> Result<ConfirmedScore, StoreError>;
    /// Removes the record, returning whether one existed.
    fn delete(&self, pair: &PairKey) -> Result<bool, StoreError>;
}

/// Error enumeration for score store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("a confirmed score already exists for {0}")]
    Conflict(PairKey),
    #[error("score store unavailable: {0}")]
    Unavailable(String),
}

/// Client-side mirror of confirmed scores, keyed by pair.
///
/// Only ever holds CONFIRMED results; it is corrected after every store read.
pub trait LocalCache: Send + Sync {
    fn get(&self, pair: &PairKey) -> Option<CompatibilityResult>;
    fn set(&self, pair: PairKey, result: CompatibilityResult);
    fn delete(&self, pair: &PairKey);
}

/// Source of member profiles.
pub trait ProfileProvider: Send + Sync {
    fn fetch(&self, id: &ProfileId) -> Result<Option<Profile>, ProfileError>;
    /// Every known profile, used when ranking candidates.
    fn all(&self) -> Result<Vec<Profile>, ProfileError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("profile provider unavailable: {0}")]
    Unavailable(String),
}
