use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{CompatibilityResult, PairKey, Profile, ProfileId};
use super::estimation::{CompatibilityEstimator, EstimatorConfig};
use super::pass::{sort_candidates, RankedCandidate, ScoringPass, ViewerMatches};
use super::store::{LocalCache, ProfileError, ProfileProvider, ScoreStore, StoreError};

/// Highest score a confirmed analysis may carry.
pub const CONFIRMED_SCORE_MAX: u8 = 100;

/// Service reconciling heuristic estimates with confirmed scores.
///
/// The store is the single source of truth; the cache only speeds up
/// redisplay and is corrected on every store read.
pub struct CompatibilityService<P, S, C> {
    profiles: Arc<P>,
    store: Arc<S>,
    cache: Arc<C>,
    estimator: Arc<CompatibilityEstimator>,
}

impl<P, S, C> CompatibilityService<P, S, C>
where
    P: ProfileProvider + 'static,
    S: ScoreStore + 'static,
    C: LocalCache + 'static,
{
    pub fn new(profiles: Arc<P>, store: Arc<S>, cache: Arc<C>, config: EstimatorConfig) -> Self {
        Self {
            profiles,
            store,
            cache,
            estimator: Arc::new(CompatibilityEstimator::new(config)),
        }
    }

    pub fn estimator(&self) -> &CompatibilityEstimator {
        &self.estimator
    }

    /// Fresh heuristic estimate; never stored.
    pub fn estimate(&self, a: &Profile, b: &Profile) -> CompatibilityResult {
        CompatibilityResult::estimated(self.estimator.score(a, b))
    }

    /// What to show right away: the cached confirmed score when present,
    /// otherwise an estimate. Does not touch the store.
    pub fn display(&self, a: &Profile, b: &Profile) -> CompatibilityResult {
        let pair = PairKey::for_profiles(a, b);
        match self.cache.get(&pair) {
            Some(cached) => cached,
            None => self.estimate(a, b),
        }
    }

    /// Re-validates the pair against the store. The store's answer overwrites
    /// both the cache and the displayed result.
    pub fn reconcile(&self, a: &Profile, b: &Profile) -> Reconciliation {
        let pair = PairKey::for_profiles(a, b);
        let cached = self.cache.get(&pair);

        match self.store.get_confirmed(&pair) {
            Ok(Some(record)) => {
                let result = CompatibilityResult::from(record);
                let transition = match &cached {
                    None => ScoreTransition::Confirmed,
                    Some(previous) if *previous == result => ScoreTransition::Unchanged,
                    Some(_) => ScoreTransition::Refreshed,
                };
                self.cache.set(pair.clone(), result.clone());
                debug!(%pair, score = result.score, ?transition, "confirmed score verified");
                Reconciliation {
                    pair,
                    result,
                    transition,
                }
            }
            Ok(None) => {
                let transition = if cached.is_some() {
                    self.cache.delete(&pair);
                    info!(%pair, "confirmed score deleted upstream; reverting to estimate");
                    ScoreTransition::Reverted
                } else {
                    ScoreTransition::Unchanged
                };
                Reconciliation {
                    result: self.estimate(a, b),
                    pair,
                    transition,
                }
            }
            Err(err) => {
                warn!(%pair, error = %err, "score store unreachable; showing estimate");
                Reconciliation {
                    result: self.estimate(a, b),
                    pair,
                    transition: ScoreTransition::StoreUnavailable,
                }
            }
        }
    }

    /// Per-view policy: show the cached value first, then always re-verify.
    pub fn view(&self, a: &Profile, b: &Profile) -> PairView {
        let provisional = self.display(a, b);
        let Reconciliation {
            pair,
            result,
            transition,
        } = self.reconcile(a, b);

        PairView {
            pair,
            provisional,
            settled: result,
            transition,
        }
    }

    /// Persists a confirmed score and mirrors it into the cache.
    pub fn confirm(
        &self,
        a: &Profile,
        b: &Profile,
        score: u8,
        explanation: Option<String>,
    ) -> Result<CompatibilityResult, CompatibilityServiceError> {
        if score > CONFIRMED_SCORE_MAX {
            return Err(CompatibilityServiceError::ScoreOutOfRange(score));
        }

        let pair = PairKey::for_profiles(a, b);
        let record = match self.store.create(&pair, score, explanation) {
            Ok(record) => record,
            Err(StoreError::Conflict(existing)) => match self.store.get_confirmed(&pair)? {
                Some(record) => {
                    debug!(%pair, "pair already confirmed; keeping stored score");
                    record
                }
                None => return Err(StoreError::Conflict(existing).into()),
            },
            Err(err) => return Err(err.into()),
        };

        let result = CompatibilityResult::from(record);
        self.cache.set(pair.clone(), result.clone());
        info!(%pair, score = result.score, "confirmed score recorded");
        Ok(result)
    }

    /// Drops the confirmed record and its cache entry so the pair is estimated again.
    pub fn invalidate(&self, pair: &PairKey) -> Result<bool, CompatibilityServiceError> {
        let existed = self.store.delete(pair)?;
        self.cache.delete(pair);
        info!(%pair, existed, "confirmed score invalidated");
        Ok(existed)
    }

    /// Ranks candidates for a viewer with a fresh scoring pass.
    pub fn rank(&self, viewer: &Profile, candidates: &[Profile]) -> Vec<RankedCandidate> {
        let mut pass = ScoringPass::new(&self.estimator);
        self.rank_with(&mut pass, viewer, candidates)
    }

    /// Ranks candidates for a viewer, reusing estimates already held by `pass`.
    ///
    /// Pairs with a cached confirmed score are reconciled against the store
    /// first; everything else is estimated.
    pub fn rank_with(
        &self,
        pass: &mut ScoringPass<'_>,
        viewer: &Profile,
        candidates: &[Profile],
    ) -> Vec<RankedCandidate> {
        let mut ranked: Vec<RankedCandidate> = candidates
            .iter()
            .filter(|candidate| candidate.id != viewer.id)
            .map(|candidate| {
                let pair = PairKey::for_profiles(viewer, candidate);
                let result = match self.cache.get(&pair) {
                    Some(_) => self.reconcile(viewer, candidate).result,
                    None => CompatibilityResult::estimated(pass.score(viewer, candidate)),
                };
                RankedCandidate {
                    profile_id: candidate.id.clone(),
                    result,
                }
            })
            .collect();

        sort_candidates(&mut ranked);
        ranked
    }

    /// Match lists for every profile in the directory. The listings share one
    /// scoring pass, so each pair is estimated once.
    pub fn rank_everyone(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<ViewerMatches>, CompatibilityServiceError> {
        let profiles = self.profiles.all()?;
        let mut pass = ScoringPass::new(&self.estimator);
        let listings = profiles
            .iter()
            .map(|viewer| {
                let mut matches = self.rank_with(&mut pass, viewer, &profiles);
                if let Some(limit) = limit {
                    matches.truncate(limit);
                }
                ViewerMatches {
                    viewer: viewer.id.clone(),
                    matches,
                }
            })
            .collect();
        debug!(profiles = profiles.len(), pairs = pass.len(), "ranked every profile");
        Ok(listings)
    }

    pub fn view_by_id(
        &self,
        viewer: &ProfileId,
        subject: &ProfileId,
    ) -> Result<PairView, CompatibilityServiceError> {
        let viewer = self.resolve(viewer)?;
        let subject = self.resolve(subject)?;
        Ok(self.view(&viewer, &subject))
    }

    pub fn confirm_by_id(
        &self,
        viewer: &ProfileId,
        subject: &ProfileId,
        score: u8,
        explanation: Option<String>,
    ) -> Result<CompatibilityResult, CompatibilityServiceError> {
        let viewer = self.resolve(viewer)?;
        let subject = self.resolve(subject)?;
        self.confirm(&viewer, &subject, score, explanation)
    }

    pub fn rank_for(
        &self,
        viewer: &ProfileId,
        limit: Option<usize>,
    ) -> Result<Vec<RankedCandidate>, CompatibilityServiceError> {
        let viewer = self.resolve(viewer)?;
        let candidates = self.profiles.all()?;
        let mut ranked = self.rank(&viewer, &candidates);
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }
        Ok(ranked)
    }

    fn resolve(&self, id: &ProfileId) -> Result<Profile, CompatibilityServiceError> {
        self.profiles
            .fetch(id)?
            .ok_or_else(|| CompatibilityServiceError::ProfileNotFound(id.clone()))
    }
}

/// How a reconciliation changed what is displayed for a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTransition {
    Unchanged,
    /// Estimated before, confirmed now.
    Confirmed,
    /// Still confirmed, but the stored value differs from the cached one.
    Refreshed,
    /// Cached confirmed score no longer backed by the store.
    Reverted,
    StoreUnavailable,
}

/// Outcome of one store read for a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    pub pair: PairKey,
    pub result: CompatibilityResult,
    pub transition: ScoreTransition,
}

/// Everything a pair view needs: the immediate value and the verified one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairView {
    pub pair: PairKey,
    pub provisional: CompatibilityResult,
    pub settled: CompatibilityResult,
    pub transition: ScoreTransition,
}

/// Error raised by the compatibility service.
#[derive(Debug, thiserror::Error)]
pub enum CompatibilityServiceError {
    #[error("confirmed score {0} is outside 0..=100")]
    ScoreOutOfRange(u8),
    #[error("profile {0} not found")]
    ProfileNotFound(ProfileId),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
