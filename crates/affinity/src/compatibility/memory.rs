//! Mutex-backed collaborators for tests, demos and single-node deployments.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::domain::{CompatibilityResult, ConfirmedScore, PairKey, Profile, ProfileId};
use super::store::{LocalCache, ProfileError, ProfileProvider, ScoreStore, StoreError};

#[derive(Default, Clone)]
pub struct InMemoryScoreStore {
    records: Arc<Mutex<HashMap<PairKey, ConfirmedScore>>>,
    reads: Arc<Mutex<usize>>,
}

impl InMemoryScoreStore {
    /// Number of `get_confirmed` calls served so far.
    pub fn reads(&self) -> usize {
        *self.reads.lock().expect("store mutex poisoned")
    }

    pub fn len(&self) -> usize {
        self.records.lock().expect("store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ScoreStore for InMemoryScoreStore {
    fn get_confirmed(&self, pair: &PairKey) -> Result<Option<ConfirmedScore>, StoreError> {
        *self.reads.lock().expect("store mutex poisoned") += 1;
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.get(pair).cloned())
    }

    fn create(
        &self,
        pair: &PairKey,
        score: u8,
        explanation: Option<String>,
    ) -> Result<ConfirmedScore, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if guard.contains_key(pair) {
            return Err(StoreError::Conflict(pair.clone()));
        }
        let record = ConfirmedScore {
            pair: pair.clone(),
            score,
            explanation,
            created_at: Utc::now(),
        };
        guard.insert(pair.clone(), record.clone());
        Ok(record)
    }

    fn delete(&self, pair: &PairKey) -> Result<bool, StoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.remove(pair).is_some())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryScoreCache {
    entries: Arc<Mutex<HashMap<PairKey, CompatibilityResult>>>,
}

impl InMemoryScoreCache {
    pub fn contains(&self, pair: &PairKey) -> bool {
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .contains_key(pair)
    }
}

impl LocalCache for InMemoryScoreCache {
    fn get(&self, pair: &PairKey) -> Option<CompatibilityResult> {
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .get(pair)
            .cloned()
    }

    fn set(&self, pair: PairKey, result: CompatibilityResult) {
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .insert(pair, result);
    }

    fn delete(&self, pair: &PairKey) {
        self.entries
            .lock()
            .expect("cache mutex poisoned")
            .remove(pair);
    }
}

#[derive(Default, Clone)]
pub struct InMemoryProfileDirectory {
    profiles: Arc<Mutex<BTreeMap<ProfileId, Profile>>>,
}

impl InMemoryProfileDirectory {
    pub fn from_profiles(profiles: impl IntoIterator<Item = Profile>) -> Self {
        let directory = Self::default();
        for profile in profiles {
            directory.upsert(profile);
        }
        directory
    }

    pub fn upsert(&self, profile: Profile) {
        self.profiles
            .lock()
            .expect("directory mutex poisoned")
            .insert(profile.id.clone(), profile);
    }

    pub fn len(&self) -> usize {
        self.profiles.lock().expect("directory mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProfileProvider for InMemoryProfileDirectory {
    fn fetch(&self, id: &ProfileId) -> Result<Option<Profile>, ProfileError> {
        let guard = self.profiles.lock().expect("directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn all(&self) -> Result<Vec<Profile>, ProfileError> {
        let guard = self.profiles.lock().expect("directory mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}
