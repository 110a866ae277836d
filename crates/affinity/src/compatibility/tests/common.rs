use std::sync::Arc;

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::compatibility::domain::{
    CompatibilityResult, ConfirmedScore, PairKey, PersonalityTraits, Profile, ScoreOrigin,
};
use crate::compatibility::estimation::EstimatorConfig;
use crate::compatibility::memory::{
    InMemoryProfileDirectory, InMemoryScoreCache, InMemoryScoreStore,
};
use crate::compatibility::service::CompatibilityService;
use crate::compatibility::store::{ScoreStore, StoreError};

pub(super) type MemoryService =
    CompatibilityService<InMemoryProfileDirectory, InMemoryScoreStore, InMemoryScoreCache>;

pub(super) fn leo_profile(id: &str, age: u16) -> Profile {
    Profile {
        zodiac_sign: Some("♌ Leone".to_string()),
        personality: PersonalityTraits::uniform(50.0),
        age: Some(age),
        ..Profile::new(id)
    }
}

pub(super) fn streaming_profile(id: &str, channels: &str) -> Profile {
    let mut profile = Profile::new(id);
    profile.interests.streaming_channels = Some(channels.to_string());
    profile
}

pub(super) fn aged_profile(id: &str, age: u16) -> Profile {
    Profile {
        age: Some(age),
        ..Profile::new(id)
    }
}

pub(super) fn signed_profile(id: &str, sign: &str) -> Profile {
    Profile {
        zodiac_sign: Some(sign.to_string()),
        ..Profile::new(id)
    }
}

/// A fully populated profile used where the exact score does not matter.
pub(super) fn rich_profile(id: &str) -> Profile {
    let mut profile = Profile {
        zodiac_sign: Some("♓ Pesci".to_string()),
        personality: PersonalityTraits {
            mind: Some(35.0),
            energy: Some(80.0),
            nature: Some(62.5),
            tactics: Some(10.0),
        },
        age: Some(31),
        ..Profile::new(id)
    };
    profile.interests.hobbies = Some("arrampicata, fotografia analogica".to_string());
    profile.interests.bio = Some("Sviluppatrice, amo la montagna e i gatti".to_string());
    profile.interests.music_genres = Some("indie, jazz".to_string());
    profile.interests.music_artists = Some("Calcutta, Verdena".to_string());
    profile.interests.streaming_channels = Some("Dario Moccia".to_string());
    profile.answers.question_one = Some("Un weekend in montagna con la tenda".to_string());
    profile
}

pub(super) fn confirmed(score: u8) -> CompatibilityResult {
    CompatibilityResult {
        score,
        explanation: Some("analisi approfondita".to_string()),
        origin: ScoreOrigin::Confirmed,
    }
}

pub(super) fn build_service(
    profiles: Vec<Profile>,
) -> (
    MemoryService,
    Arc<InMemoryScoreStore>,
    Arc<InMemoryScoreCache>,
) {
    let directory = Arc::new(InMemoryProfileDirectory::from_profiles(profiles));
    let store = Arc::new(InMemoryScoreStore::default());
    let cache = Arc::new(InMemoryScoreCache::default());
    let service = CompatibilityService::new(
        directory,
        store.clone(),
        cache.clone(),
        EstimatorConfig::default(),
    );
    (service, store, cache)
}

pub(super) struct UnavailableStore;

impl ScoreStore for UnavailableStore {
    fn get_confirmed(&self, _pair: &PairKey) -> Result<Option<ConfirmedScore>, StoreError> {
        Err(StoreError::Unavailable("connection reset".to_string()))
    }

    fn create(
        &self,
        _pair: &PairKey,
        _score: u8,
        _explanation: Option<String>,
    ) -> Result<ConfirmedScore, StoreError> {
        Err(StoreError::Unavailable("connection reset".to_string()))
    }

    fn delete(&self, _pair: &PairKey) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection reset".to_string()))
    }
}

/// Store that always reports a conflict on create and then serves `existing`.
pub(super) struct RacingStore {
    pub(super) existing: ConfirmedScore,
}

impl RacingStore {
    pub(super) fn holding(pair: PairKey, score: u8) -> Self {
        Self {
            existing: ConfirmedScore {
                pair,
                score,
                explanation: Some("generated on another device".to_string()),
                created_at: Utc::now(),
            },
        }
    }
}

impl ScoreStore for RacingStore {
    fn get_confirmed(&self, _pair: &PairKey) -> Result<Option<ConfirmedScore>, StoreError> {
        Ok(Some(self.existing.clone()))
    }

    fn create(
        &self,
        pair: &PairKey,
        _score: u8,
        _explanation: Option<String>,
    ) -> Result<ConfirmedScore, StoreError> {
        Err(StoreError::Conflict(pair.clone()))
    }

    fn delete(&self, _pair: &PairKey) -> Result<bool, StoreError> {
        Ok(false)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
