use affinity::compatibility::{
    CompatibilityEstimator, CompatibilityService, InMemoryProfileDirectory, InMemoryScoreCache,
    InMemoryScoreStore, PersonalityTraits, Profile, ProfileCsvImporter,
};
use affinity::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type ApiService =
    CompatibilityService<InMemoryProfileDirectory, InMemoryScoreStore, InMemoryScoreCache>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) estimator: Arc<CompatibilityEstimator>,
}

/// Loads a CSV export into a fresh directory, or an empty one when no path is given.
pub(crate) fn load_directory(path: Option<&Path>) -> Result<InMemoryProfileDirectory, AppError> {
    match path {
        Some(path) => {
            let profiles = ProfileCsvImporter::from_path(path)?;
            Ok(InMemoryProfileDirectory::from_profiles(profiles))
        }
        None => Ok(InMemoryProfileDirectory::default()),
    }
}

/// Small cast used by the demo command.
pub(crate) fn demo_profiles() -> Vec<Profile> {
    let mut lucia = Profile {
        zodiac_sign: Some("♌ Leone".to_string()),
        personality: PersonalityTraits {
            mind: Some(62.0),
            energy: Some(40.0),
            nature: Some(75.0),
            tactics: Some(30.0),
        },
        age: Some(27),
        ..Profile::new("lucia")
    };
    lucia.interests.hobbies = Some("arrampicata, fotografia, cucina vegana".to_string());
    lucia.interests.music_genres = Some("indie, jazz".to_string());
    lucia.interests.streaming_channels = Some("Dario Moccia, Cerbero Podcast".to_string());
    lucia.answers.question_one = Some("Un viaggio in treno attraverso il Giappone".to_string());

    let mut marco = Profile {
        zodiac_sign: Some("♐ Sagittario".to_string()),
        personality: PersonalityTraits {
            mind: Some(55.0),
            energy: Some(48.0),
            nature: Some(70.0),
            tactics: None,
        },
        age: Some(29),
        ..Profile::new("marco")
    };
    marco.interests.free_time = Some("fotografia e arrampicata in falesia".to_string());
    marco.interests.music_artists = Some("Verdena, jazz manouche".to_string());
    marco.interests.video_subscriptions = Some("Cerbero Podcast".to_string());
    marco.answers.question_two = Some("Giappone, sicuramente in treno".to_string());

    let mut greta = Profile {
        zodiac_sign: Some("♉ Toro".to_string()),
        personality: PersonalityTraits::uniform(20.0),
        age: Some(41),
        ..Profile::new("greta")
    };
    greta.interests.hobbies = Some("giardinaggio, ceramica".to_string());

    vec![lucia, marco, greta]
}
