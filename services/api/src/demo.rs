use crate::infra::{demo_profiles, load_directory, ApiService};
use affinity::compatibility::{
    CompatibilityEstimator, CompatibilityService, CompatibilityServiceError, EstimatedScore,
    InMemoryProfileDirectory, InMemoryScoreCache, InMemoryScoreStore, PairKey, PairView, Profile,
    ProfileId, ProfileProvider, RankedCandidate, ScoreStore,
};
use affinity::config::AppConfig;
use affinity::error::AppError;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// CSV profile export containing both profiles
    #[arg(long)]
    pub(crate) profiles: PathBuf,
    /// First profile identifier
    pub(crate) first: String,
    /// Second profile identifier
    pub(crate) second: String,
}

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// CSV profile export with the viewer and its candidates
    #[arg(long)]
    pub(crate) profiles: PathBuf,
    /// Profile identifier to rank candidates for; every profile when omitted
    pub(crate) viewer: Option<String>,
    /// Only print the best N candidates
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        profiles,
        first,
        second,
    } = args;

    let config = AppConfig::load()?;
    let directory = load_directory(Some(&profiles))?;
    let first = fetch_profile(&directory, first)?;
    let second = fetch_profile(&directory, second)?;

    let estimator = CompatibilityEstimator::new(config.estimator);
    let estimate = estimator.estimate(&first, &second);
    render_estimate(&estimate);
    Ok(())
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        profiles,
        viewer,
        limit,
    } = args;

    let config = AppConfig::load()?;
    let service = build_service(load_directory(Some(&profiles))?, &config);
    match viewer {
        Some(viewer) => {
            let ranked = service.rank_for(&ProfileId(viewer.clone()), limit)?;
            println!("Candidates for {viewer}");
            render_ranking(&ranked);
        }
        None => {
            for listing in service.rank_everyone(limit)? {
                println!("Candidates for {}", listing.viewer);
                render_ranking(&listing.matches);
            }
        }
    }
    Ok(())
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    let directory = Arc::new(InMemoryProfileDirectory::from_profiles(demo_profiles()));
    let store = Arc::new(InMemoryScoreStore::default());
    let cache = Arc::new(InMemoryScoreCache::default());
    let service = CompatibilityService::new(directory, store.clone(), cache, Default::default());
    let lucia = ProfileId::new("lucia");
    let marco = ProfileId::new("marco");

    println!("Compatibility reconciliation demo");

    println!("\n1. First visit, nothing confirmed yet");
    let view = service.view_by_id(&lucia, &marco)?;
    render_view(&view);

    println!("\n2. Deeper analysis recorded");
    let confirmed = service.confirm_by_id(
        &lucia,
        &marco,
        92,
        Some("Shared outdoor hobbies and travel plans".to_string()),
    )?;
    println!(
        "- stored {} score {} ({})",
        confirmed.origin.label(),
        confirmed.score,
        confirmed.explanation.as_deref().unwrap_or("no explanation")
    );

    println!("\n3. Revisit, served from cache and re-verified");
    let view = service.view_by_id(&marco, &lucia)?;
    render_view(&view);

    println!("\n4. Record removed upstream");
    let pair = PairKey::new(&lucia, &marco);
    match store.delete(&pair) {
        Ok(existed) => println!("- store delete for {pair}: existed={existed}"),
        Err(err) => println!("- store unavailable: {err}"),
    }
    let view = service.view_by_id(&lucia, &marco)?;
    render_view(&view);

    println!("\n5. Ranked matches for {lucia}");
    let ranked = service.rank_for(&lucia, None)?;
    render_ranking(&ranked);

    Ok(())
}

fn build_service(directory: InMemoryProfileDirectory, config: &AppConfig) -> ApiService {
    CompatibilityService::new(
        Arc::new(directory),
        Arc::new(InMemoryScoreStore::default()),
        Arc::new(InMemoryScoreCache::default()),
        config.estimator.clone(),
    )
}

fn fetch_profile(directory: &InMemoryProfileDirectory, id: String) -> Result<Profile, AppError> {
    let id = ProfileId(id);
    directory
        .fetch(&id)
        .map_err(CompatibilityServiceError::from)?
        .ok_or_else(|| CompatibilityServiceError::ProfileNotFound(id.clone()).into())
}

fn render_estimate(estimate: &EstimatedScore) {
    println!(
        "Estimated compatibility for {}: {} (raw {})",
        estimate.pair, estimate.score, estimate.raw_total
    );
    for component in &estimate.components {
        println!(
            "  - {:?}: {:+} ({})",
            component.factor, component.score, component.notes
        );
    }
}

fn render_view(view: &PairView) {
    println!(
        "- shown first: {} {}",
        view.provisional.origin.label(),
        view.provisional.score
    );
    println!(
        "- after store check: {} {} [{:?}]",
        view.settled.origin.label(),
        view.settled.score,
        view.transition
    );
}

fn render_ranking(ranked: &[RankedCandidate]) {
    if ranked.is_empty() {
        println!("- no candidates");
        return;
    }
    for (position, candidate) in ranked.iter().enumerate() {
        println!(
            "{:>3}. {} -> {} ({})",
            position + 1,
            candidate.profile_id,
            candidate.result.score,
            candidate.result.origin.label()
        );
    }
}
