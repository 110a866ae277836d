use std::sync::Arc;

use super::common::*;
use crate::compatibility::domain::{PairKey, ProfileId, ScoreOrigin};
use crate::compatibility::estimation::EstimatorConfig;
use crate::compatibility::memory::{InMemoryProfileDirectory, InMemoryScoreCache};
use crate::compatibility::pass::ScoringPass;
use crate::compatibility::service::{
    CompatibilityService, CompatibilityServiceError, ScoreTransition,
};
use crate::compatibility::store::{LocalCache, ScoreStore, StoreError};

#[test]
fn deleted_upstream_record_reverts_to_estimate_and_purges_cache() {
    let lucia = leo_profile("lucia", 25);
    let marco = leo_profile("marco", 26);
    let (service, _store, cache) = build_service(vec![lucia.clone(), marco.clone()]);
    let pair = PairKey::for_profiles(&lucia, &marco);
    cache.set(pair.clone(), confirmed(93));

    let reconciliation = service.reconcile(&lucia, &marco);

    assert_eq!(reconciliation.transition, ScoreTransition::Reverted);
    assert_eq!(reconciliation.result.origin, ScoreOrigin::Estimated);
    assert_eq!(reconciliation.result.score, 58);
    assert!(!cache.contains(&pair));
}

#[test]
fn confirmed_score_is_served_from_cache_until_next_reconciliation() {
    let lucia = leo_profile("lucia", 25);
    let marco = leo_profile("marco", 26);
    let (service, store, _cache) = build_service(vec![lucia.clone(), marco.clone()]);

    let created = service
        .confirm(&lucia, &marco, 92, Some("valori condivisi".to_string()))
        .expect("confirm succeeds");
    assert_eq!(created.score, 92);
    assert_eq!(created.origin, ScoreOrigin::Confirmed);

    let reads_before = store.reads();
    let shown = service.display(&marco, &lucia);
    assert_eq!(shown.score, 92);
    assert_eq!(shown.origin, ScoreOrigin::Confirmed);
    assert_eq!(shown.explanation.as_deref(), Some("valori condivisi"));
    assert_eq!(store.reads(), reads_before, "display must not query the store");

    let view = service.view(&lucia, &marco);
    assert_eq!(store.reads(), reads_before + 1);
    assert_eq!(view.provisional, view.settled);
    assert_eq!(view.transition, ScoreTransition::Unchanged);
}

#[test]
fn view_shows_cache_first_then_store_answer() {
    let lucia = leo_profile("lucia", 25);
    let marco = leo_profile("marco", 26);
    let (service, store, cache) = build_service(vec![lucia.clone(), marco.clone()]);
    let pair = PairKey::for_profiles(&lucia, &marco);
    cache.set(pair.clone(), confirmed(70));
    store
        .create(&pair, 91, Some("rigenerata".to_string()))
        .expect("seed store");

    let view = service.view(&lucia, &marco);

    assert_eq!(view.provisional.score, 70);
    assert_eq!(view.settled.score, 91);
    assert_eq!(view.transition, ScoreTransition::Refreshed);
    assert_eq!(cache.get(&pair).map(|result| result.score), Some(91));
}

#[test]
fn record_created_elsewhere_is_picked_up() {
    let lucia = leo_profile("lucia", 25);
    let marco = leo_profile("marco", 26);
    let (service, store, cache) = build_service(vec![lucia.clone(), marco.clone()]);
    let pair = PairKey::for_profiles(&lucia, &marco);
    store.create(&pair, 95, None).expect("seed store");

    let view = service.view(&marco, &lucia);

    assert_eq!(view.provisional.origin, ScoreOrigin::Estimated);
    assert_eq!(view.settled.score, 95);
    assert_eq!(view.transition, ScoreTransition::Confirmed);
    assert!(cache.contains(&pair));
}

#[test]
fn unreachable_store_falls_back_to_estimate_and_keeps_cache() {
    let lucia = leo_profile("lucia", 25);
    let marco = leo_profile("marco", 26);
    let cache = Arc::new(InMemoryScoreCache::default());
    let service = CompatibilityService::new(
        Arc::new(InMemoryProfileDirectory::default()),
        Arc::new(UnavailableStore),
        cache.clone(),
        EstimatorConfig::default(),
    );
    let pair = PairKey::for_profiles(&lucia, &marco);
    cache.set(pair.clone(), confirmed(90));

    let reconciliation = service.reconcile(&lucia, &marco);

    assert_eq!(reconciliation.transition, ScoreTransition::StoreUnavailable);
    assert_eq!(reconciliation.result.origin, ScoreOrigin::Estimated);
    assert_eq!(reconciliation.result.score, 58);
    assert!(cache.contains(&pair));
}

#[test]
fn confirm_surfaces_store_failures() {
    let service = CompatibilityService::new(
        Arc::new(InMemoryProfileDirectory::default()),
        Arc::new(UnavailableStore),
        Arc::new(InMemoryScoreCache::default()),
        EstimatorConfig::default(),
    );

    match service.confirm(&leo_profile("lucia", 25), &leo_profile("marco", 26), 90, None) {
        Err(CompatibilityServiceError::Store(StoreError::Unavailable(_))) => {}
        other => panic!("expected store unavailable, got {other:?}"),
    }
}

#[test]
fn confirm_rejects_scores_above_hundred() {
    let (service, store, _) = build_service(Vec::new());

    match service.confirm(&leo_profile("lucia", 25), &leo_profile("marco", 26), 101, None) {
        Err(CompatibilityServiceError::ScoreOutOfRange(101)) => {}
        other => panic!("expected out of range error, got {other:?}"),
    }
    assert!(store.is_empty());
}

#[test]
fn confirm_conflict_keeps_stored_record() {
    let lucia = leo_profile("lucia", 25);
    let marco = leo_profile("marco", 26);
    let pair = PairKey::for_profiles(&lucia, &marco);
    let cache = Arc::new(InMemoryScoreCache::default());
    let service = CompatibilityService::new(
        Arc::new(InMemoryProfileDirectory::default()),
        Arc::new(RacingStore::holding(pair.clone(), 97)),
        cache.clone(),
        EstimatorConfig::default(),
    );

    let result = service
        .confirm(&lucia, &marco, 90, None)
        .expect("conflict resolves to stored record");

    assert_eq!(result.score, 97);
    assert_eq!(cache.get(&pair).map(|cached| cached.score), Some(97));
}

#[test]
fn invalidate_clears_store_and_cache() {
    let lucia = leo_profile("lucia", 25);
    let marco = leo_profile("marco", 26);
    let (service, store, cache) = build_service(vec![lucia.clone(), marco.clone()]);
    service
        .confirm(&lucia, &marco, 92, None)
        .expect("confirm succeeds");
    let pair = PairKey::for_profiles(&lucia, &marco);

    assert!(service.invalidate(&pair).expect("invalidate succeeds"));
    assert!(store.is_empty());
    assert!(!cache.contains(&pair));
    assert!(!service.invalidate(&pair).expect("second invalidate succeeds"));

    let shown = service.display(&lucia, &marco);
    assert_eq!(shown.origin, ScoreOrigin::Estimated);
    assert_eq!(shown.score, 58);
}

#[test]
fn rank_prefers_cached_confirmed_scores_and_skips_viewer() {
    let lucia = leo_profile("lucia", 25);
    let marco = leo_profile("marco", 26);
    let elena = aged_profile("elena", 40);
    let greta = rich_profile("greta");
    let (service, _, _) = build_service(Vec::new());
    service
        .confirm(&lucia, &elena, 99, None)
        .expect("confirm succeeds");

    let candidates = vec![lucia.clone(), marco, elena, greta];
    let ranked = service.rank(&lucia, &candidates);

    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].profile_id, ProfileId::new("elena"));
    assert_eq!(ranked[0].result.origin, ScoreOrigin::Confirmed);
    assert!(ranked
        .iter()
        .all(|candidate| candidate.profile_id != lucia.id));
    assert!(ranked
        .windows(2)
        .all(|pair| pair[0].result.score >= pair[1].result.score));
}

#[test]
fn rank_for_resolves_viewer_and_applies_limit() {
    let (service, _, _) = build_service(vec![
        leo_profile("lucia", 25),
        leo_profile("marco", 26),
        rich_profile("greta"),
        aged_profile("elena", 33),
    ]);

    let ranked = service
        .rank_for(&ProfileId::new("lucia"), Some(2))
        .expect("ranking succeeds");
    assert_eq!(ranked.len(), 2);

    match service.rank_for(&ProfileId::new("ghost"), None) {
        Err(CompatibilityServiceError::ProfileNotFound(id)) => assert_eq!(id.as_str(), "ghost"),
        other => panic!("expected profile not found, got {other:?}"),
    }
}

#[test]
fn view_by_id_reports_missing_subject() {
    let (service, _, _) = build_service(vec![leo_profile("lucia", 25)]);

    match service.view_by_id(&ProfileId::new("lucia"), &ProfileId::new("marco")) {
        Err(CompatibilityServiceError::ProfileNotFound(id)) => assert_eq!(id.as_str(), "marco"),
        other => panic!("expected profile not found, got {other:?}"),
    }
}

#[test]
fn ranking_drops_confirmed_score_deleted_upstream() {
    let lucia = leo_profile("lucia", 25);
    let marco = leo_profile("marco", 26);
    let (service, store, cache) = build_service(vec![lucia.clone(), marco.clone()]);
    service
        .confirm(&lucia, &marco, 99, None)
        .expect("confirm succeeds");
    let pair = PairKey::for_profiles(&lucia, &marco);
    assert!(store.delete(&pair).expect("delete succeeds"));

    let ranked = service
        .rank_for(&ProfileId::new("lucia"), None)
        .expect("ranking succeeds");

    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].result.origin, ScoreOrigin::Estimated);
    assert_eq!(ranked[0].result.score, 58);
    assert!(!cache.contains(&pair));
}

#[test]
fn ranking_picks_up_refreshed_confirmed_score() {
    let lucia = leo_profile("lucia", 25);
    let marco = leo_profile("marco", 26);
    let (service, store, cache) = build_service(vec![lucia.clone(), marco.clone()]);
    let pair = PairKey::for_profiles(&lucia, &marco);
    cache.set(pair.clone(), confirmed(60));
    store.create(&pair, 88, None).expect("seed store");

    let ranked = service.rank(&lucia, &[marco]);

    assert_eq!(ranked[0].result.score, 88);
    assert_eq!(ranked[0].result.origin, ScoreOrigin::Confirmed);
}

#[test]
fn ids_sharing_the_separator_do_not_share_confirmed_scores() {
    let first = leo_profile("a_b", 25);
    let second = leo_profile("c", 26);
    let third = leo_profile("a", 25);
    let fourth = leo_profile("b_c", 26);
    let (service, store, _cache) = build_service(Vec::new());

    service
        .confirm(&first, &second, 97, Some("altra coppia".to_string()))
        .expect("confirm succeeds");
    let view = service.view(&third, &fourth);

    assert_eq!(store.len(), 1);
    assert_eq!(view.provisional.origin, ScoreOrigin::Estimated);
    assert_eq!(view.settled.origin, ScoreOrigin::Estimated);
    assert_eq!(view.settled.explanation, None);
    assert_eq!(view.transition, ScoreTransition::Unchanged);
}

#[test]
fn ranking_everyone_estimates_each_pair_once() {
    let profiles = vec![
        leo_profile("lucia", 25),
        leo_profile("marco", 26),
        rich_profile("greta"),
    ];
    let (service, _, _) = build_service(profiles.clone());

    let mut pass = ScoringPass::new(service.estimator());
    for viewer in &profiles {
        let ranked = service.rank_with(&mut pass, viewer, &profiles);
        assert_eq!(ranked.len(), 2);
    }
    assert_eq!(pass.len(), 3);

    let listings = service.rank_everyone(Some(1)).expect("ranking succeeds");
    assert_eq!(listings.len(), 3);
    assert!(listings.iter().all(|listing| listing.matches.len() == 1));
    let lucia = listings
        .iter()
        .find(|listing| listing.viewer == ProfileId::new("lucia"))
        .expect("lucia listed");
    assert_eq!(lucia.matches[0].profile_id, ProfileId::new("marco"));
}
