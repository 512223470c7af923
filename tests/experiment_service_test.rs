mod helpers;

use std::sync::Arc;

use futures::future::join_all;
use sparklab::adapters::sqlite::{SqliteChampionStore, SqliteExperimentRepository};
use sparklab::domain::models::{ExperimentStatus, TrialOutcome, Variant};
use sparklab::services::ExperimentService;
use sparklab::DomainError;
use sqlx::SqlitePool;
use uuid::Uuid;

use helpers::database::{setup_test_db, teardown_test_db};

fn build_service(pool: &SqlitePool) -> Arc<ExperimentService> {
    let repo = Arc::new(SqliteExperimentRepository::new(pool.clone()));
    let store = Arc::new(SqliteChampionStore::new(pool.clone()));
    Arc::new(ExperimentService::new(repo, store))
}

fn scored(variant: Variant, joy_sparked: bool) -> TrialOutcome {
    TrialOutcome::Scored { variant, joy_sparked }
}

#[tokio::test]
async fn test_launch_rejects_non_positive_run_counts() {
    let pool = setup_test_db().await;
    let service = build_service(&pool);

    for runs in [0, -3] {
        let err = service.launch("challenger", runs).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidRunCount(_)));
    }

    // Rejection happens before any state is created.
    assert!(service.history(10).await.expect("failed to list").is_empty());

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_launch_rejects_while_another_experiment_is_pending() {
    let pool = setup_test_db().await;
    let service = build_service(&pool);

    let first = service.launch("challenger one", 3).await.expect("failed to launch");

    let err = service.launch("challenger two", 3).await.unwrap_err();
    match err {
        DomainError::ExperimentAlreadyActive(id) => assert_eq!(id, first.id),
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(service.history(10).await.expect("failed to list").len(), 1);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_launch_pits_challenger_against_current_champion() {
    let pool = setup_test_db().await;
    let service = build_service(&pool);

    let experiment = service.launch("You've got this", 4).await.expect("failed to launch");

    assert_eq!(experiment.variant_a, "You are doing great");
    assert_eq!(experiment.variant_b, "You've got this");
    assert_eq!(experiment.status, ExperimentStatus::Pending);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_outcome_for_unknown_experiment_is_swallowed() {
    let pool = setup_test_db().await;
    let service = build_service(&pool);

    // Fire-and-forget trials have no caller to answer to; a dangling
    // report must not error.
    service
        .record_outcome(Uuid::new_v4(), Uuid::new_v4(), scored(Variant::A, true))
        .await
        .expect("dangling outcome must be swallowed");

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_challenger_wins_and_is_promoted() {
    let pool = setup_test_db().await;
    let service = build_service(&pool);

    let experiment = service.launch("You've got this", 4).await.expect("failed to launch");

    for outcome in [
        scored(Variant::A, true),
        scored(Variant::A, false),
        scored(Variant::B, true),
        scored(Variant::B, true),
    ] {
        service
            .record_outcome(experiment.id, Uuid::new_v4(), outcome)
            .await
            .expect("failed to record outcome");
    }

    let settled = service.get(experiment.id).await.expect("failed to get").expect("missing");
    assert_eq!(settled.status, ExperimentStatus::Completed);
    assert_eq!(settled.variant_a_runs, 2);
    assert_eq!(settled.variant_a_successes, 1);
    assert_eq!(settled.variant_b_runs, 2);
    assert_eq!(settled.variant_b_successes, 2);
    assert_eq!(settled.variant_a_approval_rate, Some(0.5));
    assert_eq!(settled.variant_b_approval_rate, Some(1.0));

    let champion = service.champion().await.expect("failed to get champion");
    assert_eq!(champion.phrase, "You've got this");

    // The settled experiment no longer blocks new launches.
    service.launch("next challenger", 2).await.expect("failed to launch next");

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_all_failed_trials_complete_without_promotion() {
    let pool = setup_test_db().await;
    let service = build_service(&pool);

    let experiment = service.launch("challenger", 3).await.expect("failed to launch");

    for _ in 0..3 {
        service
            .record_outcome(experiment.id, Uuid::new_v4(), TrialOutcome::Failed)
            .await
            .expect("failed to record outcome");
    }

    let settled = service.get(experiment.id).await.expect("failed to get").expect("missing");
    assert_eq!(settled.status, ExperimentStatus::Completed);
    assert_eq!(settled.failed_runs, 3);
    assert_eq!(settled.variant_a_approval_rate, None);
    assert_eq!(settled.variant_b_approval_rate, None);

    let champion = service.champion().await.expect("failed to get champion");
    assert_eq!(champion.phrase, "You are doing great");

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_tie_keeps_the_champion() {
    let pool = setup_test_db().await;
    let service = build_service(&pool);

    let experiment = service.launch("challenger", 2).await.expect("failed to launch");
    service
        .record_outcome(experiment.id, Uuid::new_v4(), scored(Variant::A, true))
        .await
        .expect("failed to record outcome");
    service
        .record_outcome(experiment.id, Uuid::new_v4(), scored(Variant::B, true))
        .await
        .expect("failed to record outcome");

    let settled = service.get(experiment.id).await.expect("failed to get").expect("missing");
    assert_eq!(settled.status, ExperimentStatus::Completed);
    assert_eq!(settled.variant_a_approval_rate, Some(1.0));
    assert_eq!(settled.variant_b_approval_rate, Some(1.0));

    let champion = service.champion().await.expect("failed to get champion");
    assert_eq!(champion.phrase, "You are doing great");

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_duplicate_trial_outcome_is_counted_once() {
    let pool = setup_test_db().await;
    let service = build_service(&pool);

    let experiment = service.launch("challenger", 2).await.expect("failed to launch");
    let trial_id = Uuid::new_v4();

    service
        .record_outcome(experiment.id, trial_id, scored(Variant::B, true))
        .await
        .expect("failed to record outcome");
    // Replayed delivery of the same trial outcome.
    service
        .record_outcome(experiment.id, trial_id, scored(Variant::B, true))
        .await
        .expect("duplicate outcome must be swallowed");

    let pending = service.get(experiment.id).await.expect("failed to get").expect("missing");
    assert_eq!(pending.status, ExperimentStatus::Pending);
    assert_eq!(pending.variant_b_runs, 1);
    assert_eq!(pending.recorded_runs(), 1);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_outcome_after_settlement_is_ignored() {
    let pool = setup_test_db().await;
    let service = build_service(&pool);

    let experiment = service.launch("challenger", 1).await.expect("failed to launch");
    service
        .record_outcome(experiment.id, Uuid::new_v4(), scored(Variant::A, true))
        .await
        .expect("failed to record outcome");

    service
        .record_outcome(experiment.id, Uuid::new_v4(), scored(Variant::B, true))
        .await
        .expect("stale outcome must be swallowed");

    let settled = service.get(experiment.id).await.expect("failed to get").expect("missing");
    assert_eq!(settled.status, ExperimentStatus::Completed);
    assert_eq!(settled.recorded_runs(), 1);
    assert_eq!(settled.variant_b_runs, 0);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_concurrent_outcomes_never_lose_counts() {
    let pool = setup_test_db().await;
    let service = build_service(&pool);

    let target_runs = 20;
    let experiment = service.launch("challenger", target_runs).await.expect("failed to launch");

    let tasks: Vec<_> = (0..target_runs)
        .map(|i| {
            let service = service.clone();
            let experiment_id = experiment.id;
            tokio::spawn(async move {
                let outcome = match i % 3 {
                    0 => scored(Variant::A, i % 2 == 0),
                    1 => scored(Variant::B, true),
                    _ => TrialOutcome::Failed,
                };
                service
                    .record_outcome(experiment_id, Uuid::new_v4(), outcome)
                    .await
                    .expect("failed to record outcome");
            })
        })
        .collect();

    for result in join_all(tasks).await {
        result.expect("trial task panicked");
    }

    let settled = service.get(experiment.id).await.expect("failed to get").expect("missing");
    assert_eq!(settled.status, ExperimentStatus::Completed);
    assert_eq!(i64::from(settled.recorded_runs()), target_runs);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_abort_fails_a_pending_experiment() {
    let pool = setup_test_db().await;
    let service = build_service(&pool);

    let experiment = service.launch("challenger", 5).await.expect("failed to launch");
    service.abort(experiment.id).await.expect("failed to abort");

    let failed = service.get(experiment.id).await.expect("failed to get").expect("missing");
    assert_eq!(failed.status, ExperimentStatus::Failed);
    assert_eq!(failed.variant_a_approval_rate, None);

    // Late trial reports against the aborted experiment are swallowed
    // and change nothing.
    service
        .record_outcome(experiment.id, Uuid::new_v4(), scored(Variant::A, true))
        .await
        .expect("stale outcome must be swallowed");
    let failed = service.get(experiment.id).await.expect("failed to get").expect("missing");
    assert_eq!(failed.recorded_runs(), 0);

    // A failed experiment frees the single-experiment slot.
    service.launch("next challenger", 1).await.expect("failed to launch next");

    teardown_test_db(pool).await;
}
