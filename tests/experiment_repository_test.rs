mod helpers;

use chrono::{Duration, Utc};
use sparklab::adapters::sqlite::{SqliteChampionStore, SqliteExperimentRepository};
use sparklab::domain::models::{Experiment, ExperimentStatus, TrialOutcome, Variant};
use sparklab::domain::ports::{ChampionStore, ExperimentRepository};
use sparklab::DomainError;
use uuid::Uuid;

use helpers::database::{setup_test_db, teardown_test_db};

#[tokio::test]
async fn test_insert_and_get_experiment() {
    let pool = setup_test_db().await;
    let repo = SqliteExperimentRepository::new(pool.clone());

    let experiment = Experiment::new("You are doing great", "You've got this", 4);
    repo.insert(&experiment).await.expect("failed to insert experiment");

    let retrieved = repo
        .get(experiment.id)
        .await
        .expect("failed to get experiment")
        .expect("experiment missing");

    assert_eq!(retrieved.id, experiment.id);
    assert_eq!(retrieved.variant_a, "You are doing great");
    assert_eq!(retrieved.variant_b, "You've got this");
    assert_eq!(retrieved.target_runs, 4);
    assert_eq!(retrieved.status, ExperimentStatus::Pending);
    assert_eq!(retrieved.recorded_runs(), 0);
    assert_eq!(retrieved.variant_a_approval_rate, None);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_get_nonexistent_experiment() {
    let pool = setup_test_db().await;
    let repo = SqliteExperimentRepository::new(pool.clone());

    let result = repo.get(Uuid::new_v4()).await.expect("failed to query");
    assert!(result.is_none());

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_find_pending_ignores_settled_experiments() {
    let pool = setup_test_db().await;
    let repo = SqliteExperimentRepository::new(pool.clone());

    let mut settled = Experiment::new("a", "b", 1);
    settled
        .record(TrialOutcome::Scored { variant: Variant::A, joy_sparked: true })
        .expect("failed to record");
    repo.insert(&settled).await.expect("failed to insert settled");

    assert!(repo.find_pending().await.expect("failed to query").is_none());

    let pending = Experiment::new("a", "b", 2);
    repo.insert(&pending).await.expect("failed to insert pending");

    let found = repo.find_pending().await.expect("failed to query").expect("pending missing");
    assert_eq!(found.id, pending.id);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_update_persists_counters_and_status() {
    let pool = setup_test_db().await;
    let repo = SqliteExperimentRepository::new(pool.clone());

    let mut experiment = Experiment::new("a", "b", 2);
    repo.insert(&experiment).await.expect("failed to insert");

    experiment
        .record(TrialOutcome::Scored { variant: Variant::B, joy_sparked: true })
        .expect("failed to record");
    repo.update(&experiment).await.expect("failed to update");

    let retrieved = repo.get(experiment.id).await.expect("failed to get").expect("missing");
    assert_eq!(retrieved.variant_b_runs, 1);
    assert_eq!(retrieved.variant_b_successes, 1);
    assert_eq!(retrieved.status, ExperimentStatus::Pending);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_update_nonexistent_experiment_fails() {
    let pool = setup_test_db().await;
    let repo = SqliteExperimentRepository::new(pool.clone());

    let experiment = Experiment::new("a", "b", 1);
    let err = repo.update(&experiment).await.unwrap_err();
    assert!(matches!(err, DomainError::ExperimentNotFound(_)));

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_update_and_promote_swaps_seeded_champion() {
    let pool = setup_test_db().await;
    let repo = SqliteExperimentRepository::new(pool.clone());
    let store = SqliteChampionStore::new(pool.clone());

    let seeded = store.get().await.expect("failed to get champion");

    let mut experiment = Experiment::new(seeded.phrase.clone(), "You've got this", 2);
    repo.insert(&experiment).await.expect("failed to insert");
    experiment
        .record(TrialOutcome::Scored { variant: Variant::A, joy_sparked: false })
        .expect("failed to record");
    experiment
        .record(TrialOutcome::Scored { variant: Variant::B, joy_sparked: true })
        .expect("failed to record");
    assert_eq!(experiment.status, ExperimentStatus::Completed);

    let swapped = repo
        .update_and_promote(&experiment, &experiment.variant_a, &experiment.variant_b)
        .await
        .expect("failed to settle");
    assert!(swapped);

    let champion = store.get().await.expect("failed to get champion");
    assert_eq!(champion.phrase, "You've got this");
    assert!(champion.updated_at > seeded.updated_at);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_update_and_promote_skips_stale_champion() {
    let pool = setup_test_db().await;
    let repo = SqliteExperimentRepository::new(pool.clone());
    let store = SqliteChampionStore::new(pool.clone());

    let mut experiment = Experiment::new("not the current champion", "challenger", 1);
    repo.insert(&experiment).await.expect("failed to insert");
    experiment
        .record(TrialOutcome::Scored { variant: Variant::B, joy_sparked: true })
        .expect("failed to record");

    let swapped = repo
        .update_and_promote(&experiment, &experiment.variant_a, &experiment.variant_b)
        .await
        .expect("failed to settle");
    assert!(!swapped);

    // The experiment update still applied; the champion is untouched.
    let retrieved = repo.get(experiment.id).await.expect("failed to get").expect("missing");
    assert_eq!(retrieved.status, ExperimentStatus::Completed);
    let champion = store.get().await.expect("failed to get champion");
    assert_eq!(champion.phrase, "You are doing great");

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_list_recent_orders_and_limits() {
    let pool = setup_test_db().await;
    let repo = SqliteExperimentRepository::new(pool.clone());

    let now = Utc::now();
    let mut ids = Vec::new();
    for age_minutes in [30, 20, 10] {
        let mut experiment = Experiment::new("a", "b", 1);
        experiment.created_at = now - Duration::minutes(age_minutes);
        repo.insert(&experiment).await.expect("failed to insert");
        ids.push(experiment.id);
    }

    let recent = repo.list_recent(2).await.expect("failed to list");
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].id, ids[2]);
    assert_eq!(recent[1].id, ids[1]);

    teardown_test_db(pool).await;
}
