mod helpers;

use chrono::{Duration, Utc};
use sparklab::adapters::sqlite::SqliteAffirmationRepository;
use sparklab::domain::models::AffirmationResult;
use sparklab::domain::ports::AffirmationRepository;
use sparklab::DomainError;
use uuid::Uuid;

use helpers::database::{setup_test_db, teardown_test_db};

#[tokio::test]
async fn test_insert_and_get_record() {
    let pool = setup_test_db().await;
    let repo = SqliteAffirmationRepository::new(pool.clone());

    let record = AffirmationResult::new("You are doing great");
    repo.insert(&record).await.expect("failed to insert record");

    let retrieved = repo.get(record.id).await.expect("failed to get").expect("record missing");
    assert_eq!(retrieved.id, record.id);
    assert_eq!(retrieved.text, "You are doing great");
    assert_eq!(retrieved.joy_sparked, None);
    assert_eq!(retrieved.callback_received_at, None);

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_record_reaction_sets_result_once() {
    let pool = setup_test_db().await;
    let repo = SqliteAffirmationRepository::new(pool.clone());

    let record = AffirmationResult::new("You've got this");
    repo.insert(&record).await.expect("failed to insert record");

    let received_at = Utc::now();
    let recorded = repo
        .record_reaction(record.id, true, received_at)
        .await
        .expect("failed to record reaction");
    assert!(recorded);

    let retrieved = repo.get(record.id).await.expect("failed to get").expect("record missing");
    assert_eq!(retrieved.joy_sparked, Some(true));
    assert!(retrieved.reaction_recorded());

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_duplicate_reaction_is_ignored() {
    let pool = setup_test_db().await;
    let repo = SqliteAffirmationRepository::new(pool.clone());

    let record = AffirmationResult::new("phrase");
    repo.insert(&record).await.expect("failed to insert record");

    let first = Utc::now();
    assert!(repo.record_reaction(record.id, true, first).await.expect("failed to record"));

    // The replayed callback flips the signal; it must not apply.
    let replay = repo
        .record_reaction(record.id, false, first + Duration::seconds(5))
        .await
        .expect("failed to record duplicate");
    assert!(!replay);

    let retrieved = repo.get(record.id).await.expect("failed to get").expect("record missing");
    assert_eq!(retrieved.joy_sparked, Some(true));

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_reaction_for_unknown_record_fails() {
    let pool = setup_test_db().await;
    let repo = SqliteAffirmationRepository::new(pool.clone());

    let err = repo.record_reaction(Uuid::new_v4(), true, Utc::now()).await.unwrap_err();
    assert!(matches!(err, DomainError::AffirmationNotFound(_)));

    teardown_test_db(pool).await;
}

#[tokio::test]
async fn test_list_recent_orders_and_limits() {
    let pool = setup_test_db().await;
    let repo = SqliteAffirmationRepository::new(pool.clone());

    let now = Utc::now();
    let mut ids = Vec::new();
    for age_minutes in [3, 2, 1] {
        let mut record = AffirmationResult::new("phrase");
        record.created_at = now - Duration::minutes(age_minutes);
        repo.insert(&record).await.expect("failed to insert");
        ids.push(record.id);
    }

    let recent = repo.list_recent(2).await.expect("failed to list");
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].id, ids[2]);
    assert_eq!(recent[1].id, ids[1]);

    teardown_test_db(pool).await;
}
