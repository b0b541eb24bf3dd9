// Integration tests for the Sprout aggregate repository

mod common;

use chrono::{Duration, Utc};
use common::{count, new_sprout, seed_user, setup_test_db, TEST_USER_ID};
use sprout_core::{Entity, ExErrorKind, Sprout, SproutLimits, SyncStatus};
use sprout_store::db::initialize;
use sprout_store::{SqlValue, SproutRepository, StorageAdapter, StoreConfig};

fn texts(items: &[sprout_core::ListItem]) -> Vec<&str> {
    items.iter().map(|item| item.text()).collect()
}

fn child_texts(db: &impl StorageAdapter, table: &str, sprout_id: &str) -> Vec<String> {
    db.get_all(
        &format!(
            "SELECT text FROM {} WHERE sprout_id = ?1 ORDER BY position ASC",
            table
        ),
        &[SqlValue::from(sprout_id)],
    )
    .unwrap()
    .iter()
    .map(|row| row.text("text").unwrap())
    .collect()
}

fn populated_sprout() -> Sprout {
    let mut sprout = new_sprout();
    sprout.add_affirmation("I am calm").unwrap();
    sprout.add_affirmation("I am capable").unwrap();
    sprout.add_trigger("Loud rooms").unwrap();
    sprout
}

#[test]
fn test_create_then_find_round_trip() {
    let db = setup_test_db();
    seed_user(&db, TEST_USER_ID);
    let repo = SproutRepository::new(&db, SproutLimits::default());
    let sprout = populated_sprout();

    repo.create(&sprout).unwrap();
    let loaded = repo.find(sprout.id()).unwrap().unwrap();

    assert_eq!(loaded, sprout);
    assert_eq!(texts(loaded.affirmations()), vec!["I am calm", "I am capable"]);
    assert_eq!(texts(loaded.triggers()), vec!["Loud rooms"]);
}

#[test]
fn test_create_with_empty_collections() {
    let db = setup_test_db();
    seed_user(&db, TEST_USER_ID);
    let repo = SproutRepository::new(&db, SproutLimits::default());
    let sprout = new_sprout();

    repo.create(&sprout).unwrap();

    let loaded = repo.find(sprout.id()).unwrap().unwrap();
    assert!(loaded.affirmations().is_empty());
    assert!(loaded.triggers().is_empty());
    assert_eq!(count(&db, "affirmations"), 0);
}

#[test]
fn test_find_missing_returns_none() {
    let db = setup_test_db();
    let repo = SproutRepository::new(&db, SproutLimits::default());
    assert!(repo.find("no-such-sprout").unwrap().is_none());
}

#[test]
fn test_create_rolls_back_when_a_child_insert_fails() {
    let db = setup_test_db();
    seed_user(&db, TEST_USER_ID);
    let repo = SproutRepository::new(&db, SproutLimits::default());

    let first = populated_sprout();
    repo.create(&first).unwrap();

    // Same child ids under a new root: the root insert succeeds, the first child insert collides.
    let clone = Sprout::from_persistence(
        sprout_core::SproutProps {
            id: "other-sprout".to_string(),
            user_id: TEST_USER_ID.to_string(),
            color: first.color().to_string(),
            shape_id: first.shape_id().to_string(),
            hat_id: first.hat_id().to_string(),
            sync_status: SyncStatus::Pending,
            created_at: first.created_at(),
            updated_at: first.updated_at(),
        },
        first.affirmations().to_vec(),
        Vec::new(),
        SproutLimits::default(),
    );

    let err = repo.create(&clone).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Persistence);
    assert!(repo.find("other-sprout").unwrap().is_none());
    assert_eq!(count(&db, "sprouts"), 1);
    assert_eq!(count(&db, "affirmations"), 2);
}

#[test]
fn test_create_requires_existing_user() {
    let db = setup_test_db();
    let repo = SproutRepository::new(&db, SproutLimits::default());

    let err = repo.create(&new_sprout()).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Persistence);
    assert_eq!(count(&db, "sprouts"), 0);
}

#[test]
fn test_update_rewrites_children() {
    let db = setup_test_db();
    seed_user(&db, TEST_USER_ID);
    let repo = SproutRepository::new(&db, SproutLimits::default());
    let mut sprout = populated_sprout();
    repo.create(&sprout).unwrap();

    let first_id = sprout.affirmations()[0].id().to_string();
    sprout.remove_affirmation(&first_id).unwrap();
    sprout.add_affirmation("I am growing").unwrap();
    let trigger_id = sprout.triggers()[0].id().to_string();
    sprout.update_trigger_text(&trigger_id, "  Crowds  ").unwrap();
    sprout.set_color("#FFAA00");
    repo.update(&sprout).unwrap();

    let loaded = repo.find(sprout.id()).unwrap().unwrap();
    assert_eq!(loaded, sprout);
    assert_eq!(
        child_texts(&db, "affirmations", sprout.id()),
        vec!["I am capable", "I am growing"]
    );
    assert_eq!(child_texts(&db, "triggers", sprout.id()), vec!["Crowds"]);
    assert_eq!(loaded.color(), "#FFAA00");
}

#[test]
fn test_update_persists_reorder() {
    let db = setup_test_db();
    seed_user(&db, TEST_USER_ID);
    let repo = SproutRepository::new(&db, SproutLimits::default());
    let mut sprout = new_sprout();
    let a = sprout.add_affirmation("A").unwrap();
    sprout.add_affirmation("B").unwrap();
    sprout.add_affirmation("C").unwrap();
    repo.create(&sprout).unwrap();

    sprout.reorder_affirmation(&a, 2).unwrap();
    repo.update(&sprout).unwrap();

    let loaded = repo.find(sprout.id()).unwrap().unwrap();
    assert_eq!(texts(loaded.affirmations()), vec!["B", "C", "A"]);
    let positions: Vec<u32> = loaded.affirmations().iter().map(|a| a.position()).collect();
    assert_eq!(positions, vec![0, 1, 2]);
}

#[test]
fn test_update_to_empty_collections_clears_rows() {
    let db = setup_test_db();
    seed_user(&db, TEST_USER_ID);
    let repo = SproutRepository::new(&db, SproutLimits::default());
    let mut sprout = populated_sprout();
    repo.create(&sprout).unwrap();

    let ids: Vec<String> = sprout
        .affirmations()
        .iter()
        .map(|a| a.id().to_string())
        .collect();
    for id in ids {
        sprout.remove_affirmation(&id).unwrap();
    }
    repo.update(&sprout).unwrap();

    assert_eq!(count(&db, "affirmations"), 0);
    assert_eq!(count(&db, "triggers"), 1);
}

#[test]
fn test_update_missing_root_is_aggregate_not_found() {
    let db = setup_test_db();
    seed_user(&db, TEST_USER_ID);
    let repo = SproutRepository::new(&db, SproutLimits::default());
    let sprout = populated_sprout();

    let err = repo.update(&sprout).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::AggregateNotFound);
    assert_eq!(err.entity_id(), Some(sprout.id()));
    assert_eq!(count(&db, "affirmations"), 0);
    assert_eq!(count(&db, "triggers"), 0);
}

#[test]
fn test_update_persists_synced_state() {
    let db = setup_test_db();
    seed_user(&db, TEST_USER_ID);
    let repo = SproutRepository::new(&db, SproutLimits::default());
    let mut sprout = new_sprout();
    repo.create(&sprout).unwrap();

    let server_ts = Utc::now() - Duration::minutes(10);
    sprout.mark_synced(server_ts);
    repo.update(&sprout).unwrap();

    let loaded = repo.find(sprout.id()).unwrap().unwrap();
    assert_eq!(loaded.sync_status(), SyncStatus::Synced);
    assert_eq!(
        loaded.updated_at().timestamp_millis(),
        server_ts.timestamp_millis()
    );
}

#[test]
fn test_delete_cascades_to_children() {
    let db = setup_test_db();
    seed_user(&db, TEST_USER_ID);
    let repo = SproutRepository::new(&db, SproutLimits::default());
    let sprout = populated_sprout();
    repo.create(&sprout).unwrap();

    repo.delete(sprout.id()).unwrap();

    assert!(repo.find(sprout.id()).unwrap().is_none());
    assert_eq!(count(&db, "affirmations"), 0);
    assert_eq!(count(&db, "triggers"), 0);

    // Idempotent
    repo.delete(sprout.id()).unwrap();
}

#[test]
fn test_rehydrated_sprout_uses_repository_limits() {
    let db = setup_test_db();
    seed_user(&db, TEST_USER_ID);
    let sprout = populated_sprout();
    SproutRepository::new(&db, SproutLimits::default())
        .create(&sprout)
        .unwrap();

    let tight = SproutRepository::new(&db, SproutLimits::new(2, 1));
    let mut loaded = tight.find(sprout.id()).unwrap().unwrap();

    assert!(loaded.add_affirmation("one too many").is_err());
    assert!(loaded.add_trigger("one too many").is_err());
}

#[test]
fn test_find_summary_includes_first_affirmation() {
    let db = setup_test_db();
    seed_user(&db, TEST_USER_ID);
    let repo = SproutRepository::new(&db, SproutLimits::default());
    let mut sprout = populated_sprout();
    let capable = sprout.affirmations()[1].id().to_string();
    sprout.reorder_affirmation(&capable, 0).unwrap();
    repo.create(&sprout).unwrap();

    let summary = repo.find_summary(sprout.id()).unwrap().unwrap();

    assert_eq!(summary.id, sprout.id());
    assert_eq!(summary.user_id, TEST_USER_ID);
    assert_eq!(summary.first_affirmation_text.as_deref(), Some("I am capable"));
    assert_eq!(summary.sync_status, SyncStatus::Pending);
    assert_eq!(summary.created_at, sprout.created_at());
}

#[test]
fn test_find_summary_without_affirmations() {
    let db = setup_test_db();
    seed_user(&db, TEST_USER_ID);
    let repo = SproutRepository::new(&db, SproutLimits::default());
    let sprout = new_sprout();
    repo.create(&sprout).unwrap();

    let summary = repo.find_summary(sprout.id()).unwrap().unwrap();

    assert_eq!(summary.first_affirmation_text, None);
    assert!(repo.find_summary("missing").unwrap().is_none());
}

#[test]
fn test_summaries_by_user_newest_first() {
    let db = setup_test_db();
    seed_user(&db, TEST_USER_ID);
    seed_user(&db, "someone-else");
    let repo = SproutRepository::new(&db, SproutLimits::default());

    let now = Utc::now();
    let owners = [
        (3, TEST_USER_ID),
        (1, TEST_USER_ID),
        (2, TEST_USER_ID),
        (0, "someone-else"),
    ];
    for (offset, user_id) in owners {
        let created = now - Duration::minutes(offset);
        let sprout = Sprout::from_persistence(
            sprout_core::SproutProps {
                id: format!("sprout-{}", offset),
                user_id: user_id.to_string(),
                color: "#7BC67B".to_string(),
                shape_id: "rounded".to_string(),
                hat_id: "leaves".to_string(),
                sync_status: SyncStatus::Pending,
                created_at: created,
                updated_at: created,
            },
            Vec::new(),
            Vec::new(),
            SproutLimits::default(),
        );
        repo.create(&sprout).unwrap();
    }

    let summaries: Vec<String> = repo
        .find_all_summaries_by_user_id(TEST_USER_ID)
        .unwrap()
        .into_iter()
        .map(|summary| summary.id)
        .collect();

    assert_eq!(summaries, vec!["sprout-1", "sprout-2", "sprout-3"]);
    assert!(repo
        .find_all_summaries_by_user_id("nobody")
        .unwrap()
        .is_empty());
}

#[test]
fn test_delete_without_foreign_keys_removes_children() {
    let config = StoreConfig::from_toml_str("foreign_keys = false").unwrap();
    let db = initialize(&config).unwrap();
    seed_user(&db, TEST_USER_ID);
    let repo = SproutRepository::new(&db, SproutLimits::default());
    let sprout = populated_sprout();
    repo.create(&sprout).unwrap();

    repo.delete(sprout.id()).unwrap();

    assert_eq!(count(&db, "sprouts"), 0);
    assert_eq!(count(&db, "affirmations"), 0);
    assert_eq!(count(&db, "triggers"), 0);

    // Child ids are free again for a re-created aggregate.
    repo.create(&sprout).unwrap();
    assert_eq!(count(&db, "affirmations"), 2);
}
