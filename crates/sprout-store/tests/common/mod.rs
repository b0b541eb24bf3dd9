use rusqlite::Connection;
use sprout_core::{AuthProfile, Sprout, SproutLimits, User};
use sprout_store::migrations::apply_migrations;
use sprout_store::repo::{Repository, UserRepository};
use sprout_store::{SqliteAdapter, StorageAdapter};

#[allow(dead_code)]
pub const TEST_USER_ID: &str = "user-123";

/// Bare in-memory database: no pragmas, no schema
#[allow(dead_code)]
pub fn empty_db() -> SqliteAdapter {
    SqliteAdapter::new(Connection::open_in_memory().expect("Failed to create in-memory database"))
}

/// In-memory database with foreign keys on and the schema applied
#[allow(dead_code)]
pub fn setup_test_db() -> SqliteAdapter {
    let db = empty_db();
    db.exec("PRAGMA foreign_keys = ON;").unwrap();
    apply_migrations(&db).expect("Failed to apply migrations");
    db
}

#[allow(dead_code)]
pub fn profile(id: &str) -> AuthProfile {
    AuthProfile {
        id: id.to_string(),
        email: Some(format!("{}@example.com", id)),
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        image_url: None,
    }
}

/// Insert the owning user so sprout rows satisfy their foreign key
#[allow(dead_code)]
pub fn seed_user(db: &SqliteAdapter, id: &str) -> User {
    let user = User::create_from_profile(&profile(id));
    UserRepository::new(db).create(&user).unwrap();
    user
}

#[allow(dead_code)]
pub fn new_sprout() -> Sprout {
    Sprout::create_new(TEST_USER_ID, SproutLimits::default())
}

#[allow(dead_code)]
pub fn count(db: &SqliteAdapter, table: &str) -> i64 {
    db.get_first(&format!("SELECT COUNT(*) AS n FROM {}", table), &[])
        .unwrap()
        .unwrap()
        .integer("n")
        .unwrap()
}
