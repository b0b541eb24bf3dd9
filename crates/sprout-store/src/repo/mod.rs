//! Repository layer for persisting domain models to SQLite
//!
//! - `BaseRepository`: generic single-table CRUD driven by [`RowMapped`]
//! - `UserRepository`: users table, built on the base repository
//! - `SproutRepository`: Sprout aggregate (root row plus ordered child rows)

pub mod base_repo;
pub mod sprout_repo;
pub mod user_repo;

pub use base_repo::{BaseRepository, Repository, RowMapped};
pub use sprout_repo::{SproutRepository, SproutSummary};
pub use user_repo::UserRepository;
