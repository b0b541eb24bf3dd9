//! Users table repository

#![allow(clippy::result_large_err)]

use std::time::Instant;

use sprout_core::{log_op_end, log_op_error, log_op_start, Entity, User, UserProps};

use super::base_repo::{read_sync_status, BaseRepository, Repository, RowMapped};
use crate::adapter::{Row, SqlValue, StorageAdapter};
use crate::errors::Result;

impl RowMapped for User {
    const TABLE: &'static str = "users";

    fn to_row(&self) -> Row {
        Row::new()
            .with("id", self.id())
            .with("first_name", self.first_name())
            .with("last_name", self.last_name())
            .with("display_name", self.display_name())
            .with("email", self.email())
            .with("image_url", self.image_url())
            .with("sync_status", self.sync_status().as_str())
            .with("created_at", SqlValue::timestamp_millis(self.created_at()))
            .with("updated_at", SqlValue::timestamp_millis(self.updated_at()))
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(User::from_persistence(UserProps {
            id: row.text("id")?,
            first_name: row.opt_text("first_name")?,
            last_name: row.opt_text("last_name")?,
            display_name: row.opt_text("display_name")?,
            email: row.opt_text("email")?,
            image_url: row.opt_text("image_url")?,
            sync_status: read_sync_status(row)?,
            created_at: row.timestamp("created_at")?,
            updated_at: row.timestamp("updated_at")?,
        }))
    }
}

/// Repository for [`User`] rows
pub struct UserRepository<'a> {
    base: BaseRepository<'a, User>,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a dyn StorageAdapter) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// First user whose local display name equals `display_name`
    pub fn find_by_display_name(&self, display_name: &str) -> Result<Option<User>> {
        self.base.find_by("display_name", display_name)
    }
}

impl Repository<User> for UserRepository<'_> {
    fn create(&self, entity: &User) -> Result<()> {
        logged("user_repo.create", entity.id(), || self.base.create(entity))
    }

    fn find(&self, id: &str) -> Result<Option<User>> {
        self.base.find(id)
    }

    fn find_all(&self) -> Result<Vec<User>> {
        self.base.find_all()
    }

    fn update(&self, entity: &User) -> Result<()> {
        logged("user_repo.update", entity.id(), || self.base.update(entity))
    }

    fn delete(&self, id: &str) -> Result<()> {
        logged("user_repo.delete", id, || self.base.delete(id))
    }
}

fn logged(op: &'static str, user_id: &str, f: impl FnOnce() -> Result<()>) -> Result<()> {
    let start = Instant::now();
    log_op_start!(op, user_id = user_id);

    let result = f();

    let duration_ms = start.elapsed().as_millis() as u64;
    if let Err(err) = &result {
        log_op_error!(op, err.clone(), duration_ms = duration_ms, user_id = user_id);
    } else {
        log_op_end!(op, duration_ms = duration_ms, user_id = user_id);
    }
    result
}
