use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::SproutError;

/// Whether an entity's local state matches the last externally synchronized state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Synced,
    Pending,
    Unsynced,
}

impl SyncStatus {
    /// Storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Synced => "synced",
            SyncStatus::Pending => "pending",
            SyncStatus::Unsynced => "unsynced",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncStatus {
    type Err = SproutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "synced" => Ok(SyncStatus::Synced),
            "pending" => Ok(SyncStatus::Pending),
            "unsynced" => Ok(SyncStatus::Unsynced),
            other => Err(SproutError::InvalidSyncStatus {
                value: other.to_string(),
            }),
        }
    }
}

/// Current time at the precision timestamps are stored with (epoch millis)
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Identity, timestamps and sync status shared by every entity
///
/// `updated_at` and `sync_status` only change through [`Lifecycle::mark_modified`]
/// and [`Lifecycle::mark_synced`]; both are crate-private so entity methods are
/// the only callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lifecycle {
    id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    sync_status: SyncStatus,
}

impl Lifecycle {
    /// A brand new entity: both timestamps now, status pending
    pub fn fresh(id: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: id.into(),
            created_at: now,
            updated_at: now,
            sync_status: SyncStatus::Pending,
        }
    }

    /// Rehydrate exactly as stored
    pub fn from_persistence(
        id: impl Into<String>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        sync_status: SyncStatus,
    ) -> Self {
        Self {
            id: id.into(),
            created_at,
            updated_at,
            sync_status,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.sync_status
    }

    pub(crate) fn mark_modified(&mut self) {
        self.updated_at = now_millis();
        self.sync_status = SyncStatus::Pending;
    }

    pub(crate) fn mark_synced(&mut self, server_timestamp: DateTime<Utc>) {
        self.updated_at = server_timestamp;
        self.sync_status = SyncStatus::Synced;
    }
}

/// Read access to the lifecycle of any entity
pub trait Entity {
    fn lifecycle(&self) -> &Lifecycle;

    fn id(&self) -> &str {
        self.lifecycle().id()
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.lifecycle().created_at()
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.lifecycle().updated_at()
    }

    fn sync_status(&self) -> SyncStatus {
        self.lifecycle().sync_status()
    }
}
