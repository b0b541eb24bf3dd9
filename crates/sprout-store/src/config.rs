//! Store configuration
//!
//! Loaded from TOML. Every field is optional; missing fields keep their
//! defaults.
//!
//! ```toml
//! database_path = "data/sprouts.db"
//! foreign_keys = true
//! wal = true
//!
//! [limits]
//! max_affirmations = 10
//! max_triggers = 10
//! ```

#![allow(clippy::result_large_err)]

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sprout_core::SproutLimits;

use crate::errors::{config_error, io_error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file; `None` opens an in-memory database
    pub database_path: Option<PathBuf>,
    /// Enforce foreign keys (required for child-row cascade on Sprout delete)
    pub foreign_keys: bool,
    /// Switch file-backed databases to WAL journaling
    pub wal: bool,
    pub limits: SproutLimits,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            foreign_keys: true,
            wal: true,
            limits: SproutLimits::default(),
        }
    }
}

impl StoreConfig {
    /// In-memory database with default settings
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// File-backed database with default settings
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// # Errors
    /// `Config` if the document is not valid TOML for this shape
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| config_error(e.to_string()))
    }

    /// # Errors
    /// * `Io` - the file cannot be read
    /// * `Config` - the file is not valid TOML for this shape
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref()).map_err(|e| io_error("load_config", e))?;
        Self::from_toml_str(&source)
    }
}
