use thiserror::Error;

use crate::model::ChildKind;

/// Result type alias using SproutError
pub type Result<T> = std::result::Result<T, SproutError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Stable classification for every failure the persistence layer can surface.
/// Each kind maps to a stable error code so callers can tell "bad domain input"
/// apart from "storage layer failure" without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Domain
    NotFound,
    CapacityExceeded,
    InvalidPosition,
    AggregateNotFound,
    InvalidInput,

    // Migrations / initialization
    NoMigrationSteps,
    MigrationFailed,
    StorageInitFailed,

    // Storage
    Persistence,
    /// A stored row could not be turned back into an entity
    RowDecode,

    // Ambient
    Config,
    Io,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::CapacityExceeded => "ERR_CAPACITY_EXCEEDED",
            ExErrorKind::InvalidPosition => "ERR_INVALID_POSITION",
            ExErrorKind::AggregateNotFound => "ERR_AGGREGATE_NOT_FOUND",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NoMigrationSteps => "ERR_NO_MIGRATION_STEPS",
            ExErrorKind::MigrationFailed => "ERR_MIGRATION_FAILED",
            ExErrorKind::StorageInitFailed => "ERR_STORAGE_INIT_FAILED",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::RowDecode => "ERR_ROW_DECODE",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// True for kinds raised by entity methods before any I/O happens
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            ExErrorKind::NotFound
                | ExErrorKind::CapacityExceeded
                | ExErrorKind::InvalidPosition
                | ExErrorKind::InvalidInput
        )
    }
}

/// Structured error carrying a kind plus optional context
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    step_index: Option<usize>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            step_index: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add migration step index context
    pub fn with_step_index(mut self, index: usize) -> Self {
        self.step_index = Some(index);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the migration step index, if any
    pub fn step_index(&self) -> Option<usize> {
        self.step_index
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(step_index) = self.step_index {
            write!(f, " (step_index: {})", step_index)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for entity operations
///
/// Raised synchronously by entity methods, before any storage call, so a
/// failure here never touches persisted state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SproutError {
    /// No item with the given id exists in the collection
    #[error("{kind} not found: {item_id}")]
    NotFound { kind: ChildKind, item_id: String },

    /// The collection already holds its configured maximum
    #[error("Maximum # of {kind}s reached ({max})")]
    CapacityExceeded { kind: ChildKind, max: usize },

    /// Reorder target index outside `0..len`
    #[error("Invalid {kind} position {index} (collection length {len})")]
    InvalidPosition {
        kind: ChildKind,
        index: i64,
        len: usize,
    },

    /// Root entity absent when a mutation requires it
    #[error("Sprout not found: {sprout_id}")]
    AggregateNotFound { sprout_id: String },

    /// Stored sync status is not one of synced / pending / unsynced
    #[error("Invalid sync status: {value}")]
    InvalidSyncStatus { value: String },
}

impl From<SproutError> for ExError {
    fn from(err: SproutError) -> Self {
        match err {
            SproutError::NotFound { kind, item_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(item_id)
                .with_message(format!("{} not found", kind)),

            SproutError::CapacityExceeded { kind, max } => {
                ExError::new(ExErrorKind::CapacityExceeded)
                    .with_message(format!("Maximum of {} {}s reached", max, kind))
            }

            SproutError::InvalidPosition { kind, index, len } => {
                ExError::new(ExErrorKind::InvalidPosition).with_message(format!(
                    "{} position {} outside 0..{}",
                    kind, index, len
                ))
            }

            SproutError::AggregateNotFound { sprout_id } => {
                ExError::new(ExErrorKind::AggregateNotFound)
                    .with_entity_id(sprout_id)
                    .with_message("Sprout not found")
            }

            SproutError::InvalidSyncStatus { value } => ExError::new(ExErrorKind::RowDecode)
                .with_op("decode_sync_status")
                .with_message(format!("Invalid sync status '{}'", value)),
        }
    }
}
