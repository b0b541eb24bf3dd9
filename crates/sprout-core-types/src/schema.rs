//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Entity identifiers
pub const FIELD_USER_ID: &str = "user_id";
pub const FIELD_SPROUT_ID: &str = "sprout_id";

// Migrations
pub const FIELD_FROM_VERSION: &str = "from_version";
pub const FIELD_TO_VERSION: &str = "to_version";
pub const FIELD_STEP_INDEX: &str = "step_index";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
