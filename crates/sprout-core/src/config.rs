//! Aggregate limits configuration

use serde::{Deserialize, Serialize};

/// Default cap on a Sprout's affirmations
pub const DEFAULT_MAX_AFFIRMATIONS: usize = 10;

/// Default cap on a Sprout's triggers
pub const DEFAULT_MAX_TRIGGERS: usize = 10;

/// Upper bounds on the two child collections of a Sprout
///
/// Each collection is capped independently. The limits travel with every
/// `Sprout` instance so the add operations can enforce them without I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SproutLimits {
    pub max_affirmations: usize,
    pub max_triggers: usize,
}

impl SproutLimits {
    pub fn new(max_affirmations: usize, max_triggers: usize) -> Self {
        Self {
            max_affirmations,
            max_triggers,
        }
    }
}

impl Default for SproutLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AFFIRMATIONS, DEFAULT_MAX_TRIGGERS)
    }
}
