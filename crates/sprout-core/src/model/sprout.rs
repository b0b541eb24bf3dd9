use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::item::{Affirmation, ChildKind, ItemList, Trigger};
use super::lifecycle::{Entity, Lifecycle, SyncStatus};
use crate::config::SproutLimits;
use crate::errors::Result;

pub const DEFAULT_COLOR: &str = "#7BC67B";
pub const DEFAULT_SHAPE_ID: &str = "rounded";
pub const DEFAULT_HAT_ID: &str = "leaves";

/// Root columns of a stored Sprout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SproutProps {
    pub id: String,
    pub user_id: String,
    pub color: String,
    pub shape_id: String,
    pub hat_id: String,
    pub sync_status: SyncStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sprout aggregate root
///
/// Owns two independently bounded, densely ordered collections: affirmations
/// and triggers. Every mutation goes through an entity method that validates
/// first and then marks the aggregate modified, so a failed call leaves the
/// instance untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprout {
    lifecycle: Lifecycle,
    user_id: String,
    color: String,
    shape_id: String,
    hat_id: String,
    affirmations: ItemList,
    triggers: ItemList,
    limits: SproutLimits,
}

impl Entity for Sprout {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
}

impl Sprout {
    /// Create a brand new Sprout for `user_id` with the default style and empty collections
    pub fn create_new(user_id: impl Into<String>, limits: SproutLimits) -> Self {
        Self {
            lifecycle: Lifecycle::fresh(Uuid::now_v7().to_string()),
            user_id: user_id.into(),
            color: DEFAULT_COLOR.to_string(),
            shape_id: DEFAULT_SHAPE_ID.to_string(),
            hat_id: DEFAULT_HAT_ID.to_string(),
            affirmations: ItemList::new(ChildKind::Affirmation),
            triggers: ItemList::new(ChildKind::Trigger),
            limits,
        }
    }

    /// Rehydrate a Sprout from its root row and both child collections, exactly as stored
    pub fn from_persistence(
        props: SproutProps,
        affirmations: Vec<Affirmation>,
        triggers: Vec<Trigger>,
        limits: SproutLimits,
    ) -> Self {
        Self {
            lifecycle: Lifecycle::from_persistence(
                props.id,
                props.created_at,
                props.updated_at,
                props.sync_status,
            ),
            user_id: props.user_id,
            color: props.color,
            shape_id: props.shape_id,
            hat_id: props.hat_id,
            affirmations: ItemList::from_items(ChildKind::Affirmation, affirmations),
            triggers: ItemList::from_items(ChildKind::Trigger, triggers),
            limits,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn shape_id(&self) -> &str {
        &self.shape_id
    }

    pub fn hat_id(&self) -> &str {
        &self.hat_id
    }

    pub fn affirmations(&self) -> &[Affirmation] {
        self.affirmations.items()
    }

    pub fn triggers(&self) -> &[Trigger] {
        self.triggers.items()
    }

    pub fn limits(&self) -> SproutLimits {
        self.limits
    }

    // ----- Style -----

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = color.into();
        self.lifecycle.mark_modified();
    }

    pub fn set_shape_id(&mut self, shape_id: impl Into<String>) {
        self.shape_id = shape_id.into();
        self.lifecycle.mark_modified();
    }

    pub fn set_hat_id(&mut self, hat_id: impl Into<String>) {
        self.hat_id = hat_id.into();
        self.lifecycle.mark_modified();
    }

    /// Record that the synchronization collaborator has accepted this state
    pub fn mark_synced(&mut self, server_timestamp: DateTime<Utc>) {
        self.lifecycle.mark_synced(server_timestamp);
    }

    // ----- Affirmations -----

    /// Append an affirmation and return its id
    ///
    /// # Errors
    /// * `CapacityExceeded` - collection already holds `limits.max_affirmations`
    pub fn add_affirmation(&mut self, text: &str) -> Result<String> {
        let id = self.affirmations.add(text, self.limits.max_affirmations)?;
        self.lifecycle.mark_modified();
        Ok(id)
    }

    /// # Errors
    /// * `NotFound` - no affirmation with this id
    pub fn remove_affirmation(&mut self, affirmation_id: &str) -> Result<()> {
        self.affirmations.remove(affirmation_id)?;
        self.lifecycle.mark_modified();
        Ok(())
    }

    /// # Errors
    /// * `NotFound` - no affirmation with this id
    pub fn update_affirmation_text(&mut self, affirmation_id: &str, text: &str) -> Result<()> {
        self.affirmations.update_text(affirmation_id, text)?;
        self.lifecycle.mark_modified();
        Ok(())
    }

    /// # Errors
    /// * `NotFound` - no affirmation with this id
    /// * `InvalidPosition` - `new_index` outside `0..len`
    pub fn reorder_affirmation(&mut self, affirmation_id: &str, new_index: i64) -> Result<()> {
        self.affirmations.reorder(affirmation_id, new_index)?;
        self.lifecycle.mark_modified();
        Ok(())
    }

    // ----- Triggers -----

    /// Append a trigger and return its id
    ///
    /// # Errors
    /// * `CapacityExceeded` - collection already holds `limits.max_triggers`
    pub fn add_trigger(&mut self, text: &str) -> Result<String> {
        let id = self.triggers.add(text, self.limits.max_triggers)?;
        self.lifecycle.mark_modified();
        Ok(id)
    }

    /// # Errors
    /// * `NotFound` - no trigger with this id
    pub fn remove_trigger(&mut self, trigger_id: &str) -> Result<()> {
        self.triggers.remove(trigger_id)?;
        self.lifecycle.mark_modified();
        Ok(())
    }

    /// # Errors
    /// * `NotFound` - no trigger with this id
    pub fn update_trigger_text(&mut self, trigger_id: &str, text: &str) -> Result<()> {
        self.triggers.update_text(trigger_id, text)?;
        self.lifecycle.mark_modified();
        Ok(())
    }

    /// # Errors
    /// * `NotFound` - no trigger with this id
    /// * `InvalidPosition` - `new_index` outside `0..len`
    pub fn reorder_trigger(&mut self, trigger_id: &str, new_index: i64) -> Result<()> {
        self.triggers.reorder(trigger_id, new_index)?;
        self.lifecycle.mark_modified();
        Ok(())
    }
}
