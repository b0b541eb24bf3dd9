use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lifecycle::{now_millis, Entity, Lifecycle, SyncStatus};

/// Profile shape delivered by the external auth provider
///
/// Carries no display name; that field is local-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthProfile {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
}

/// Stored columns of a User
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProps {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub sync_status: SyncStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User profile entity
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    lifecycle: Lifecycle,
    first_name: Option<String>,
    last_name: Option<String>,
    display_name: Option<String>,
    email: Option<String>,
    image_url: Option<String>,
}

impl Entity for User {
    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }
}

impl User {
    /// First sighting of a user: copy the auth profile, no display name, status pending
    pub fn create_from_profile(profile: &AuthProfile) -> Self {
        Self {
            lifecycle: Lifecycle::fresh(profile.id.clone()),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            display_name: None,
            email: profile.email.clone(),
            image_url: profile.image_url.clone(),
        }
    }

    pub fn from_persistence(props: UserProps) -> Self {
        Self {
            lifecycle: Lifecycle::from_persistence(
                props.id,
                props.created_at,
                props.updated_at,
                props.sync_status,
            ),
            first_name: props.first_name,
            last_name: props.last_name,
            display_name: props.display_name,
            email: props.email,
            image_url: props.image_url,
        }
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn set_first_name(&mut self, first_name: Option<String>) {
        self.first_name = first_name;
        self.lifecycle.mark_modified();
    }

    pub fn set_last_name(&mut self, last_name: Option<String>) {
        self.last_name = last_name;
        self.lifecycle.mark_modified();
    }

    pub fn set_display_name(&mut self, display_name: Option<String>) {
        self.display_name = display_name;
        self.lifecycle.mark_modified();
    }

    pub fn set_email(&mut self, email: Option<String>) {
        self.email = email;
        self.lifecycle.mark_modified();
    }

    pub fn set_image_url(&mut self, image_url: Option<String>) {
        self.image_url = image_url;
        self.lifecycle.mark_modified();
    }

    /// Overwrite the auth-owned fields from a fresh profile snapshot and mark synced now
    ///
    /// `display_name` is local-only and never touched. The profile id is the
    /// lookup key for this user, so it already equals `self.id()`; identity stays
    /// immutable and a mismatching profile id is only reported.
    pub fn sync_with_profile(&mut self, profile: &AuthProfile) {
        if profile.id != self.lifecycle.id() {
            tracing::warn!(
                user_id = self.lifecycle.id(),
                profile_id = %profile.id,
                "auth profile id differs from user id; keeping stored id"
            );
        }

        self.first_name = profile.first_name.clone();
        self.last_name = profile.last_name.clone();
        self.email = profile.email.clone();
        self.image_url = profile.image_url.clone();

        self.lifecycle.mark_synced(now_millis());
    }

    /// Record that the synchronization collaborator has accepted this state
    pub fn mark_synced(&mut self, server_timestamp: DateTime<Utc>) {
        self.lifecycle.mark_synced(server_timestamp);
    }
}
