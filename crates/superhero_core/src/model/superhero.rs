//! Superhero domain model.
//!
//! # Responsibility
//! - Define the canonical persisted record.
//! - Expose lifecycle state derived from the soft-delete tombstone.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused for another record.
//! - `deleted_at` is the source of truth for Active/Deleted state.

use serde::{Deserialize, Serialize};

/// Store-assigned record identifier.
pub type SuperheroId = i64;

/// Lifecycle state of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuperheroState {
    /// Visible in default listings (`deleted_at` is null).
    Active,
    /// Soft-deleted (`deleted_at` is set).
    Deleted,
}

/// Visibility scope for id lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordScope {
    /// Only rows with `deleted_at IS NULL`.
    Active,
    /// Only rows with `deleted_at IS NOT NULL`.
    Deleted,
    /// Any row regardless of tombstone.
    Any,
}

impl RecordScope {
    /// Returns whether a record in `state` is visible in this scope.
    pub fn admits(self, state: SuperheroState) -> bool {
        match self {
            Self::Active => state == SuperheroState::Active,
            Self::Deleted => state == SuperheroState::Deleted,
            Self::Any => true,
        }
    }
}

/// Canonical persisted superhero record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Superhero {
    pub id: SuperheroId,
    pub real_name: String,
    pub hero_name: String,
    /// Relative Asset Store path of the uploaded photo.
    pub photo_path: Option<String>,
    pub additional_info: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed on every mutation.
    pub updated_at: i64,
    /// Soft delete tombstone (epoch milliseconds).
    pub deleted_at: Option<i64>,
}

impl Superhero {
    /// Returns the lifecycle state derived from `deleted_at`.
    pub fn state(&self) -> SuperheroState {
        if self.deleted_at.is_some() {
            SuperheroState::Deleted
        } else {
            SuperheroState::Active
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == SuperheroState::Active
    }

    pub fn is_deleted(&self) -> bool {
        self.state() == SuperheroState::Deleted
    }
}
