//! Storage identity and cross-context change events.
//!
//! The persistent store is an origin-scoped key-value area shared by every
//! browsing context of the same origin.  Two facts about it shape this
//! module:
//!
//! 1. A context that writes an entry does NOT observe a change event for its
//!    own write; only *other* contexts are notified.  The host therefore
//!    consumes [`StorageChange`] events exclusively as news from elsewhere.
//! 2. More than one storage mechanism can fire change notifications on the
//!    same page.  Every event carries the [`StorageAreaId`] of the area it
//!    originated from so the host can discard events from areas it does not
//!    use.
//!
//! # Entry lifecycle
//!
//! The designated session entry is read once at bootstrap, overwritten on
//! every outbound-port emission, and never deleted by the host.  A `None`
//! value inside a [`StorageChange`] means some other context removed or
//! never set the entry.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::session::SessionValue;

// ── Storage key ───────────────────────────────────────────────────────────────

/// The name of a single entry in a storage area.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    /// Wraps a raw key name.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StorageKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Storage area identity ─────────────────────────────────────────────────────

/// Identifies one storage area instance.
///
/// Change events from unrelated storage mechanisms carry a different area id
/// and are filtered out by the sync loop.  The id is minted when the area is
/// created and shared by every context attached to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageAreaId(Uuid);

impl StorageAreaId {
    /// Mints a fresh area identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StorageAreaId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StorageAreaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// ── Change event ──────────────────────────────────────────────────────────────

/// A storage mutation observed in another browsing context.
///
/// Consumed, never produced, by the host sync loop.  The simulated storage
/// area in the host's infrastructure layer (and real embedding surfaces)
/// produce these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageChange {
    /// The storage area the mutation happened in.
    pub area: StorageAreaId,
    /// The entry that changed.
    pub key: StorageKey,
    /// The entry's value before the mutation, if any.
    pub old_value: Option<SessionValue>,
    /// The entry's value after the mutation; `None` when it was removed.
    pub new_value: Option<SessionValue>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_equality_is_exact() {
        // The inbound filter compares keys exactly: no case folding, no
        // trimming.
        assert_eq!(StorageKey::new("session"), StorageKey::from("session"));
        assert_ne!(StorageKey::new("session"), StorageKey::new("Session"));
        assert_ne!(StorageKey::new("session"), StorageKey::new("session "));
    }

    #[test]
    fn test_area_ids_are_distinct_per_area() {
        // Two areas must never collide, otherwise the filter's first arm
        // cannot tell them apart.
        let a = StorageAreaId::new();
        let b = StorageAreaId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_area_id_copies_compare_equal() {
        let a = StorageAreaId::new();
        let same = a;
        assert_eq!(a, same);
    }

    #[test]
    fn test_storage_change_preserves_old_and_new_values() {
        // Arrange
        let area = StorageAreaId::new();

        // Act
        let change = StorageChange {
            area,
            key: StorageKey::new("session"),
            old_value: Some(SessionValue::new("old")),
            new_value: Some(SessionValue::new("new1")),
        };

        // Assert
        assert_eq!(change.area, area);
        assert_eq!(change.old_value, Some(SessionValue::new("old")));
        assert_eq!(change.new_value, Some(SessionValue::new("new1")));
    }

    #[test]
    fn test_storage_change_models_removal_as_none() {
        let change = StorageChange {
            area: StorageAreaId::new(),
            key: StorageKey::new("session"),
            old_value: Some(SessionValue::new("gone")),
            new_value: None,
        };
        assert!(change.new_value.is_none());
    }
}
