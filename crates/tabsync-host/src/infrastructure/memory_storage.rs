//! In-memory storage area shared by simulated browsing contexts.
//!
//! [`SharedStorageArea`] plays the role of one origin-scoped key-value store.
//! Each simulated "tab" attaches to it and receives:
//!
//! - a [`ContextStorage`] handle implementing the synchronous storage port,
//!   and
//! - a receiver of [`StorageChange`] events describing writes made by the
//!   *other* attached contexts.
//!
//! # Delivery rules
//!
//! The fan-out mirrors the storage model the host is written against:
//!
//! - A write through one context delivers exactly one event to every other
//!   attached context, carrying the entry's old and new values.
//! - The writing context itself receives nothing for its own writes.
//! - Events carry the shared [`StorageAreaId`], so a consumer can tell them
//!   apart from events minted by an unrelated area.
//!
//! Delivery order across contexts is whatever the channels give; consumers
//! must not assume ordering relative to their own writes.
//!
//! # Concurrency
//!
//! Entries live behind a `parking_lot::Mutex`; the lock is held only for the
//! map operation and the fan-out sends (all non-blocking, the channels are
//! unbounded).  Detached receivers are pruned lazily on the next write.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use tabsync_core::{SessionValue, StorageAreaId, StorageChange, StorageKey};

use crate::application::ports::SessionStorage;

// ── Shared area ───────────────────────────────────────────────────────────────

struct Listener {
    context: Uuid,
    tx: mpsc::UnboundedSender<StorageChange>,
}

struct AreaInner {
    id: StorageAreaId,
    entries: Mutex<HashMap<StorageKey, SessionValue>>,
    listeners: Mutex<Vec<Listener>>,
}

/// One origin-scoped key-value area that any number of simulated browsing
/// contexts can attach to.
#[derive(Clone)]
pub struct SharedStorageArea {
    inner: Arc<AreaInner>,
}

impl SharedStorageArea {
    /// Creates an empty area with a fresh identity.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AreaInner {
                id: StorageAreaId::new(),
                entries: Mutex::new(HashMap::new()),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The area's identity, as carried by every change event it mints.
    pub fn area_id(&self) -> StorageAreaId {
        self.inner.id
    }

    /// Attaches a new browsing context to the area.
    ///
    /// Returns the context's storage handle and its stream of changes made
    /// by *other* contexts.
    pub fn attach(&self) -> (ContextStorage, mpsc::UnboundedReceiver<StorageChange>) {
        let context = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.listeners.lock().push(Listener { context, tx });
        debug!(area = %self.inner.id, %context, "browsing context attached");
        (
            ContextStorage {
                context,
                inner: Arc::clone(&self.inner),
            },
            rx,
        )
    }
}

impl Default for SharedStorageArea {
    fn default() -> Self {
        Self::new()
    }
}

// ── Per-context handle ────────────────────────────────────────────────────────

/// One browsing context's view of a [`SharedStorageArea`].
///
/// All contexts read and write the same entries; only the event fan-out is
/// per-context.
pub struct ContextStorage {
    context: Uuid,
    inner: Arc<AreaInner>,
}

impl ContextStorage {
    /// Removes `key` from the area, notifying the other contexts with a
    /// `new_value: None` change.
    ///
    /// The host itself never removes the session entry; this exists so tests
    /// and demo scripts can exercise what happens when a peer context does.
    pub fn remove(&self, key: &StorageKey) {
        let old = self.inner.entries.lock().remove(key);
        if old.is_some() {
            self.fan_out(key, old, None);
        }
    }

    fn fan_out(
        &self,
        key: &StorageKey,
        old_value: Option<SessionValue>,
        new_value: Option<SessionValue>,
    ) {
        let change = StorageChange {
            area: self.inner.id,
            key: key.clone(),
            old_value,
            new_value,
        };
        // Deliver to every context except the writer; drop listeners whose
        // receiver side is gone.
        self.inner.listeners.lock().retain(|listener| {
            if listener.context == self.context {
                return true;
            }
            listener.tx.send(change.clone()).is_ok()
        });
    }
}

impl SessionStorage for ContextStorage {
    fn area_id(&self) -> StorageAreaId {
        self.inner.id
    }

    fn get(&self, key: &StorageKey) -> Option<SessionValue> {
        self.inner.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &StorageKey, value: &SessionValue) {
        let old = self
            .inner
            .entries
            .lock()
            .insert(key.clone(), value.clone());
        self.fan_out(key, old, Some(value.clone()));
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contexts_share_the_same_entries() {
        // Arrange
        let area = SharedStorageArea::new();
        let (a, _a_rx) = area.attach();
        let (b, _b_rx) = area.attach();

        // Act
        a.set(&StorageKey::new("session"), &SessionValue::new("abc123"));

        // Assert: the write is visible through every context
        assert_eq!(
            b.get(&StorageKey::new("session")),
            Some(SessionValue::new("abc123"))
        );
    }

    #[test]
    fn test_writer_does_not_receive_its_own_change_event() {
        // Arrange
        let area = SharedStorageArea::new();
        let (a, mut a_rx) = area.attach();

        // Act: a same-context write
        a.set(&StorageKey::new("session"), &SessionValue::new("v"));

        // Assert: no event for the writer
        assert!(a_rx.try_recv().is_err());
    }

    #[test]
    fn test_other_contexts_each_receive_exactly_one_event_per_write() {
        // Arrange: three contexts
        let area = SharedStorageArea::new();
        let (a, _a_rx) = area.attach();
        let (_b, mut b_rx) = area.attach();
        let (_c, mut c_rx) = area.attach();

        // Act
        a.set(&StorageKey::new("session"), &SessionValue::new("v1"));

        // Assert
        let b_event = b_rx.try_recv().unwrap();
        let c_event = c_rx.try_recv().unwrap();
        assert_eq!(b_event.new_value, Some(SessionValue::new("v1")));
        assert_eq!(c_event.new_value, Some(SessionValue::new("v1")));
        assert!(b_rx.try_recv().is_err(), "exactly one event per write");
        assert!(c_rx.try_recv().is_err(), "exactly one event per write");
    }

    #[test]
    fn test_change_event_carries_old_and_new_values() {
        // Arrange
        let area = SharedStorageArea::new();
        let (a, _a_rx) = area.attach();
        let (_b, mut b_rx) = area.attach();
        let key = StorageKey::new("session");

        // Act: first write, then overwrite
        a.set(&key, &SessionValue::new("first"));
        a.set(&key, &SessionValue::new("second"));

        // Assert
        let e1 = b_rx.try_recv().unwrap();
        assert_eq!(e1.old_value, None);
        assert_eq!(e1.new_value, Some(SessionValue::new("first")));

        let e2 = b_rx.try_recv().unwrap();
        assert_eq!(e2.old_value, Some(SessionValue::new("first")));
        assert_eq!(e2.new_value, Some(SessionValue::new("second")));
    }

    #[test]
    fn test_events_carry_the_shared_area_id() {
        let area = SharedStorageArea::new();
        let (a, _a_rx) = area.attach();
        let (_b, mut b_rx) = area.attach();

        a.set(&StorageKey::new("session"), &SessionValue::new("v"));

        let event = b_rx.try_recv().unwrap();
        assert_eq!(event.area, area.area_id());
        assert_eq!(event.area, a.area_id());
    }

    #[test]
    fn test_distinct_areas_have_distinct_ids() {
        let area_one = SharedStorageArea::new();
        let area_two = SharedStorageArea::new();
        assert_ne!(area_one.area_id(), area_two.area_id());
    }

    #[test]
    fn test_remove_notifies_with_none_new_value() {
        // Arrange
        let area = SharedStorageArea::new();
        let (a, _a_rx) = area.attach();
        let (b, mut b_rx) = area.attach();
        let key = StorageKey::new("session");
        a.set(&key, &SessionValue::new("v"));
        let _ = b_rx.try_recv().unwrap(); // consume the set event

        // Act
        a.remove(&key);

        // Assert
        let event = b_rx.try_recv().unwrap();
        assert_eq!(event.old_value, Some(SessionValue::new("v")));
        assert_eq!(event.new_value, None);
        assert_eq!(b.get(&key), None);
    }

    #[test]
    fn test_remove_of_absent_key_emits_nothing() {
        let area = SharedStorageArea::new();
        let (a, _a_rx) = area.attach();
        let (_b, mut b_rx) = area.attach();

        a.remove(&StorageKey::new("session"));

        assert!(b_rx.try_recv().is_err());
    }

    #[test]
    fn test_detached_context_is_pruned_without_affecting_others() {
        // Arrange
        let area = SharedStorageArea::new();
        let (a, _a_rx) = area.attach();
        let (_b, b_rx) = area.attach();
        let (_c, mut c_rx) = area.attach();

        // Act: b's receiver goes away (its "tab" closed), then a writes
        drop(b_rx);
        a.set(&StorageKey::new("session"), &SessionValue::new("v"));

        // Assert: c still hears about it
        assert_eq!(
            c_rx.try_recv().unwrap().new_value,
            Some(SessionValue::new("v"))
        );
    }
}
