//! The injected ports between the host, the storage area, and the embedded
//! application.
//!
//! The original hosts reached for ambient globals: the page's storage object
//! and the window's event stream.  Here both collaborators, and the
//! application component itself, arrive as explicit values so every one of
//! them can be replaced with an in-memory fake in tests.
//!
//! # The two application ports
//!
//! ```text
//!               outbound (SessionValue)
//!   embedded app ──────────────────────▶ host ──▶ storage.set(persist_key)
//!
//!               inbound (SessionNotice)
//!   embedded app ◀────────────────────── host ◀── StorageChange (other tab)
//! ```
//!
//! Both ports are single-consumer channels.  The host subscribes to the
//! outbound port exactly once and holds the inbound sender for the page
//! lifetime; neither is ever re-registered or torn down mid-session.

use tokio::sync::mpsc;

use tabsync_core::{InitFlags, MountNode, SessionNotice, SessionValue, StorageAreaId, StorageKey};

// ── Storage port ──────────────────────────────────────────────────────────────

/// Synchronous get/set access to one origin-scoped key-value storage area.
///
/// Mirrors the storage interface the host is written against: string-keyed,
/// synchronous, shared across same-origin browsing contexts.  The only
/// writer in the whole system is the sync loop's outbound handler; everything
/// else reads.
///
/// Implementations must be cheap to call from an async task: both methods
/// are expected to complete without blocking on anything slower than a local
/// lock or a small file write.
pub trait SessionStorage: Send + Sync {
    /// Identity of the underlying storage area, used by the inbound filter
    /// to discard events from unrelated storage mechanisms.
    fn area_id(&self) -> StorageAreaId;

    /// Reads the current value of `key`, or `None` if the entry is unset.
    fn get(&self, key: &StorageKey) -> Option<SessionValue>;

    /// Overwrites `key` with `value` unconditionally.
    ///
    /// No validation and no deduplication: every call overwrites, exactly as
    /// every outbound emission must.
    fn set(&self, key: &StorageKey, value: &SessionValue);
}

// ── Application ports ─────────────────────────────────────────────────────────

/// The handle an embedded application returns from construction.
///
/// Owns the host end of both ports.  The channels are unbounded: emissions
/// and change notifications arrive at user-interaction rate, and the browser
/// model being mirrored here never drops a storage event on the floor.
#[derive(Debug)]
pub struct AppHandle {
    /// App → host: session values the application wants persisted.
    pub outbound: mpsc::UnboundedReceiver<SessionValue>,
    /// Host → app: session changes observed in other browsing contexts.
    pub inbound: mpsc::UnboundedSender<SessionNotice>,
}

/// Constructor interface of the opaque embedded application component.
///
/// The host knows nothing about the application beyond this: it can be
/// mounted onto a node with an immutable [`InitFlags`] payload, and the
/// result exposes the two named ports.
pub trait EmbeddedApp: Send + Sync {
    /// Instantiates the application on `node` with the given flags and
    /// returns the host's handle to its ports.
    fn mount(&self, node: &MountNode, flags: InitFlags) -> AppHandle;
}

// ── Tests ─────────────────────────────────────────────────────────────────────
