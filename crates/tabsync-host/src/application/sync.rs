//! The sync service: the host's event loop for the page lifetime.
//!
//! After bootstrap the host does exactly two things, forever:
//!
//! - **Outbound persistence.**  Every session value the application emits is
//!   written verbatim to the profile's persist key.  No validation, no
//!   deduplication; this is the only write path to storage in the system.
//! - **Inbound forwarding.**  Every storage change observed in another
//!   browsing context runs through the two-part filter
//!   ([`tabsync_core::session_notice`]); matches are forwarded into the
//!   application's inbound port, everything else is dropped.
//!
//! Both handlers run on one task driven by `tokio::select!`, so they can
//! never re-enter one another.  Storage has a single writer (the outbound
//! arm); the inbound arm never touches storage.
//!
//! # Lifetime
//!
//! The loop has no terminal state of its own: it runs until the shutdown
//! signal fires (the host analog of page teardown) or one of its channels
//! closes because the surrounding environment went away.  Nothing is ever
//! unregistered mid-session.
//!
//! # Ordering
//!
//! Change events carry whatever ordering the storage area's delivery gives
//! them.  The loop makes no attempt to order remote events against local
//! writes; the writing context never sees events for its own writes at all.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use tabsync_core::{session_notice, DeploymentProfile, StorageChange};

use crate::application::ports::{AppHandle, SessionStorage};

/// Counters reported when the sync loop exits.
///
/// Purely observational: the loop's behavior never depends on them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncStats {
    /// Outbound emissions written to storage.
    pub persisted: u64,
    /// Change events forwarded to the application's inbound port.
    pub forwarded: u64,
    /// Change events dropped by the filter.
    pub dropped: u64,
}

/// Runs the sync loop until shutdown.
///
/// Takes ownership of the application handle: the outbound receiver is the
/// single permanent subscription to the app's emissions, and the inbound
/// sender is the single injection point for remote changes.
///
/// The loop also exits when:
///
/// - the app's outbound port closes (the application was torn down), or
/// - the change stream closes (the storage environment was torn down), or
/// - the app's inbound port is gone when a forward is attempted.
///
/// Returns the final [`SyncStats`].
pub async fn run_sync(
    profile: DeploymentProfile,
    storage: Arc<dyn SessionStorage>,
    mut handle: AppHandle,
    mut changes: mpsc::UnboundedReceiver<StorageChange>,
    mut shutdown: watch::Receiver<bool>,
) -> SyncStats {
    let persist_key = profile.persist_key();
    let watch_key = profile.watch_key();
    let area = storage.area_id();
    let mut stats = SyncStats::default();

    info!(
        profile = %profile,
        persist_key = %persist_key,
        watch_key = %watch_key,
        %area,
        "session sync loop started"
    );

    loop {
        // Biased polling order: both ports drain before teardown is honored,
        // so a shutdown signal never races queued port work.
        tokio::select! {
            biased;

            emitted = handle.outbound.recv() => match emitted {
                Some(value) => {
                    // Verbatim, unconditional overwrite.
                    storage.set(&persist_key, &value);
                    stats.persisted += 1;
                    debug!(key = %persist_key, "persisted outbound session value");
                }
                None => {
                    debug!("outbound port closed; application is gone");
                    break;
                }
            },

            event = changes.recv() => match event {
                Some(change) => match session_notice(&change, area, &watch_key) {
                    Some(notice) => {
                        if handle.inbound.send(notice).is_err() {
                            warn!("inbound port closed; application is gone");
                            break;
                        }
                        stats.forwarded += 1;
                        debug!(key = %watch_key, "forwarded remote session change");
                    }
                    None => {
                        stats.dropped += 1;
                        debug!(
                            key = %change.key,
                            event_area = %change.area,
                            "dropped unrelated storage change"
                        );
                    }
                },
                None => {
                    debug!("change stream closed; storage environment is gone");
                    break;
                }
            },

            changed = shutdown.changed() => {
                // A dropped shutdown sender means the host is tearing down too.
                if changed.is_err() || *shutdown.borrow() {
                    info!("shutdown signalled; session sync loop stopping");
                    break;
                }
            }
        }
    }

    info!(
        persisted = stats.persisted,
        forwarded = stats.forwarded,
        dropped = stats.dropped,
        "session sync loop stopped"
    );
    stats
}

// ── Tests ─────────────────────────────────────────────────────────────────────
