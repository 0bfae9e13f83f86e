//! An in-process embedded application for demos and integration tests.
//!
//! The real embedded application is an opaque, pre-built component; the host
//! only ever sees its construction call and its two ports.  [`ScriptedApp`]
//! is a stand-in with exactly that surface plus observation hooks:
//!
//! - it records the mount node and [`InitFlags`] it was constructed with,
//! - it keeps an in-memory session state (seeded from the flags, replaced by
//!   every inbound notice and every emission), and
//! - it records every [`SessionNotice`] the host forwards to it.
//!
//! Driving it is explicit: [`ScriptedApp::emit`] pushes a value out of the
//! outbound port the way a user logging in would.
//!
//! Style follows the recording fakes used elsewhere in the workspace's
//! tests: every observable call lands in a lock-protected record that
//! assertions can inspect.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{mpsc, Notify};
use tracing::debug;

use tabsync_core::{InitFlags, MountNode, SessionNotice, SessionValue};

use crate::application::ports::{AppHandle, EmbeddedApp};

#[derive(Default)]
struct AppShared {
    /// Mount node id recorded at construction.
    mounted_at: Mutex<Option<String>>,
    /// The construction payload, recorded verbatim.
    boot_flags: Mutex<Option<InitFlags>>,
    /// The application's in-memory session state.
    session: Mutex<Option<SessionValue>>,
    /// Every inbound notice, in arrival order.
    notices: Mutex<Vec<SessionNotice>>,
    /// Outbound sender, available once mounted.
    emitter: Mutex<Option<mpsc::UnboundedSender<SessionValue>>>,
    /// Wakes tasks waiting for inbound notices.
    notice_signal: Notify,
}

/// The scripted embedded application.
///
/// Cloneable observation handle: all clones share the same recorded state.
#[derive(Clone, Default)]
pub struct ScriptedApp {
    shared: Arc<AppShared>,
}

impl ScriptedApp {
    /// Creates an unmounted application.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a session value on the outbound port, updating the app's own
    /// session state first (the app changes state, then tells the host).
    ///
    /// Returns `false` when the app is not mounted or the host side of the
    /// outbound port is gone.
    pub fn emit(&self, value: SessionValue) -> bool {
        *self.shared.session.lock() = Some(value.clone());
        match self.shared.emitter.lock().as_ref() {
            Some(tx) => tx.send(value).is_ok(),
            None => false,
        }
    }

    /// The mount node id this app was constructed on, if mounted.
    pub fn mounted_at(&self) -> Option<String> {
        self.shared.mounted_at.lock().clone()
    }

    /// The construction flags, if mounted.
    pub fn boot_flags(&self) -> Option<InitFlags> {
        self.shared.boot_flags.lock().clone()
    }

    /// The application's current in-memory session state.
    pub fn session(&self) -> Option<SessionValue> {
        self.shared.session.lock().clone()
    }

    /// Every inbound notice received so far, in arrival order.
    pub fn notices(&self) -> Vec<SessionNotice> {
        self.shared.notices.lock().clone()
    }

    /// Waits until at least `n` inbound notices have arrived.
    ///
    /// Inbound delivery crosses a task boundary; tests use this instead of
    /// sleeping.
    pub async fn wait_for_notices(&self, n: usize) {
        loop {
            let notified = self.shared.notice_signal.notified();
            tokio::pin!(notified);
            // Register before checking, so a notice landing between the check
            // and the await still wakes this task.
            notified.as_mut().enable();
            if self.shared.notices.lock().len() >= n {
                return;
            }
            notified.await;
        }
    }
}

impl EmbeddedApp for ScriptedApp {
    /// Mounts the app: records the node and flags, seeds the session state
    /// from the flags, and spawns the inbound drain task.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime (the inbound drain is a
    /// spawned task).
    fn mount(&self, node: &MountNode, flags: InitFlags) -> AppHandle {
        let (out_tx, outbound) = mpsc::unbounded_channel();
        let (inbound, mut in_rx) = mpsc::unbounded_channel::<SessionNotice>();

        *self.shared.mounted_at.lock() = Some(node.id().to_string());
        *self.shared.session.lock() = flags.session.clone();
        *self.shared.boot_flags.lock() = Some(flags);
        *self.shared.emitter.lock() = Some(out_tx);

        debug!(mount = node.id(), "scripted application mounted");

        // Drain the inbound port: each notice replaces the app's session
        // state, exactly what a session-aware application does with an
        // externally-driven session change.
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            while let Some(notice) = in_rx.recv().await {
                *shared.session.lock() = notice.new_value.clone();
                shared.notices.lock().push(notice);
                shared.notice_signal.notify_waiters();
            }
        });

        AppHandle { outbound, inbound }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
