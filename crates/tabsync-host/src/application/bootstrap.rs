//! The bootstrap use case: construct the embedded application exactly once.
//!
//! At page load the host performs a fixed, non-retried sequence:
//!
//! 1. Resolve the configured mount point in the host document.  A missing
//!    mount point is a reported configuration error, never a silent no-op.
//! 2. Read the profile's persist key from the injected storage port.  An
//!    absent entry becomes `session: None`; it is never coerced to an empty
//!    string.
//! 3. Build the immutable [`InitFlags`], reading the wall clock only when
//!    the profile's payload shape includes the date.
//! 4. Mount the application and hand its port handle back to the caller,
//!    which passes it on to the sync service.
//!
//! There are no retries and no timeouts anywhere in this sequence; the
//! storage read is synchronous and mounting is a plain constructor call.

use thiserror::Error;
use tracing::{debug, info};

use tabsync_core::{DeploymentProfile, InitFlags, MountError, MountRegistry};

use crate::application::ports::{AppHandle, EmbeddedApp, SessionStorage};

/// Error type for the bootstrap use case.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The host document does not declare the configured mount point.
    #[error("cannot boot embedded application: {0}")]
    Mount(#[from] MountError),
}

/// Boots the embedded application and returns the host's port handle.
///
/// # Errors
///
/// Returns [`BootstrapError::Mount`] when `mount_id` is not declared in
/// `mounts`.  Storage absence is not an error: an unset session entry simply
/// yields `session: None` in the flags.
pub fn boot_embedded_app(
    profile: DeploymentProfile,
    mounts: &MountRegistry,
    mount_id: &str,
    storage: &dyn SessionStorage,
    app: &dyn EmbeddedApp,
) -> Result<AppHandle, BootstrapError> {
    let node = mounts.lookup(mount_id)?;

    let persist_key = profile.persist_key();
    let stored = storage.get(&persist_key);
    debug!(
        key = %persist_key,
        present = stored.is_some(),
        "read session entry at bootstrap"
    );

    let flags = InitFlags::build(stored, profile.payload());

    info!(
        profile = %profile,
        mount = node.id(),
        session_present = flags.session.is_some(),
        date_flag = flags.today.is_some(),
        "mounting embedded application"
    );

    Ok(app.mount(node, flags))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
