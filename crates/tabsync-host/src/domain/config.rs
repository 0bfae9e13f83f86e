//! TOML-based host configuration.
//!
//! The host reads an optional `tabsync.toml`.  Every field has a default so
//! a missing file (first run, tests) yields a fully working configuration,
//! and an older file missing newer fields keeps loading after an upgrade.
//!
//! Example:
//!
//! ```toml
//! [host]
//! profile = "session-with-date"
//! mount_id = "app-root"
//!
//! [storage]
//! file = "/var/lib/tabsync/session-store.toml"
//!
//! [demo]
//! peer_contexts = 2
//! script = "demo-script.json"
//! ```
//!
//! Precedence is CLI argument > environment variable > config file > default;
//! the CLI layering happens in `main.rs`, this module only loads the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tabsync_core::DeploymentProfile;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level host configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct HostConfig {
    #[serde(default)]
    pub host: HostSection,
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub demo: DemoSection,
}

/// Which deployment variant this host runs and where the app attaches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostSection {
    /// Deployment profile: `"token"`, `"session"`, or `"session-with-date"`.
    #[serde(default)]
    pub profile: DeploymentProfile,
    /// Mount-point id the bootstrapper resolves in the host document.
    #[serde(default = "default_mount_id")]
    pub mount_id: String,
}

/// Storage backend selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StorageSection {
    /// Path of the TOML-file-backed store.  Absent means the in-memory
    /// multi-context area (the default for demos and tests).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Settings for the demo run mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DemoSection {
    /// How many simulated peer browsing contexts to attach alongside the
    /// host's own context (in-memory storage only).
    #[serde(default = "default_peer_contexts")]
    pub peer_contexts: u8,
    /// Optional JSON script of demo steps to drive against the session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<PathBuf>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_mount_id() -> String {
    "app-root".to_string()
}
fn default_peer_contexts() -> u8 {
    1
}

impl Default for HostSection {
    fn default() -> Self {
        Self {
            profile: DeploymentProfile::default(),
            mount_id: default_mount_id(),
        }
    }
}

impl Default for DemoSection {
    fn default() -> Self {
        Self {
            peer_contexts: default_peer_contexts(),
            script: None,
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Loads `HostConfig` from `path`, returning `HostConfig::default()` if the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<HostConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let cfg: HostConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HostConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
