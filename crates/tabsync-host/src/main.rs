//! TabSync host — entry point.
//!
//! This binary boots the scripted embedded application against a configured
//! storage backend and runs the session sync loop until Ctrl+C (or until a
//! demo script finishes).  It is the process-shaped stand-in for a host page:
//! construct the app once, then persist its outbound session values and
//! forward remote session changes for the rest of the lifetime.
//!
//! # Usage
//!
//! ```text
//! tabsync-host [OPTIONS]
//!
//! Options:
//!   --config        <PATH>  Host config TOML [default: tabsync.toml]
//!   --profile       <NAME>  Deployment profile: token | session | session-with-date
//!   --mount-id      <ID>    Mount point to boot the application on
//!   --storage-file  <PATH>  TOML-file-backed store (default: in-memory area)
//!   --script        <PATH>  JSON demo script to drive against the session
//!   --peer-contexts <N>     Simulated peer tabs (in-memory storage only)
//! ```
//!
//! # Environment variable overrides
//!
//! CLI args take precedence when both are present.
//!
//! | Variable               | Description                        |
//! |------------------------|------------------------------------|
//! | `TABSYNC_CONFIG`       | Host config TOML path              |
//! | `TABSYNC_PROFILE`      | Deployment profile name            |
//! | `TABSYNC_MOUNT_ID`     | Mount point id                     |
//! | `TABSYNC_STORAGE_FILE` | File-backed store path             |
//! | `TABSYNC_PEER_CONTEXTS`| Simulated peer tab count           |
//!
//! # Architecture overview
//!
//! ```text
//! scripted embedded app  (outbound/inbound ports)
//!         ↕
//! tabsync-host  ← this process
//!   domain/          HostConfig (TOML)
//!   application/     bootstrap + sync loop
//!   infrastructure/  storage area, file store, scripted app
//!         ↕
//! storage backend  (in-memory multi-context area, or TOML file)
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tabsync_core::{MountRegistry, SessionValue, StorageKey};

use tabsync_host::application::{boot_embedded_app, run_sync, SessionStorage};
use tabsync_host::domain::{load_config, HostConfig};
use tabsync_host::infrastructure::{
    ContextStorage, FileSessionStorage, ScriptedApp, SharedStorageArea,
};

/// Mount points the host document declares.  Booting against any other id is
/// a configuration error surfaced at startup.
const HOST_MOUNT_IDS: &[&str] = &["app-root"];

// ── CLI argument definitions ──────────────────────────────────────────────────

/// TabSync host process.
///
/// Boots the embedded application with the stored session value and keeps
/// the session entry and the application converged across contexts.
#[derive(Debug, Parser)]
#[command(
    name = "tabsync-host",
    about = "Host bootstrapper and cross-tab session sync for an embedded application",
    version
)]
struct Cli {
    /// Path of the host configuration TOML.  A missing file yields defaults.
    #[arg(long, default_value = "tabsync.toml", env = "TABSYNC_CONFIG")]
    config: PathBuf,

    /// Deployment profile: `token`, `session`, or `session-with-date`.
    #[arg(long, env = "TABSYNC_PROFILE")]
    profile: Option<String>,

    /// Mount point id to boot the embedded application on.
    #[arg(long, env = "TABSYNC_MOUNT_ID")]
    mount_id: Option<String>,

    /// Path of a TOML-file-backed session store.  When absent, the host runs
    /// on the in-memory multi-context area.
    #[arg(long, env = "TABSYNC_STORAGE_FILE")]
    storage_file: Option<PathBuf>,

    /// JSON demo script to run against the session, then exit.
    #[arg(long)]
    script: Option<PathBuf>,

    /// How many simulated peer tabs to attach (in-memory storage only).
    #[arg(long, env = "TABSYNC_PEER_CONTEXTS")]
    peer_contexts: Option<u8>,
}

impl Cli {
    /// Loads the config file and layers the CLI/env overrides on top.
    ///
    /// # Errors
    ///
    /// Returns an error when the config file exists but cannot be parsed, or
    /// when `--profile` names an unknown deployment profile.
    fn into_host_config(self) -> anyhow::Result<HostConfig> {
        let mut config = load_config(&self.config)
            .with_context(|| format!("failed to load config from {}", self.config.display()))?;

        if let Some(profile) = self.profile {
            config.host.profile = profile
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("invalid --profile")?;
        }
        if let Some(mount_id) = self.mount_id {
            config.host.mount_id = mount_id;
        }
        if let Some(path) = self.storage_file {
            config.storage.file = Some(path);
        }
        if let Some(n) = self.peer_contexts {
            config.demo.peer_contexts = n;
        }
        if let Some(script) = self.script {
            config.demo.script = Some(script);
        }

        Ok(config)
    }
}

// ── Demo script ───────────────────────────────────────────────────────────────

/// One step of a demo script.
///
/// `remote-*` steps act through a simulated peer tab; `emit` acts through
/// the embedded application itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
enum DemoStep {
    /// The application emits a session value on its outbound port.
    Emit(String),
    /// A peer tab writes a storage entry.  `key` defaults to the profile's
    /// watch key.
    RemoteWrite {
        #[serde(default)]
        key: Option<String>,
        value: String,
    },
    /// A peer tab removes a storage entry.  `key` defaults to the profile's
    /// watch key.
    RemoteRemove {
        #[serde(default)]
        key: Option<String>,
    },
    /// Waits the given number of milliseconds.
    PauseMs(u64),
}

/// A JSON demo script: a flat list of steps, run in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct DemoScript {
    steps: Vec<DemoStep>,
}

impl DemoScript {
    fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read demo script {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse demo script {}", path.display()))
    }
}

/// Runs the script steps against the app and the first peer tab.
async fn run_script(
    script: DemoScript,
    app: &ScriptedApp,
    peer: Option<&ContextStorage>,
    default_key: &StorageKey,
) {
    for (index, step) in script.steps.into_iter().enumerate() {
        match step {
            DemoStep::Emit(value) => {
                info!(step = index, %value, "script: app emits session value");
                if !app.emit(SessionValue::new(value)) {
                    warn!(step = index, "script: outbound port is gone; emit skipped");
                }
            }
            DemoStep::RemoteWrite { key, value } => {
                let key = key.map_or_else(|| default_key.clone(), StorageKey::new);
                match peer {
                    Some(peer) => {
                        info!(step = index, %key, %value, "script: peer tab writes entry");
                        peer.set(&key, &SessionValue::new(value));
                    }
                    None => warn!(
                        step = index,
                        "script: no peer context available; remote-write skipped"
                    ),
                }
            }
            DemoStep::RemoteRemove { key } => {
                let key = key.map_or_else(|| default_key.clone(), StorageKey::new);
                match peer {
                    Some(peer) => {
                        info!(step = index, %key, "script: peer tab removes entry");
                        peer.remove(&key);
                    }
                    None => warn!(
                        step = index,
                        "script: no peer context available; remote-remove skipped"
                    ),
                }
            }
            DemoStep::PauseMs(ms) => {
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// 1. Initialise `tracing` (log level from `RUST_LOG`, fallback `info`).
/// 2. Parse CLI arguments and layer them over the config file.
/// 3. Build the mount registry the host document declares.
/// 4. Open the storage backend and boot the embedded application.
/// 5. Run the sync loop until Ctrl+C, or until the demo script finishes.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `EnvFilter::try_from_default_env()` reads `RUST_LOG`; absent or invalid
    // falls back to `info`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_host_config()?;
    let profile = config.host.profile;

    info!(
        %profile,
        mount = %config.host.mount_id,
        "TabSync host starting"
    );

    // ── Host document ─────────────────────────────────────────────────────────
    let mut mounts = MountRegistry::new();
    for id in HOST_MOUNT_IDS {
        mounts
            .register(*id)
            .expect("host mount ids are distinct constants");
    }

    // ── Storage backend ───────────────────────────────────────────────────────
    //
    // In-memory: the host attaches to a shared area alongside simulated peer
    // tabs, and remote writes reach it as change events.
    //
    // File: a persistent single-context store; the change stream stays silent
    // but must remain open for the lifetime of the loop, so the sender half
    // is held here until shutdown.
    let (storage, changes, peers, _quiet_changes_tx): (
        Arc<dyn SessionStorage>,
        mpsc::UnboundedReceiver<tabsync_core::StorageChange>,
        Vec<ContextStorage>,
        Option<mpsc::UnboundedSender<tabsync_core::StorageChange>>,
    ) = match &config.storage.file {
        Some(path) => {
            let store = FileSessionStorage::open(path)
                .with_context(|| format!("failed to open session store {}", path.display()))?;
            info!(path = %path.display(), "using file-backed session store");
            let (tx, rx) = mpsc::unbounded_channel();
            (Arc::new(store), rx, Vec::new(), Some(tx))
        }
        None => {
            let area = SharedStorageArea::new();
            let (host_storage, host_changes) = area.attach();
            let peers: Vec<ContextStorage> = (0..config.demo.peer_contexts)
                .map(|_| area.attach().0)
                .collect();
            info!(
                area = %area.area_id(),
                peer_contexts = peers.len(),
                "using in-memory multi-context storage area"
            );
            (Arc::new(host_storage), host_changes, peers, None)
        }
    };

    // ── Bootstrap ─────────────────────────────────────────────────────────────
    let app = ScriptedApp::new();
    let handle = boot_embedded_app(
        profile,
        &mounts,
        &config.host.mount_id,
        storage.as_ref(),
        &app,
    )?;

    // ── Sync loop + graceful shutdown ─────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sync_task = tokio::spawn(run_sync(
        profile,
        Arc::clone(&storage),
        handle,
        changes,
        shutdown_rx,
    ));

    // Ctrl+C flips the shutdown signal; the sync loop drains and stops.
    {
        let shutdown_tx = shutdown_tx.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("received Ctrl+C — initiating graceful shutdown");
                    let _ = shutdown_tx.send(true);
                }
                Err(e) => {
                    tracing::error!("failed to listen for Ctrl+C signal: {e}");
                }
            }
        });
    }

    match &config.demo.script {
        Some(path) => {
            let script = DemoScript::load(path)?;
            info!(script = %path.display(), "running demo script");
            run_script(script, &app, peers.first(), &profile.watch_key()).await;
            // Let queued port traffic drain before signalling teardown.
            tokio::time::sleep(Duration::from_millis(100)).await;
            let _ = shutdown_tx.send(true);
        }
        None => {
            info!("session sync running; press Ctrl+C to stop");
        }
    }

    let stats = sync_task.await.context("sync loop panicked")?;

    // ── Summary ───────────────────────────────────────────────────────────────
    let persisted = storage.get(&profile.persist_key());
    info!(
        persisted_entry = persisted.as_ref().map(SessionValue::as_str),
        app_session = app.session().as_ref().map(SessionValue::as_str),
        persisted = stats.persisted,
        forwarded = stats.forwarded,
        dropped = stats.dropped,
        "TabSync host stopped"
    );

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tabsync_core::DeploymentProfile;

    // ── CLI parsing ───────────────────────────────────────────────────────────

    #[test]
    fn test_cli_default_config_path() {
        let cli = Cli::parse_from(["tabsync-host"]);
        assert_eq!(cli.config, PathBuf::from("tabsync.toml"));
    }

    #[test]
    fn test_cli_defaults_leave_overrides_unset() {
        let cli = Cli::parse_from(["tabsync-host"]);
        assert!(cli.profile.is_none());
        assert!(cli.mount_id.is_none());
        assert!(cli.storage_file.is_none());
        assert!(cli.script.is_none());
        assert!(cli.peer_contexts.is_none());
    }

    #[test]
    fn test_cli_profile_override() {
        let cli = Cli::parse_from(["tabsync-host", "--profile", "session-with-date"]);
        assert_eq!(cli.profile.as_deref(), Some("session-with-date"));
    }

    #[test]
    fn test_cli_peer_contexts_override() {
        let cli = Cli::parse_from(["tabsync-host", "--peer-contexts", "3"]);
        assert_eq!(cli.peer_contexts, Some(3));
    }

    // ── Config layering ───────────────────────────────────────────────────────

    #[test]
    fn test_into_host_config_defaults() {
        // Arrange: default CLI, pointing at a config file that does not exist
        let cli = Cli::parse_from(["tabsync-host", "--config", "/nonexistent/tabsync.toml"]);

        // Act
        let config = cli.into_host_config().unwrap();

        // Assert
        assert_eq!(config, HostConfig::default());
    }

    #[test]
    fn test_into_host_config_applies_profile_override() {
        let cli = Cli::parse_from([
            "tabsync-host",
            "--config",
            "/nonexistent/tabsync.toml",
            "--profile",
            "session",
        ]);
        let config = cli.into_host_config().unwrap();
        assert_eq!(config.host.profile, DeploymentProfile::Session);
    }

    #[test]
    fn test_into_host_config_applies_mount_and_storage_overrides() {
        let cli = Cli::parse_from([
            "tabsync-host",
            "--config",
            "/nonexistent/tabsync.toml",
            "--mount-id",
            "main",
            "--storage-file",
            "/tmp/store.toml",
        ]);
        let config = cli.into_host_config().unwrap();
        assert_eq!(config.host.mount_id, "main");
        assert_eq!(config.storage.file, Some(PathBuf::from("/tmp/store.toml")));
    }

    #[test]
    fn test_into_host_config_rejects_unknown_profile() {
        let cli = Cli::parse_from([
            "tabsync-host",
            "--config",
            "/nonexistent/tabsync.toml",
            "--profile",
            "banana",
        ]);
        let result = cli.into_host_config();
        assert!(result.is_err());
    }

    // ── Demo script parsing ───────────────────────────────────────────────────

    #[test]
    fn test_demo_script_parses_all_step_kinds() {
        // Arrange
        let json = r#"{
            "steps": [
                {"emit": "xyz789"},
                {"remote-write": {"value": "new1"}},
                {"remote-write": {"key": "other", "value": "x"}},
                {"remote-remove": {}},
                {"pause-ms": 50}
            ]
        }"#;

        // Act
        let script: DemoScript = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(script.steps.len(), 5);
        assert_eq!(script.steps[0], DemoStep::Emit("xyz789".to_string()));
        assert_eq!(
            script.steps[1],
            DemoStep::RemoteWrite {
                key: None,
                value: "new1".to_string()
            }
        );
        assert_eq!(
            script.steps[2],
            DemoStep::RemoteWrite {
                key: Some("other".to_string()),
                value: "x".to_string()
            }
        );
        assert_eq!(script.steps[3], DemoStep::RemoteRemove { key: None });
        assert_eq!(script.steps[4], DemoStep::PauseMs(50));
    }

    #[test]
    fn test_demo_script_rejects_unknown_step() {
        let json = r#"{"steps": [{"teleport": "nope"}]}"#;
        let result: Result<DemoScript, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
