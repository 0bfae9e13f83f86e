//! Domain layer for tabsync-host.
//!
//! Holds the host's own configuration model.  The session/profile/event
//! types live in `tabsync-core`; this layer only adds what is specific to
//! running the host as a process.

pub mod config;

pub use config::{load_config, ConfigError, DemoSection, HostConfig, HostSection, StorageSection};
