//! Application layer for tabsync-host.
//!
//! The application layer orchestrates the host's two jobs: booting the
//! embedded application once, and running the sync loop for the rest of the
//! page lifetime.  It depends only on the injected port traits and on
//! `tabsync-core`; every concrete storage area, event source, and application
//! component is supplied by the infrastructure layer (or by a test).
//!
//! # Responsibilities
//!
//! - Defining the injected ports ([`SessionStorage`], [`EmbeddedApp`],
//!   [`AppHandle`])
//! - The bootstrap use case: storage read, flag construction, mounting
//! - The sync service: outbound persistence and inbound change forwarding
//!
//! # What does NOT belong here?
//!
//! - Concrete storage (in-memory area, TOML file) — infrastructure
//! - CLI parsing, tracing setup, signal handling — `main.rs`

pub mod bootstrap;
pub mod ports;
pub mod sync;

pub use bootstrap::{boot_embedded_app, BootstrapError};
pub use ports::{AppHandle, EmbeddedApp, SessionStorage};
pub use sync::{run_sync, SyncStats};
