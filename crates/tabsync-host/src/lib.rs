//! tabsync-host library crate.
//!
//! This crate is the host side of an embedded-application deployment: it
//! boots the opaque application component against a mount point, hands it an
//! immutable flag payload, and then keeps the application's session state
//! converged with an origin-scoped key-value store across browsing contexts.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Embedded application (opaque component, two ports)
//!         ↕ outbound / inbound
//! [tabsync-host]
//!   ├── domain/           HostConfig (TOML + defaults)
//!   ├── application/      Ports, bootstrap use case, sync-loop service
//!   └── infrastructure/
//!         ├── memory_storage/  Simulated multi-context storage area
//!         ├── file_storage/    TOML-file-backed persistent store
//!         └── scripted_app/    In-process embedded app for demos and tests
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O beyond reading its own TOML file and no async.
//! - `application` depends on `tabsync-core` and tokio channels only; every
//!   external collaborator is an injected trait object.
//! - `infrastructure` provides the injectable implementations.

/// Domain layer: host configuration.
pub mod domain;

/// Application layer: ports, bootstrap, and the sync service.
pub mod application;

/// Infrastructure layer: storage adapters and the scripted embedded app.
pub mod infrastructure;
