//! Infrastructure layer for tabsync-host.
//!
//! Concrete implementations of the application layer's injected ports:
//!
//! - [`memory_storage`] – an in-memory storage area shared by simulated
//!   browsing contexts, with cross-context change fan-out
//! - [`file_storage`] – a TOML-file-backed store that survives host restarts
//! - [`scripted_app`] – an in-process embedded application used by the demo
//!   binary and the integration tests
//!
//! # What does NOT belong here?
//!
//! - The change filter or any forwarding decision (application layer)
//! - Profile/key knowledge (domain, via `tabsync-core`)

pub mod file_storage;
pub mod memory_storage;
pub mod scripted_app;

pub use file_storage::{FileSessionStorage, StorageFileError};
pub use memory_storage::{ContextStorage, SharedStorageArea};
pub use scripted_app::ScriptedApp;
