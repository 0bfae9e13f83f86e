//! # tabsync-core
//!
//! Shared library for TabSync containing the session data model, deployment
//! profiles, storage-change event types, and the pure change-filter logic.
//!
//! This crate is used by the host application (`tabsync-host`) and by any
//! future embedding surface.  It has zero dependencies on async runtimes,
//! channels, file systems, or process environment.
//!
//! # Architecture overview
//!
//! TabSync is the host side of an embedded-application deployment: a host
//! page instantiates a pre-built, opaque application component, hands it an
//! immutable flag payload at construction time, and afterwards keeps the
//! application's session state and an origin-scoped persistent key-value
//! store converged across browsing contexts ("tabs").
//!
//! This crate (`tabsync-core`) is the shared foundation.  It defines:
//!
//! - **`domain::session`** – The opaque [`SessionValue`], the construction
//!   payload ([`InitFlags`], [`DateStamp`], [`FlagPayload`]), and the
//!   [`SessionNotice`] delivered to the application's inbound port.
//!
//! - **`domain::storage`** – Storage identity and event types: which area a
//!   key-value entry lives in ([`StorageAreaId`]), which entry changed
//!   ([`StorageKey`]), and the cross-context [`StorageChange`] notification.
//!
//! - **`domain::profile`** – The three observed deployment variants as an
//!   explicit [`DeploymentProfile`], each pinning its persist key, watch key,
//!   and flag payload shape.
//!
//! - **`domain::mount`** – Explicit mount-point lookup ([`MountRegistry`])
//!   with a defined failure outcome instead of a silent no-op.
//!
//! - **`sync`** – The pure two-part filter that decides whether a storage
//!   change is forwarded to the embedded application.

// Declare the top-level modules.  Rust will look for each in a subdirectory
// or file with the same name (e.g., src/domain/mod.rs).
pub mod domain;
pub mod sync;

// Re-export the most-used types at the crate root so callers can write
// `tabsync_core::SessionValue` instead of the longer module path.
pub use domain::mount::{MountError, MountNode, MountRegistry};
pub use domain::profile::DeploymentProfile;
pub use domain::session::{DateStamp, FlagPayload, InitFlags, SessionNotice, SessionValue};
pub use domain::storage::{StorageAreaId, StorageChange, StorageKey};
pub use sync::session_notice;
