//! Domain layer for tabsync-core.
//!
//! Pure business-logic types with no dependencies on I/O, async runtimes, or
//! external frameworks.  Everything in this module can be constructed and
//! inspected from a plain unit test.
//!
//! # What belongs in the domain layer?
//!
//! - The opaque session value and the construction-time flag payload
//! - Storage identity types and the cross-context change event
//! - The deployment-profile table (which keys each variant reads/watches)
//! - Mount-point lookup with an explicit error type
//!
//! # What does NOT belong here?
//!
//! - Channels, tasks, or anything `tokio`
//! - File I/O or environment variable reading
//! - The sync loop itself (that is the host application layer)

pub mod mount;
pub mod profile;
pub mod session;
pub mod storage;
