//! Mount points: where the embedded application attaches to the host.
//!
//! The original host looked the mount node up in the ambient document and
//! silently did nothing when it was missing.  Here the lookup is an explicit
//! operation with a defined failure: a missing mount point is a configuration
//! error the bootstrapper reports, not a page that quietly renders nothing.

use std::collections::HashMap;

use thiserror::Error;

/// Error type for mount-point lookup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MountError {
    /// The requested mount id is not present in the host document.
    #[error("mount point '{id}' not found in the host document")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },

    /// A mount id was registered twice.
    #[error("mount point '{id}' is already registered")]
    Duplicate {
        /// The id that collided.
        id: String,
    },
}

/// A single attachment point in the host document.
///
/// Opaque to the embedded application: it only needs a stable identity to
/// attach to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountNode {
    id: String,
}

impl MountNode {
    /// The mount point's id.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// The set of mount points the host document declares.
///
/// Built once by the host at startup, then queried by the bootstrapper.
#[derive(Debug, Default)]
pub struct MountRegistry {
    nodes: HashMap<String, MountNode>,
}

impl MountRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a mount point.
    ///
    /// # Errors
    ///
    /// Returns [`MountError::Duplicate`] if the id is already registered.
    pub fn register(&mut self, id: impl Into<String>) -> Result<(), MountError> {
        let id = id.into();
        if self.nodes.contains_key(&id) {
            return Err(MountError::Duplicate { id });
        }
        self.nodes.insert(id.clone(), MountNode { id });
        Ok(())
    }

    /// Resolves a mount point by id.
    ///
    /// # Errors
    ///
    /// Returns [`MountError::NotFound`] when the id is absent.  Callers must
    /// surface this; there is no silent fallback.
    pub fn lookup(&self, id: &str) -> Result<&MountNode, MountError> {
        self.nodes.get(id).ok_or_else(|| MountError::NotFound {
            id: id.to_string(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
