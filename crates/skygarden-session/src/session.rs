//! Session types: configuration and the read-only snapshot consumers see.

use std::fmt;

use serde::{Deserialize, Serialize};
use skygarden_protocol::{Identity, Role};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`SessionStore`](crate::SessionStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// The single durable key holding the serialized identity.
    pub storage_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_key: "identity".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionPhase
// ---------------------------------------------------------------------------

/// Whether the persisted identity has been read yet.
///
/// ```text
///   Restoring ──(restore)──→ Ready
/// ```
///
/// Nothing may decide "signed out" while `Restoring`: the identity might
/// still be on its way from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Restoring,
    Ready,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Restoring => write!(f, "Restoring"),
            Self::Ready => write!(f, "Ready"),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionSnapshot
// ---------------------------------------------------------------------------

/// A point-in-time, read-only copy of the session.
///
/// Handed out by the store through a `watch` channel. `revision` goes up
/// by one whenever the identity changes (sign-in, sign-out, role switch);
/// views that cache anything derived from the identity compare it to know
/// when to rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub identity: Option<Identity>,
    /// An auth operation is in flight.
    pub processing: bool,
    /// Message from the last failed operation, cleared when the next
    /// one starts.
    pub auth_error: Option<String>,
    pub revision: u64,
}

impl SessionSnapshot {
    pub fn is_restored(&self) -> bool {
        self.phase == SessionPhase::Ready
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.identity.as_ref().map(|i| i.role)
    }
}
