//! Stone entity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a stone.
pub type StoneId = Uuid;

/// A draggable token in the rake.
///
/// Stones carry nothing but their identity. Where a stone is drawn is view
/// state and lives on its visual token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stone {
    id: StoneId,
}

impl Stone {
    /// Create a new stone with a fresh identity.
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }

    /// Reconstruct a stone with a known ID.
    pub fn with_id(id: StoneId) -> Self {
        Self { id }
    }

    /// The stone's identity.
    pub fn id(&self) -> StoneId {
        self.id
    }
}

impl Default for Stone {
    fn default() -> Self {
        Self::new()
    }
}
