//! Scene error types

use thiserror::Error;

use super::{SceneId, SceneRef};

/// Errors raised by scene lifecycle and hierarchy operations
///
/// None of these are fatal. Handles legitimately outlive their entities, so
/// callers are expected to recover locally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Handle is stale or its index is out of range
    #[error("Invalid handle: {0}")]
    InvalidHandle(SceneRef),

    /// Child already belongs to another parent
    #[error("Entity {child} is already parented to {parent}; detach it first")]
    AlreadyParented {
        /// Entity that was to be attached
        child: SceneRef,
        /// Its current parent
        parent: SceneRef,
    },

    /// Handle was issued by a different scene
    #[error("Entity {handle} does not belong to {scene}")]
    ForeignEntity {
        /// Offending handle
        handle: SceneRef,
        /// Scene the operation was invoked on
        scene: SceneId,
    },

    /// Attaching would make an entity its own ancestor
    #[error("Attaching {child} under {parent} would create a cycle")]
    CyclicHierarchy {
        /// Requested parent
        parent: SceneRef,
        /// Requested child
        child: SceneRef,
    },

    /// A parent world matrix cannot be inverted (for example zero scale)
    #[error("World transform of the parent of {0} is not invertible")]
    DegenerateTransform(SceneRef),
}

/// Result alias for scene operations
pub type SceneResult<T> = Result<T, SceneError>;
