//! Generational scene handles
//!
//! A [`SceneRef`] names one entity instance: the scene it lives in, the slot
//! it occupies and the generation that slot had when the entity was spawned.
//! Destroying the entity bumps the slot generation, so every handle captured
//! before the destroy stops resolving, even after the slot is reused.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use super::Scene;

static NEXT_SCENE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a [`Scene`] instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneId(u64);

impl SceneId {
    /// Allocate a fresh id
    pub(crate) fn next() -> Self {
        Self(NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene#{}", self.0)
    }
}

/// Handle to an entity living in a [`Scene`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneRef {
    /// Scene that issued the handle
    scene: SceneId,
    /// Slot index in the scene's entity storage
    index: u32,
    /// Generation of the slot when the handle was issued
    generation: u32,
}

impl SceneRef {
    pub(crate) const fn new(scene: SceneId, index: u32, generation: u32) -> Self {
        Self { scene, index, generation }
    }

    /// Scene that issued this handle
    pub const fn scene(&self) -> SceneId {
        self.scene
    }

    /// Slot index
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Slot generation this handle was issued for
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// Whether this handle still names a live entity in `scene`
    pub fn is_alive(self, scene: &Scene) -> bool {
        scene.contains(self)
    }

    /// Destroy the referenced entity and its subtree through the owning scene
    ///
    /// Returns the number of entities destroyed; 0 if the handle is stale.
    pub fn destroy(self, scene: &mut Scene) -> usize {
        scene.destroy_entity(self)
    }
}

impl fmt::Display for SceneRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}v{}", self.scene, self.index, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_ids_are_unique() {
        let a = SceneId::next();
        let b = SceneId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn test_handle_equality_includes_generation() {
        let scene = SceneId::next();
        let old = SceneRef::new(scene, 3, 1);
        let new = SceneRef::new(scene, 3, 2);

        assert_ne!(old, new);
        assert_eq!(old.index(), new.index());
        assert_eq!(format!("{old}"), format!("scene#{}:3v1", scene.get()));
    }
}
