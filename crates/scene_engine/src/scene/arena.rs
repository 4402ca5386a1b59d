//! Entity arena
//!
//! The [`Scene`] owns every entity by value in a vector of slots. Destroyed
//! entities leave a gap that the next spawn fills (lowest index first), and
//! every destroy bumps the slot generation so stale [`SceneRef`]s are
//! rejected instead of resolving to the new occupant.
//!
//! ```text
//! slots:  [ A v0 ][ -- v1 ][ C v0 ][ D v2 ]
//! gaps:   { 1 }
//! top:    [ A, D ]          (C is a child of A)
//! ```

use std::collections::BTreeSet;

use crate::assets::{MaterialHandle, MeshHandle};
use crate::config::SceneConfig;
use crate::foundation::math::{Mat4, Point3, Quat, Vec3};

use super::{Entity, SceneError, SceneId, SceneRef, SceneResult, Transform};

/// Storage slot for one entity
#[derive(Debug, Default)]
struct Slot {
    /// Bumped every time the occupant is destroyed
    generation: u32,
    entity: Option<Entity>,
}

/// Entity arena with hierarchy bookkeeping
///
/// Every slot index below `capacity()` is either occupied or listed as a gap,
/// except slots whose generation counter ran out, which are retired for good.
#[derive(Debug)]
pub struct Scene {
    id: SceneId,
    config: SceneConfig,
    slots: Vec<Slot>,
    /// Free slot indices, reused lowest first
    gaps: BTreeSet<u32>,
    /// Parent-less live entities in insertion order
    top_level: Vec<SceneRef>,
    live: usize,
}

impl Scene {
    /// Create an empty scene with default configuration
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Create an empty scene with custom configuration
    pub fn with_config(config: SceneConfig) -> Self {
        let id = SceneId::next();
        log::debug!("Creating {} with capacity {}", id, config.initial_capacity);

        Self {
            id,
            slots: Vec::with_capacity(config.initial_capacity),
            gaps: BTreeSet::new(),
            top_level: Vec::new(),
            live: 0,
            config,
        }
    }

    /// Identifier carried by every handle this scene issues
    pub const fn id(&self) -> SceneId {
        self.id
    }

    /// Active configuration
    pub const fn config(&self) -> &SceneConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Spawn an entity, optionally as a child of `parent`
    ///
    /// The entity lands in the lowest free slot, or a new slot at the end.
    /// Raw references into the scene do not survive this call; keep the
    /// returned handle instead.
    ///
    /// # Errors
    ///
    /// [`SceneError::InvalidHandle`] if `parent` is stale and
    /// [`SceneError::ForeignEntity`] if it belongs to another scene. No slot
    /// is consumed in either case.
    ///
    /// # Panics
    ///
    /// If the slot count would exceed `u32::MAX`, or (with strict foreign
    /// checks) when `parent` belongs to another scene.
    pub fn spawn_entity(
        &mut self,
        mesh: MeshHandle,
        material: MaterialHandle,
        parent: Option<SceneRef>,
        transform: Transform,
    ) -> SceneResult<SceneRef> {
        if let Some(parent) = parent {
            self.validate(parent)?;
        }
        Ok(self.insert(mesh, material, parent, transform))
    }

    /// Spawn a top-level entity with an identity transform
    pub fn spawn(&mut self, mesh: MeshHandle, material: MaterialHandle) -> SceneRef {
        self.insert(mesh, material, None, Transform::identity())
    }

    /// Spawn an entity under `parent`
    ///
    /// # Errors
    ///
    /// Same as [`Scene::spawn_entity`].
    pub fn spawn_child(
        &mut self,
        parent: SceneRef,
        mesh: MeshHandle,
        material: MaterialHandle,
        transform: Transform,
    ) -> SceneResult<SceneRef> {
        self.spawn_entity(mesh, material, Some(parent), transform)
    }

    /// Destroy an entity and, before it, all of its descendants
    ///
    /// Returns how many entities were destroyed. Stale handles are ignored and
    /// return 0, so destroying twice is harmless. Handles to entities outside
    /// the destroyed subtree stay valid.
    pub fn destroy_entity(&mut self, handle: SceneRef) -> usize {
        if handle.scene() != self.id {
            self.reject_foreign(handle);
            return 0;
        }
        if self.live(handle).is_none() {
            log::debug!("Ignoring destroy of stale handle {}", handle);
            return 0;
        }

        let destroyed = self.destroy_subtree(handle);
        log::debug!("Destroyed {} entities rooted at {}", destroyed, handle);
        destroyed
    }

    /// Destroy every entity in the scene
    ///
    /// Returns how many entities were destroyed. All outstanding handles
    /// become stale; slots are kept for reuse.
    pub fn clear(&mut self) -> usize {
        let roots = self.top_level.clone();
        let destroyed: usize = roots.into_iter().map(|root| self.destroy_subtree(root)).sum();
        log::debug!("Cleared {}: {} entities destroyed", self.id, destroyed);
        destroyed
    }

    fn destroy_subtree(&mut self, handle: SceneRef) -> usize {
        // Children unlink themselves from this entity as they go, so walk a copy.
        let children = match self.live(handle) {
            Some(entity) => entity.children().to_vec(),
            None => return 0,
        };
        let mut destroyed: usize = children
            .into_iter()
            .map(|child| self.destroy_subtree(child))
            .sum();

        let slot = &mut self.slots[handle.index() as usize];
        let Some(entity) = slot.entity.take() else {
            return destroyed;
        };

        let retired = match slot.generation.checked_add(1) {
            Some(next) => {
                slot.generation = next;
                self.gaps.insert(handle.index());
                false
            }
            None => true,
        };
        if retired {
            log::warn!("Slot {} exhausted its generations and is retired", handle.index());
        }

        match entity.parent() {
            Some(parent) => {
                if let Some(parent_entity) = self.live_mut(parent) {
                    parent_entity.remove_child(handle);
                }
            }
            None => self.unlist_top_level(handle),
        }

        self.live -= 1;
        destroyed += 1;
        destroyed
    }

    /// Place a new entity in a free slot and link it; `parent` must be live
    fn insert(
        &mut self,
        mesh: MeshHandle,
        material: MaterialHandle,
        parent: Option<SceneRef>,
        transform: Transform,
    ) -> SceneRef {
        let index = self.allocate_slot();
        let slot = &mut self.slots[index as usize];
        let handle = SceneRef::new(self.id, index, slot.generation);
        slot.entity = Some(Entity::new(handle, Some(mesh), Some(material), transform, parent));

        match parent {
            Some(parent) => {
                if let Some(parent_entity) = self.live_mut(parent) {
                    parent_entity.push_child(handle);
                }
            }
            None => self.top_level.push(handle),
        }
        self.live += 1;

        log::debug!("Spawned entity {} (parent: {:?})", handle, parent.map(|p| p.index()));
        handle
    }

    fn allocate_slot(&mut self) -> u32 {
        if let Some(index) = self.gaps.pop_first() {
            return index;
        }

        let index = u32::try_from(self.slots.len())
            .unwrap_or_else(|_| panic!("{} exceeded u32::MAX entity slots", self.id));
        self.slots.push(Slot::default());
        index
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Whether `handle` names a live entity of this scene
    ///
    /// Never panics, even for handles from other scenes.
    pub fn contains(&self, handle: SceneRef) -> bool {
        self.live(handle).is_some()
    }

    /// Resolve a handle, `None` if it is stale or out of range
    pub fn resolve(&self, handle: SceneRef) -> Option<&Entity> {
        self.try_resolve(handle).ok()
    }

    /// Resolve a handle for mutation
    pub fn resolve_mut(&mut self, handle: SceneRef) -> Option<&mut Entity> {
        self.try_resolve_mut(handle).ok()
    }

    /// Resolve a handle, reporting why it failed
    ///
    /// # Errors
    ///
    /// [`SceneError::InvalidHandle`] or [`SceneError::ForeignEntity`].
    pub fn try_resolve(&self, handle: SceneRef) -> SceneResult<&Entity> {
        if handle.scene() != self.id {
            return Err(self.reject_foreign(handle));
        }
        self.live(handle).ok_or(SceneError::InvalidHandle(handle))
    }

    /// Mutable variant of [`Scene::try_resolve`]
    ///
    /// # Errors
    ///
    /// [`SceneError::InvalidHandle`] or [`SceneError::ForeignEntity`].
    pub fn try_resolve_mut(&mut self, handle: SceneRef) -> SceneResult<&mut Entity> {
        if handle.scene() != self.id {
            return Err(self.reject_foreign(handle));
        }
        self.live_mut(handle).ok_or(SceneError::InvalidHandle(handle))
    }

    fn live(&self, handle: SceneRef) -> Option<&Entity> {
        if handle.scene() != self.id {
            return None;
        }
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.entity.as_ref())
    }

    fn live_mut(&mut self, handle: SceneRef) -> Option<&mut Entity> {
        if handle.scene() != self.id {
            return None;
        }
        self.slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.entity.as_mut())
    }

    fn validate(&self, handle: SceneRef) -> SceneResult<()> {
        self.try_resolve(handle).map(|_| ())
    }

    fn reject_foreign(&self, handle: SceneRef) -> SceneError {
        if self.config.strict_foreign_checks {
            panic!("entity {} does not belong to {}", handle, self.id);
        }
        log::error!("Entity {} used with {} which does not own it", handle, self.id);
        SceneError::ForeignEntity { handle, scene: self.id }
    }

    // ------------------------------------------------------------------
    // Iteration
    // ------------------------------------------------------------------

    /// All live entities in slot order
    ///
    /// Entities spawned into a reused slot show up at that slot's position,
    /// not at the end.
    pub fn entities(&self) -> impl Iterator<Item = (SceneRef, &Entity)> + '_ {
        self.slots
            .iter()
            .filter_map(|slot| slot.entity.as_ref())
            .map(|entity| (entity.handle(), entity))
    }

    /// Parent-less live entities in insertion order
    pub fn top_level(&self) -> &[SceneRef] {
        &self.top_level
    }

    /// Number of live entities
    pub const fn entity_count(&self) -> usize {
        self.live
    }

    /// Number of parent-less live entities
    pub fn top_level_count(&self) -> usize {
        self.top_level.len()
    }

    /// Whether the scene holds no live entities
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots ever allocated
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots waiting to be reused
    pub fn free_slot_count(&self) -> usize {
        self.gaps.len()
    }

    /// Handles of live entities carrying `tag`, in slot order
    pub fn entities_with_tag(&self, tag: &str) -> Vec<SceneRef> {
        self.entities()
            .filter(|(_, entity)| entity.has_tag(tag))
            .map(|(handle, _)| handle)
            .collect()
    }

    /// Every descendant of `handle` in depth-first pre-order
    ///
    /// Empty for stale handles.
    pub fn descendants(&self, handle: SceneRef) -> Vec<SceneRef> {
        let mut result = Vec::new();
        let mut stack: Vec<SceneRef> = match self.live(handle) {
            Some(entity) => entity.children().iter().rev().copied().collect(),
            None => return result,
        };

        while let Some(current) = stack.pop() {
            if let Some(entity) = self.live(current) {
                result.push(current);
                stack.extend(entity.children().iter().rev().copied());
            }
        }
        result
    }

    // ------------------------------------------------------------------
    // Hierarchy
    // ------------------------------------------------------------------

    /// Attach `child` under `parent`
    ///
    /// The child leaves the top-level list. Attaching a child to the parent
    /// it already has is a no-op.
    ///
    /// # Errors
    ///
    /// - [`SceneError::AlreadyParented`] if the child has a different parent
    /// - [`SceneError::CyclicHierarchy`] if `parent` is `child` or one of its
    ///   descendants
    /// - [`SceneError::InvalidHandle`] / [`SceneError::ForeignEntity`] for bad
    ///   handles
    pub fn add_child(&mut self, parent: SceneRef, child: SceneRef) -> SceneResult<()> {
        self.validate(parent)?;
        let current = self.try_resolve(child)?.parent();

        match current {
            Some(existing) if existing == parent => return Ok(()),
            Some(existing) => {
                log::warn!("Refusing to attach {} under {}: already parented to {}", child, parent, existing);
                return Err(SceneError::AlreadyParented { child, parent: existing });
            }
            None => {}
        }

        if self.is_ancestor_or_self(child, parent) {
            log::warn!("Refusing to attach {} under {}: would create a cycle", child, parent);
            return Err(SceneError::CyclicHierarchy { parent, child });
        }

        self.unlist_top_level(child);
        self.try_resolve_mut(child)?.set_parent(Some(parent));
        self.try_resolve_mut(parent)?.push_child(child);
        Ok(())
    }

    /// Detach `child` from `parent` without destroying it
    ///
    /// The child becomes top-level. Returns `false` and changes nothing if
    /// `child` is not a child of `parent`.
    ///
    /// # Errors
    ///
    /// [`SceneError::InvalidHandle`] / [`SceneError::ForeignEntity`] for bad
    /// handles.
    pub fn remove_child(&mut self, parent: SceneRef, child: SceneRef) -> SceneResult<bool> {
        self.validate(parent)?;
        if self.try_resolve(child)?.parent() != Some(parent) {
            log::debug!("{} is not a child of {}, nothing to detach", child, parent);
            return Ok(false);
        }

        self.try_resolve_mut(parent)?.remove_child(child);
        self.try_resolve_mut(child)?.set_parent(None);
        self.top_level.push(child);
        Ok(true)
    }

    /// Whether `ancestor` is `handle` or one of its ancestors
    fn is_ancestor_or_self(&self, ancestor: SceneRef, handle: SceneRef) -> bool {
        let mut current = Some(handle);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.live(node).and_then(Entity::parent);
        }
        false
    }

    fn unlist_top_level(&mut self, handle: SceneRef) {
        if let Some(position) = self.top_level.iter().position(|r| *r == handle) {
            self.top_level.remove(position);
        }
    }

    // ------------------------------------------------------------------
    // Tags
    // ------------------------------------------------------------------

    /// Add a tag to an entity
    ///
    /// # Errors
    ///
    /// [`SceneError::InvalidHandle`] / [`SceneError::ForeignEntity`].
    pub fn add_tag(&mut self, handle: SceneRef, tag: impl Into<String>) -> SceneResult<()> {
        self.try_resolve_mut(handle)?.tags_mut().add(tag);
        Ok(())
    }

    /// Remove one occurrence of a tag from an entity
    ///
    /// # Errors
    ///
    /// [`SceneError::InvalidHandle`] / [`SceneError::ForeignEntity`].
    pub fn remove_tag(&mut self, handle: SceneRef, tag: &str) -> SceneResult<bool> {
        Ok(self.try_resolve_mut(handle)?.tags_mut().remove(tag))
    }

    /// Whether a live entity carries `tag`; `false` for stale handles
    pub fn has_tag(&self, handle: SceneRef, tag: &str) -> bool {
        self.resolve(handle).is_some_and(|entity| entity.has_tag(tag))
    }

    // ------------------------------------------------------------------
    // Transforms
    // ------------------------------------------------------------------

    /// World matrix of an entity
    ///
    /// Composes the local matrices of the entity and all of its ancestors,
    /// parents applied outermost. Recomputed on every call.
    pub fn world_matrix(&self, handle: SceneRef) -> Option<Mat4> {
        let entity = self.resolve(handle)?;
        let mut matrix = entity.transform().to_matrix();

        let mut parent = entity.parent();
        while let Some(ancestor) = parent {
            let ancestor_entity = self.live(ancestor)?;
            matrix = ancestor_entity.transform().to_matrix() * matrix;
            parent = ancestor_entity.parent();
        }
        Some(matrix)
    }

    /// World-space position of an entity
    pub fn world_position(&self, handle: SceneRef) -> Option<Vec3> {
        self.world_matrix(handle)
            .map(|m| m.transform_point(&Point3::origin()).coords)
    }

    /// Move an entity so its world-space position becomes `position`
    ///
    /// # Errors
    ///
    /// [`SceneError::DegenerateTransform`] if the parent's world matrix cannot
    /// be inverted, plus the usual handle errors.
    pub fn set_world_position(&mut self, handle: SceneRef, position: Vec3) -> SceneResult<()> {
        let local = match self.try_resolve(handle)?.parent() {
            None => position,
            Some(parent) => {
                let parent_world = self
                    .world_matrix(parent)
                    .ok_or(SceneError::InvalidHandle(parent))?;
                let inverse = parent_world
                    .try_inverse()
                    .ok_or(SceneError::DegenerateTransform(handle))?;
                inverse.transform_point(&Point3::from(position)).coords
            }
        };

        self.try_resolve_mut(handle)?.transform_mut().position = local;
        Ok(())
    }

    /// World-space rotation of an entity
    ///
    /// Composes the rotations of the entity and its ancestors. Scale is not
    /// taken into account, so under non-uniformly scaled parents this is the
    /// rotation part only.
    pub fn world_rotation(&self, handle: SceneRef) -> Option<Quat> {
        let entity = self.resolve(handle)?;
        let mut rotation = entity.transform().rotation;

        let mut parent = entity.parent();
        while let Some(ancestor) = parent {
            let ancestor_entity = self.live(ancestor)?;
            rotation = ancestor_entity.transform().rotation * rotation;
            parent = ancestor_entity.parent();
        }
        Some(rotation)
    }

    /// Rotate an entity so its world-space rotation becomes `rotation`
    ///
    /// # Errors
    ///
    /// [`SceneError::InvalidHandle`] / [`SceneError::ForeignEntity`].
    pub fn set_world_rotation(&mut self, handle: SceneRef, rotation: Quat) -> SceneResult<()> {
        let local = match self.try_resolve(handle)?.parent() {
            None => rotation,
            Some(parent) => {
                let parent_rotation = self
                    .world_rotation(parent)
                    .ok_or(SceneError::InvalidHandle(parent))?;
                parent_rotation.inverse() * rotation
            }
        };

        self.try_resolve_mut(handle)?.transform_mut().rotation = local;
        Ok(())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
