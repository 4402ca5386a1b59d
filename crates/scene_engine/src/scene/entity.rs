//! Scene entity
//!
//! An entity is a node in the scene tree: a local [`Transform`], an optional
//! mesh/material payload, a tag set and its parent/child links. Entities only
//! exist inside a [`Scene`](super::Scene) slot; hierarchy links are changed
//! exclusively through the scene so both directions stay consistent.

use crate::assets::{MaterialHandle, MeshHandle};

use super::{SceneRef, TagSet, Transform};

/// Entity stored in a scene slot
///
/// Entities are only ever borrowed out of their scene; there is no way to
/// copy one out:
///
/// ```compile_fail
/// fn needs_clone<T: Clone>() {}
/// needs_clone::<scene_engine::scene::Entity>();
/// ```
#[derive(Debug)]
pub struct Entity {
    handle: SceneRef,
    transform: Transform,
    mesh: Option<MeshHandle>,
    material: Option<MaterialHandle>,
    tags: TagSet,
    parent: Option<SceneRef>,
    children: Vec<SceneRef>,
}

impl Entity {
    pub(crate) fn new(
        handle: SceneRef,
        mesh: Option<MeshHandle>,
        material: Option<MaterialHandle>,
        transform: Transform,
        parent: Option<SceneRef>,
    ) -> Self {
        Self {
            handle,
            transform,
            mesh,
            material,
            tags: TagSet::new(),
            parent,
            children: Vec::new(),
        }
    }

    /// Handle naming this entity; also identifies the owning scene
    pub const fn handle(&self) -> SceneRef {
        self.handle
    }

    /// Local transform
    pub const fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Mutable local transform
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Mesh rendered for this entity
    pub const fn mesh(&self) -> Option<MeshHandle> {
        self.mesh
    }

    /// Material rendered for this entity
    pub const fn material(&self) -> Option<MaterialHandle> {
        self.material
    }

    /// Replace the mesh reference
    pub fn set_mesh(&mut self, mesh: Option<MeshHandle>) {
        self.mesh = mesh;
    }

    /// Replace the material reference
    pub fn set_material(&mut self, material: Option<MaterialHandle>) {
        self.material = material;
    }

    /// Tags attached to this entity
    pub const fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// Mutable tags
    pub fn tags_mut(&mut self) -> &mut TagSet {
        &mut self.tags
    }

    /// Convenience for `tags().contains(tag)`
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Parent entity, `None` for top-level entities
    pub const fn parent(&self) -> Option<SceneRef> {
        self.parent
    }

    /// Owned children in attach order
    pub fn children(&self) -> &[SceneRef] {
        &self.children
    }

    /// Whether the entity has no parent
    pub const fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }

    pub(crate) fn set_parent(&mut self, parent: Option<SceneRef>) {
        self.parent = parent;
    }

    pub(crate) fn push_child(&mut self, child: SceneRef) {
        self.children.push(child);
    }

    /// Unlink a child, keeping the order of the remaining children
    pub(crate) fn remove_child(&mut self, child: SceneRef) -> bool {
        match self.children.iter().position(|c| *c == child) {
            Some(index) => {
                self.children.remove(index);
                true
            }
            None => false,
        }
    }
}
