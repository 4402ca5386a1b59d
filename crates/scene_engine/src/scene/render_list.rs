//! Render list for batched rendering
//!
//! Per-frame snapshot of what the renderer needs from the scene: one item per
//! drawable entity with its resolved world matrix, grouped by material to
//! minimise state changes. The list carries handles, never entity addresses,
//! and is meant to be rebuilt every frame.

use crate::assets::{MaterialHandle, MeshHandle};
use crate::foundation::math::Mat4;

use super::{Scene, SceneRef};

/// Drawable entity resolved for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    /// Entity this item was extracted from
    pub entity: SceneRef,
    /// Mesh to draw
    pub mesh: MeshHandle,
    /// Material to bind
    pub material: MaterialHandle,
    /// World matrix composed through the parent chain
    pub world: Mat4,
}

/// A batch of items sharing the same material
#[derive(Debug, Clone)]
pub struct RenderBatch {
    /// Material used by all items in this batch
    pub material: MaterialHandle,

    /// Items in this batch, in scene slot order
    pub items: Vec<RenderItem>,
}

impl RenderBatch {
    /// Create a new empty batch for a material
    pub const fn new(material: MaterialHandle) -> Self {
        Self {
            material,
            items: Vec::new(),
        }
    }

    /// Get the number of items in this batch
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

/// Material-batched draw list for a frame
#[derive(Debug, Clone, Default)]
pub struct RenderList {
    batches: Vec<RenderBatch>,
}

impl RenderList {
    /// Extract every live entity that has both a mesh and a material
    ///
    /// Batches appear in the order their material is first seen while walking
    /// the scene in slot order.
    pub fn extract(scene: &Scene) -> Self {
        let mut batches: Vec<RenderBatch> = Vec::new();

        for (handle, entity) in scene.entities() {
            let (Some(mesh), Some(material)) = (entity.mesh(), entity.material()) else {
                continue;
            };
            let Some(world) = scene.world_matrix(handle) else {
                log::warn!("Skipping {}: world matrix could not be resolved", handle);
                continue;
            };

            let item = RenderItem { entity: handle, mesh, material, world };
            match batches.iter_mut().find(|batch| batch.material == material) {
                Some(batch) => batch.items.push(item),
                None => {
                    let mut batch = RenderBatch::new(material);
                    batch.items.push(item);
                    batches.push(batch);
                }
            }
        }

        log::trace!("Extracted {} render batches", batches.len());
        Self { batches }
    }

    /// Batches in first-seen material order
    pub fn batches(&self) -> &[RenderBatch] {
        &self.batches
    }

    /// Iterate over every item across batches
    pub fn items(&self) -> impl Iterator<Item = &RenderItem> {
        self.batches.iter().flat_map(|batch| batch.items.iter())
    }

    /// Get total number of items
    pub fn item_count(&self) -> usize {
        self.batches.iter().map(RenderBatch::item_count).sum()
    }

    /// Get total number of batches
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }
}
