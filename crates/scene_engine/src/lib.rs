//! # Scene Engine
//!
//! Scene entity storage for a small forward renderer: an arena of entities with
//! generational handles, a parent/child ownership tree with cascading destroy,
//! and a per-entity tag set.
//!
//! ## Features
//!
//! - **Entity Arena**: Compacting slot storage that reuses the lowest free slot
//! - **Generational Handles**: [`SceneRef`](scene::SceneRef) values that go stale
//!   instead of aliasing a later occupant of the same slot
//! - **Hierarchy**: Cascading destroy, reparenting, world-matrix composition
//! - **Tags**: Per-entity string labels
//! - **Render Extraction**: Per-frame draw list batched by material
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_engine::prelude::*;
//!
//! let mut meshes = AssetStore::new();
//! let mut materials = AssetStore::new();
//! let cube = meshes.insert(Mesh::new("cube", "Assets/Models/cube.obj"));
//! let stone = materials.insert(Material::new("stone"));
//!
//! let mut scene = Scene::new();
//! let root = scene.spawn(cube, stone);
//! let child = scene
//!     .spawn_child(root, cube, stone, Transform::from_position(Vec3::new(0.0, 2.0, 0.0)))
//!     .unwrap();
//!
//! assert_eq!(scene.entity_count(), 2);
//! assert_eq!(scene.destroy_entity(root), 2);
//! assert!(scene.resolve(child).is_none());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod assets;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetStore, Material, MaterialHandle, Mesh, MeshHandle},
        config::{Config, ConfigError, EngineConfig, LogConfig, SceneConfig},
        foundation::math::{Mat4, Quat, Vec3},
        scene::{
            Entity, RenderBatch, RenderItem, RenderList, Scene, SceneError, SceneId,
            SceneRef, TagSet, Transform,
        },
    };
}
