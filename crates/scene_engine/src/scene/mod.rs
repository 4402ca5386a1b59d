//! Scene management system
//!
//! Entity storage and hierarchy for the renderer and gameplay code.
//!
//! ## Architecture
//!
//! ```text
//! Gameplay / AI / Input ──spawn, destroy, tags──┐
//!                                               ↓
//!                                     Scene (entity arena)
//!                                               ↓
//! Renderer ◀──────── RenderList (handles + world matrices)
//! ```
//!
//! The Scene:
//! - Owns every entity by value and hands out generational [`SceneRef`]s
//! - Keeps parent/child links consistent and cascades destroys down the tree
//! - Composes world matrices on demand from local transforms
//! - Tracks the top-level entities for scene-root iteration

mod arena;
mod entity;
mod error;
mod handle;
mod render_list;
mod tags;
mod transform;

#[cfg(test)]
mod tests;

pub use arena::Scene;
pub use entity::Entity;
pub use error::{SceneError, SceneResult};
pub use handle::{SceneId, SceneRef};
pub use render_list::{RenderBatch, RenderItem, RenderList};
pub use tags::TagSet;
pub use transform::Transform;
