//! Asset references consumed by the scene
//!
//! Meshes and materials are loaded and owned by the asset system. The scene
//! only stores the typed handles handed out here and never frees the assets
//! behind them.

use crate::foundation::collections::{HandleMap, TypedHandle};

/// Mesh descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mesh {
    /// Display name
    pub name: String,
    /// File the geometry was loaded from
    pub source: String,
}

impl Mesh {
    /// Create a mesh descriptor
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Material descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Display name
    pub name: String,
    /// Base color (RGBA)
    pub base_color: [f32; 4],
}

impl Material {
    /// Create a white material
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    /// Builder pattern: Set base color
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.base_color = [r, g, b, 1.0];
        self
    }
}

/// Handle to a mesh owned by an [`AssetStore`]
pub type MeshHandle = TypedHandle<Mesh>;

/// Handle to a material owned by an [`AssetStore`]
pub type MaterialHandle = TypedHandle<Material>;

/// Slot-map backed asset registry
#[derive(Debug)]
pub struct AssetStore<T> {
    assets: HandleMap<T>,
}

impl<T> AssetStore<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            assets: HandleMap::new(),
        }
    }

    /// Register an asset and return its handle
    pub fn insert(&mut self, asset: T) -> TypedHandle<T> {
        TypedHandle::new(self.assets.insert(asset))
    }

    /// Look up an asset
    pub fn get(&self, handle: TypedHandle<T>) -> Option<&T> {
        self.assets.get(handle.key())
    }

    /// Unregister an asset
    ///
    /// Entities that still reference it keep the (now dangling) handle;
    /// lookups through it return `None`.
    pub fn remove(&mut self, handle: TypedHandle<T>) -> Option<T> {
        self.assets.remove(handle.key())
    }

    /// Number of registered assets
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl<T> Default for AssetStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
