//! Resource catalog
//!
//! The engine never loads geometry, shader, or texture files itself; the
//! external loader registers opaque handles under names and builders look
//! them up at construction time. A missing name is fatal for the object
//! under construction and propagates up to scene setup.

use std::collections::HashMap;

use crate::error::SceneError;

/// Opaque identifier handed out by the external graphics/resource loader
pub type ResourceId = u32;

/// What a catalog entry refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Vertex/index buffers for a mesh
    Geometry,
    /// A compiled shader program
    Material,
    /// A texture image on the GPU
    Texture,
}

impl ResourceKind {
    fn label(self) -> &'static str {
        match self {
            Self::Geometry => "geometry",
            Self::Material => "material",
            Self::Texture => "texture",
        }
    }
}

/// A named, typed resource reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceHandle {
    /// Backend identifier for the resource
    pub id: ResourceId,
    /// What the identifier refers to
    pub kind: ResourceKind,
}

/// Name-to-handle registry for externally loaded resources
#[derive(Debug, Default)]
pub struct ResourceCatalog {
    entries: HashMap<String, ResourceHandle>,
    next_id: ResourceId,
}

impl ResourceCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource under a name, minting a fresh id
    ///
    /// Re-registering a name replaces the previous entry, matching loader
    /// behavior where the last load wins.
    pub fn register(&mut self, name: impl Into<String>, kind: ResourceKind) -> ResourceHandle {
        let handle = ResourceHandle {
            id: self.next_id,
            kind,
        };
        self.next_id += 1;
        self.entries.insert(name.into(), handle);
        handle
    }

    /// Look up a resource of a specific kind by name
    pub fn get(&self, name: &str, kind: ResourceKind) -> Result<ResourceHandle, SceneError> {
        let handle = self
            .entries
            .get(name)
            .copied()
            .ok_or_else(|| SceneError::MissingResource(name.to_string()))?;
        if handle.kind != kind {
            return Err(SceneError::WrongResourceKind {
                name: name.to_string(),
                expected: kind.label(),
            });
        }
        Ok(handle)
    }

    /// Look up geometry by name
    pub fn geometry(&self, name: &str) -> Result<ResourceHandle, SceneError> {
        self.get(name, ResourceKind::Geometry)
    }

    /// Look up a material by name
    pub fn material(&self, name: &str) -> Result<ResourceHandle, SceneError> {
        self.get(name, ResourceKind::Material)
    }

    /// Look up a texture by name
    pub fn texture(&self, name: &str) -> Result<ResourceHandle, SceneError> {
        self.get(name, ResourceKind::Texture)
    }

    /// Number of registered resources
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
