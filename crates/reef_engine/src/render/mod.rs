//! Rendering seam
//!
//! The engine computes world matrices and hands them, along with the node's
//! resource handles and shading inputs, to a [`DrawBackend`]. The actual
//! graphics API (buffers, shaders, view/projection plumbing) lives entirely
//! behind this trait.

use crate::foundation::math::{Mat4, Vec3};
use crate::scene::SceneNode;

/// Backend consuming the per-frame draw stream
///
/// Calls arrive in strict parent-before-child order within each object's
/// subtree; backends may rely on that ordering.
pub trait DrawBackend {
    /// Clear the frame to the background color
    fn clear(&mut self, color: Vec3);

    /// Draw one node with its resolved world transform
    fn draw_node(&mut self, node: &SceneNode, world: &Mat4, light_position: Vec3);
}

/// Backend that discards all draw calls (headless simulation)
#[derive(Debug, Default)]
pub struct NullBackend;

impl DrawBackend for NullBackend {
    fn clear(&mut self, _color: Vec3) {}

    fn draw_node(&mut self, _node: &SceneNode, _world: &Mat4, _light_position: Vec3) {}
}

/// One recorded draw call
#[derive(Debug, Clone)]
pub struct DrawRecord {
    /// Name of the drawn node
    pub name: String,
    /// World matrix the node was drawn with
    pub world: Mat4,
}

/// Backend that records the draw stream, used to test draw ordering
#[derive(Debug, Default)]
pub struct RecordingBackend {
    /// Recorded draws in call order
    pub draws: Vec<DrawRecord>,
    /// Last clear color, if any
    pub cleared_to: Option<Vec3>,
}

impl DrawBackend for RecordingBackend {
    fn clear(&mut self, color: Vec3) {
        self.cleared_to = Some(color);
        self.draws.clear();
    }

    fn draw_node(&mut self, node: &SceneNode, world: &Mat4, _light_position: Vec3) {
        self.draws.push(DrawRecord {
            name: node.name().to_string(),
            world: *world,
        });
    }
}
