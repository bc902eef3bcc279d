//! Scene node: the positionable, rotatable leaf of the transform hierarchy
//!
//! Every node carries two independent rotations: its own spin
//! (`orientation`) and an accumulating `orbit` matrix applied around a pivot
//! point. Orbit sits between translation and spin in the world transform, so
//! swaying a plant around its base never disturbs the leaf's own rotation.
//!
//! The pivot is stored in *local* space and the world pivot is derived on
//! demand from the node's current position, orientation, and scale. This
//! makes pivot placement independent of the order in which position, scale,
//! and pivot are set during construction.

use crate::assets::ResourceHandle;
use crate::foundation::math::{Mat4, Quat, Vec3};

slotmap::new_key_type! {
    /// Key into a [`GameObject`](crate::scene::GameObject) node arena
    pub struct NodeKey;
}

/// Semantic part tag, consumed by the shading backend
///
/// Lets one material shade stems and leaves differently without separate
/// shader programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartTag {
    /// Cylindrical structural part (trunk, branch, chimney)
    Stem,
    /// Flat or ellipsoid foliage part
    Leaf,
    /// Particle-emitting part
    Particle,
    /// Anything else (hulls, rocks, windows)
    #[default]
    Body,
}

/// Per-node collision flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionState {
    /// The node takes no part in collision
    #[default]
    None,
    /// The node can still be interacted with
    Collidable,
    /// The node has been collided with and is out of play
    Consumed,
}

/// One object in the transform hierarchy
#[derive(Debug, Clone)]
pub struct SceneNode {
    name: String,
    geometry: ResourceHandle,
    material: ResourceHandle,
    texture: Option<ResourceHandle>,
    tag: PartTag,

    position: Vec3,
    orientation: Quat,
    scale: Vec3,
    /// Pivot for orbit rotations, in local/object space
    pivot: Vec3,
    /// Accumulated orbit rotation; never reset, compounds over time
    orbit: Mat4,
    /// Refreshed by the drawing parent every frame
    parent_transform: Mat4,

    children: Vec<NodeKey>,
    collision: CollisionState,
    radius: f32,
}

impl SceneNode {
    /// Create a node from already-resolved resource handles
    pub fn new(
        name: impl Into<String>,
        geometry: ResourceHandle,
        material: ResourceHandle,
        texture: Option<ResourceHandle>,
        collision: CollisionState,
    ) -> Self {
        Self {
            name: name.into(),
            geometry,
            material,
            texture,
            tag: PartTag::default(),
            position: Vec3::zeros(),
            orientation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            pivot: Vec3::zeros(),
            orbit: Mat4::identity(),
            parent_transform: Mat4::identity(),
            children: Vec::new(),
            collision,
            radius: 1.0,
        }
    }

    /// Node name (not guaranteed unique within an object)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Geometry handle bound at draw time
    pub fn geometry(&self) -> ResourceHandle {
        self.geometry
    }

    /// Material handle bound at draw time
    pub fn material(&self) -> ResourceHandle {
        self.material
    }

    /// Optional texture handle
    pub fn texture(&self) -> Option<ResourceHandle> {
        self.texture
    }

    /// Swap the geometry (used to change models on the fly)
    pub fn set_geometry(&mut self, geometry: ResourceHandle) {
        self.geometry = geometry;
    }

    /// Semantic part tag
    pub fn tag(&self) -> PartTag {
        self.tag
    }

    /// Set the semantic part tag
    pub fn set_tag(&mut self, tag: PartTag) {
        self.tag = tag;
    }

    /// Local position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Intrinsic spin orientation (always unit length)
    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Accumulated component-wise scale
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Pivot in local space
    pub fn pivot(&self) -> Vec3 {
        self.pivot
    }

    /// Pivot as a world-space point, derived from the current placement
    pub fn world_pivot(&self) -> Vec3 {
        self.position + self.orientation * self.scale.component_mul(&self.pivot)
    }

    /// Collision flag
    pub fn collision(&self) -> CollisionState {
        self.collision
    }

    /// Set the collision flag
    pub fn set_collision(&mut self, state: CollisionState) {
        self.collision = state;
    }

    /// Collision sphere radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Set the collision sphere radius
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
    }

    /// Move the node to an absolute local position
    ///
    /// The pivot is local, so it follows rigidly.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Replace the intrinsic orientation
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.orientation = orientation;
    }

    /// Replace the scale
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    /// Set the orbit pivot, specified in local/object space
    pub fn set_pivot(&mut self, pivot: Vec3) {
        self.pivot = pivot;
    }

    /// Translate by a local-space delta
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Compose a rotation into the intrinsic orientation
    ///
    /// The result is renormalized so the orientation stays unit length under
    /// long rotation chains.
    pub fn rotate(&mut self, rotation: Quat) {
        self.orientation =
            Quat::new_normalize(self.orientation.into_inner() * rotation.into_inner());
    }

    /// Multiply into the accumulated scale
    pub fn scale_by(&mut self, factor: Vec3) {
        self.scale = self.scale.component_mul(&factor);
    }

    /// Accumulate a rotation around the pivot into the orbit matrix
    ///
    /// The orbit accumulator is never reset; calling repeatedly compounds
    /// rotation around the pivot over time, which is the primitive used for
    /// continuous swaying of plants. The intrinsic orientation is untouched.
    pub fn orbit(&mut self, rotation: Quat) {
        let to_pivot = self.world_pivot() - self.position;
        let step = Mat4::new_translation(&to_pivot)
            * rotation.to_homogeneous()
            * Mat4::new_translation(&-to_pivot);
        self.orbit *= step;
    }

    /// Accumulated orbit matrix
    pub fn orbit_matrix(&self) -> Mat4 {
        self.orbit
    }

    /// Append a child key; ownership stays with the object's arena
    pub fn add_child(&mut self, child: NodeKey) {
        self.children.push(child);
    }

    /// Ordered child keys
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Set the transform inherited from the drawing parent
    pub fn set_parent_transform(&mut self, transform: Mat4) {
        self.parent_transform = transform;
    }

    /// Transform inherited from the drawing parent
    pub fn parent_transform(&self) -> Mat4 {
        self.parent_transform
    }

    /// Local transform: `translate(position) * orbit * rotate(orientation) * scale`
    ///
    /// Orbit sits between translation and spin so accumulated orbiting does
    /// not disturb the node's own rotation.
    pub fn local_transform(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.orbit
            * self.orientation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// World transform for rendering: `parent_transform * local_transform()`
    pub fn world_transform(&self) -> Mat4 {
        self.parent_transform * self.local_transform()
    }

    /// Per-frame behavior hook; a plain node does nothing
    ///
    /// Specialized nodes (particle emitters) override behavior at the object
    /// level instead of subclassing.
    pub fn update(&mut self, _dt: f32) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{ResourceHandle, ResourceKind};
    use crate::foundation::math::{angle_axis, constants::HALF_PI, Vec4};
    use approx::assert_relative_eq;

    fn handle(id: u32, kind: ResourceKind) -> ResourceHandle {
        ResourceHandle { id, kind }
    }

    fn test_node() -> SceneNode {
        SceneNode::new(
            "Test",
            handle(0, ResourceKind::Geometry),
            handle(1, ResourceKind::Material),
            None,
            CollisionState::None,
        )
    }

    #[test]
    fn test_pivot_moves_rigidly_with_position() {
        let mut node = test_node();
        node.set_pivot(Vec3::new(0.0, -1.0, 0.0));
        let offset_before = node.world_pivot() - node.position();

        node.set_position(Vec3::new(4.0, 7.0, -2.0));
        let offset_after = node.world_pivot() - node.position();

        assert_relative_eq!(offset_before, offset_after, epsilon = 1e-6);
    }

    #[test]
    fn test_orientation_stays_unit_after_rotation_chain() {
        let mut node = test_node();
        for i in 0..64 {
            node.rotate(angle_axis(0.37 + i as f32 * 0.01, Vec3::new(1.0, 2.0, -0.5)));
        }
        assert_relative_eq!(node.orientation().into_inner().norm(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_orbit_accumulator_is_associative() {
        let q1 = angle_axis(0.3, Vec3::new(1.0, 0.0, 0.0));
        let q2 = angle_axis(0.8, Vec3::new(0.0, 0.0, 1.0));

        let mut sequential = test_node();
        sequential.set_pivot(Vec3::new(0.0, -1.0, 0.0));
        sequential.orbit(q1);
        sequential.orbit(q2);

        // A single accumulation of the two per-call matrices must match
        let mut reference = test_node();
        reference.set_pivot(Vec3::new(0.0, -1.0, 0.0));
        let to_pivot = reference.world_pivot() - reference.position();
        let step = |q: Quat| {
            Mat4::new_translation(&to_pivot) * q.to_homogeneous() * Mat4::new_translation(&-to_pivot)
        };
        let combined = step(q1) * step(q2);

        assert_relative_eq!(sequential.orbit_matrix(), combined, epsilon = 1e-5);
    }

    #[test]
    fn test_orbit_leaves_orientation_untouched() {
        let mut node = test_node();
        node.set_pivot(Vec3::new(0.0, -2.0, 0.0));
        node.orbit(angle_axis(1.2, Vec3::new(0.0, 1.0, 0.0)));
        assert_relative_eq!(node.orientation(), Quat::identity(), epsilon = 1e-6);
    }

    #[test]
    fn test_world_pivot_respects_scale_and_orientation() {
        let mut node = test_node();
        node.set_position(Vec3::new(1.0, 0.0, 0.0));
        node.set_scale(Vec3::new(2.0, 2.0, 2.0));
        node.set_pivot(Vec3::new(0.0, -1.0, 0.0));
        // Pivot is scaled then rotated into world space
        assert_relative_eq!(node.world_pivot(), Vec3::new(1.0, -2.0, 0.0), epsilon = 1e-6);

        // Setting pivot before or after scale makes no difference
        let mut other = test_node();
        other.set_position(Vec3::new(1.0, 0.0, 0.0));
        other.set_pivot(Vec3::new(0.0, -1.0, 0.0));
        other.set_scale(Vec3::new(2.0, 2.0, 2.0));
        assert_relative_eq!(other.world_pivot(), node.world_pivot(), epsilon = 1e-6);
    }

    #[test]
    fn test_world_transform_composition_order() {
        let mut node = test_node();
        node.set_position(Vec3::new(0.0, 2.0, 0.0));
        node.rotate(angle_axis(HALF_PI, Vec3::new(0.0, 1.0, 0.0)));
        node.set_parent_transform(Mat4::new_translation(&Vec3::new(10.0, 0.0, 0.0)));

        // Origin of the node ends up at parent translation + own position
        let origin = node.world_transform() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(origin.x, 10.0, epsilon = 1e-5);
        assert_relative_eq!(origin.y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(origin.z, 0.0, epsilon = 1e-5);
    }
}
