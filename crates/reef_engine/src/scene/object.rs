//! Composite game object: a named, typed aggregate of scene nodes
//!
//! All nodes of one logical entity live in a single slotmap arena owned by
//! the object; hierarchy (child lists) and hitboxes hold non-owning keys into
//! that arena. A node reachable both through the root's child chain and
//! through the insert list is drawn exactly once and freed exactly once.

use std::collections::HashSet;

use crate::error::SceneError;
use crate::foundation::math::{Quat, Vec3};
use crate::render::DrawBackend;
use crate::scene::node::{CollisionState, NodeKey, SceneNode};
use slotmap::SlotMap;

/// Closed set of game entity kinds
///
/// Drives behavior dispatch in the animator and the collision system; both
/// match exhaustively so adding a kind forces every behavior site to decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectKind {
    /// No special behavior (terrain planes, the sun)
    #[default]
    None,
    /// Swaying kelp bush
    Kelp,
    /// Branching coral
    Coral,
    /// Spiked rock column; its spikes hurt on contact
    Stalagmite,
    /// The wrecked submarine
    Submarine,
    /// Collectible machine part
    Part,
    /// Sea anemone
    Anemone,
    /// Swaying seaweed stalk
    Seaweed,
    /// Inert rock
    Rock,
    /// Particle emitter aggregate
    ParticleSystem,
    /// Hydrothermal vent chimney
    VentBase,
    /// Hydrothermal vent stream; hurts while overlapped
    Vent,
}

/// A named aggregate of scene nodes forming one logical game entity
#[derive(Debug)]
pub struct GameObject {
    name: String,
    kind: ObjectKind,
    nodes: SlotMap<NodeKey, SceneNode>,
    /// Keys in insertion order, for index lookup and the extras draw pass
    insert_order: Vec<NodeKey>,
    root: Option<NodeKey>,
    hitboxes: Vec<NodeKey>,
}

impl GameObject {
    /// Create an empty object of the given kind
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nodes: SlotMap::with_key(),
            insert_order: Vec::new(),
            root: None,
            hitboxes: Vec::new(),
        }
    }

    /// Object name; lookups in the registry return the first match
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entity kind
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Move a node into the arena
    ///
    /// This does not establish hierarchy; use [`GameObject::link_child`] to
    /// parent one arena node under another.
    pub fn add_node(&mut self, node: SceneNode) -> NodeKey {
        let key = self.nodes.insert(node);
        self.insert_order.push(key);
        key
    }

    /// Designate the anchor node for whole-object transforms
    ///
    /// Must be called before any transform delegation.
    pub fn set_root(&mut self, key: NodeKey) {
        self.root = Some(key);
    }

    /// Key of the root node, if set
    pub fn root_key(&self) -> Option<NodeKey> {
        self.root
    }

    /// Parent one node under another within the arena
    pub fn link_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), SceneError> {
        if !self.nodes.contains_key(child) {
            return Err(SceneError::StaleNode(self.name.clone()));
        }
        let parent_node = self
            .nodes
            .get_mut(parent)
            .ok_or_else(|| SceneError::StaleNode(self.name.clone()))?;
        parent_node.add_child(child);
        Ok(())
    }

    /// Register a node as a secondary collision volume offset from the root
    pub fn add_hitbox(&mut self, key: NodeKey) {
        self.hitboxes.push(key);
    }

    /// Hitbox keys
    pub fn hitboxes(&self) -> &[NodeKey] {
        &self.hitboxes
    }

    /// Borrow a node by key
    pub fn node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    /// Mutably borrow a node by key
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut SceneNode> {
        self.nodes.get_mut(key)
    }

    /// Find the first node with the given name
    pub fn find(&self, name: &str) -> Option<NodeKey> {
        self.insert_order
            .iter()
            .copied()
            .find(|&key| self.nodes.get(key).is_some_and(|n| n.name() == name))
    }

    /// Node key by insertion index
    pub fn node_at(&self, index: usize) -> Option<NodeKey> {
        self.insert_order.get(index).copied()
    }

    /// Number of nodes in the arena
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Borrow the root node
    pub fn root(&self) -> Result<&SceneNode, SceneError> {
        self.root
            .and_then(|key| self.nodes.get(key))
            .ok_or_else(|| SceneError::MissingRoot(self.name.clone()))
    }

    /// Mutably borrow the root node
    pub fn root_mut(&mut self) -> Result<&mut SceneNode, SceneError> {
        let key = self
            .root
            .ok_or_else(|| SceneError::MissingRoot(self.name.clone()))?;
        self.nodes
            .get_mut(key)
            .ok_or_else(|| SceneError::MissingRoot(self.name.clone()))
    }

    /// World position of the root (top-level objects carry world coordinates)
    pub fn root_position(&self) -> Result<Vec3, SceneError> {
        Ok(self.root()?.position())
    }

    /// Whether the root has been collided out of play
    ///
    /// The registry sweep removes consumed objects every frame.
    pub fn is_consumed(&self) -> bool {
        self.root
            .and_then(|key| self.nodes.get(key))
            .is_some_and(|n| n.collision() == CollisionState::Consumed)
    }

    /// Translate the whole object via its root
    pub fn translate(&mut self, delta: Vec3) -> Result<(), SceneError> {
        self.root_mut()?.translate(delta);
        Ok(())
    }

    /// Position the whole object via its root
    pub fn set_position(&mut self, position: Vec3) -> Result<(), SceneError> {
        self.root_mut()?.set_position(position);
        Ok(())
    }

    /// Rotate the whole object via its root
    pub fn rotate(&mut self, rotation: Quat) -> Result<(), SceneError> {
        self.root_mut()?.rotate(rotation);
        Ok(())
    }

    /// Orbit the whole object around the root's pivot
    pub fn orbit(&mut self, rotation: Quat) -> Result<(), SceneError> {
        self.root_mut()?.orbit(rotation);
        Ok(())
    }

    /// Scale the whole object via its root
    pub fn scale_by(&mut self, factor: Vec3) -> Result<(), SceneError> {
        self.root_mut()?.scale_by(factor);
        Ok(())
    }

    /// Run the per-node behavior hook over every node
    pub fn update(&mut self, dt: f32) {
        for key in &self.insert_order {
            if let Some(node) = self.nodes.get_mut(*key) {
                node.update(dt);
            }
        }
    }

    /// Draw the object: root subtree depth-first, then un-parented extras
    ///
    /// Each parent's world transform is pushed into its children before the
    /// children are drawn, so the whole subtree inherits this frame's
    /// transform. Nodes reachable from the root are excluded from the extras
    /// pass, so nothing is drawn twice.
    pub fn draw(&mut self, backend: &mut dyn DrawBackend, light_position: Vec3) {
        let mut visited = HashSet::new();
        if let Some(root) = self.root {
            self.draw_subtree(root, backend, light_position, &mut visited);
        }
        // Entities may intentionally keep some parts un-parented
        // (independently orbiting side windows and the like)
        let extras: Vec<NodeKey> = self
            .insert_order
            .iter()
            .copied()
            .filter(|key| !visited.contains(key))
            .collect();
        for key in extras {
            self.draw_subtree(key, backend, light_position, &mut visited);
        }
    }

    fn draw_subtree(
        &mut self,
        key: NodeKey,
        backend: &mut dyn DrawBackend,
        light_position: Vec3,
        visited: &mut HashSet<NodeKey>,
    ) {
        if !visited.insert(key) {
            return;
        }
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        let world = node.world_transform();
        let children: Vec<NodeKey> = node.children().to_vec();

        // Children must see this frame's transform before they are drawn
        for &child in &children {
            if let Some(child_node) = self.nodes.get_mut(child) {
                child_node.set_parent_transform(world);
            }
        }

        if let Some(node) = self.nodes.get(key) {
            backend.draw_node(node, &world, light_position);
        }

        for child in children {
            self.draw_subtree(child, backend, light_position, visited);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{ResourceHandle, ResourceKind};
    use crate::foundation::math::Vec4;
    use crate::render::RecordingBackend;
    use approx::assert_relative_eq;

    fn test_node(name: &str) -> SceneNode {
        SceneNode::new(
            name,
            ResourceHandle {
                id: 0,
                kind: ResourceKind::Geometry,
            },
            ResourceHandle {
                id: 1,
                kind: ResourceKind::Material,
            },
            None,
            CollisionState::None,
        )
    }

    fn parented_pair() -> (GameObject, NodeKey, NodeKey) {
        let mut object = GameObject::new("Pair", ObjectKind::None);
        let root = object.add_node(test_node("Root"));
        let child = object.add_node(test_node("Child"));
        object.set_root(root);
        object.link_child(root, child).unwrap();
        (object, root, child)
    }

    #[test]
    fn test_transform_delegation_requires_root() {
        let mut object = GameObject::new("Empty", ObjectKind::None);
        let err = object.translate(Vec3::new(1.0, 0.0, 0.0)).unwrap_err();
        assert_eq!(err, SceneError::MissingRoot("Empty".to_string()));
    }

    #[test]
    fn test_parent_translation_propagates_to_child() {
        let (mut object, _root, child) = parented_pair();
        let shift = Vec3::new(3.0, 0.0, -5.0);
        object.translate(shift).unwrap();

        let mut backend = RecordingBackend::default();
        object.draw(&mut backend, Vec3::zeros());

        // The child's world origin moves by exactly the parent's translation
        let child_world = object.node(child).unwrap().world_transform();
        let origin = child_world * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(origin.x, shift.x, epsilon = 1e-5);
        assert_relative_eq!(origin.y, shift.y, epsilon = 1e-5);
        assert_relative_eq!(origin.z, shift.z, epsilon = 1e-5);
    }

    #[test]
    fn test_draw_order_is_parent_before_child() {
        let (mut object, _root, _child) = parented_pair();
        let mut backend = RecordingBackend::default();
        object.draw(&mut backend, Vec3::zeros());

        let names: Vec<&str> = backend.draws.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Root", "Child"]);
    }

    #[test]
    fn test_unparented_extras_drawn_once() {
        let mut object = GameObject::new("Sub", ObjectKind::Submarine);
        let root = object.add_node(test_node("Hull"));
        object.set_root(root);
        // Window is in the arena but not parented under the hull
        object.add_node(test_node("Window"));

        let mut backend = RecordingBackend::default();
        object.draw(&mut backend, Vec3::zeros());

        let names: Vec<&str> = backend.draws.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Hull", "Window"]);
    }

    #[test]
    fn test_find_returns_first_match() {
        let mut object = GameObject::new("Kelp", ObjectKind::Kelp);
        let first = object.add_node(test_node("Leaf"));
        object.add_node(test_node("Leaf"));
        assert_eq!(object.find("Leaf"), Some(first));
        assert_eq!(object.find("Missing"), None);
    }
}
