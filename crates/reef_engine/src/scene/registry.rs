//! Scene registry: the ordered collection of live game objects

use crate::foundation::math::Vec3;
use crate::render::DrawBackend;
use crate::scene::object::GameObject;

/// Ordered collection of composite objects with per-frame update and draw
#[derive(Debug, Default)]
pub struct SceneRegistry {
    objects: Vec<GameObject>,
    background_color: Vec3,
}

impl SceneRegistry {
    /// Create an empty registry with a black background
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the clear color used at the start of every draw pass
    pub fn set_background_color(&mut self, color: Vec3) {
        self.background_color = color;
    }

    /// Current clear color
    pub fn background_color(&self) -> Vec3 {
        self.background_color
    }

    /// Append an object
    pub fn add(&mut self, object: GameObject) {
        self.objects.push(object);
    }

    /// First object with the given name
    pub fn get(&self, name: &str) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.name() == name)
    }

    /// Mutable first object with the given name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut GameObject> {
        self.objects.iter_mut().find(|o| o.name() == name)
    }

    /// Object by index
    pub fn get_at(&self, index: usize) -> Option<&GameObject> {
        self.objects.get(index)
    }

    /// Mutable object by index
    pub fn get_at_mut(&mut self, index: usize) -> Option<&mut GameObject> {
        self.objects.get_mut(index)
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate over live objects
    pub fn iter(&self) -> std::slice::Iter<'_, GameObject> {
        self.objects.iter()
    }

    /// Iterate mutably over live objects
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, GameObject> {
        self.objects.iter_mut()
    }

    /// Update every object, then sweep out consumed ones
    ///
    /// The sweep re-checks the same index after an erase instead of
    /// advancing, since the vector shifts left. The object's arena frees
    /// every node exactly once on drop.
    pub fn update(&mut self, dt: f32) {
        for object in &mut self.objects {
            object.update(dt);
        }

        let mut i = 0;
        while i < self.objects.len() {
            if self.objects[i].is_consumed() {
                let removed = self.objects.remove(i);
                log::debug!("swept consumed object \"{}\"", removed.name());
            } else {
                i += 1;
            }
        }
    }

    /// Clear the frame and draw every remaining object
    pub fn draw(&mut self, backend: &mut dyn DrawBackend, light_position: Vec3) {
        backend.clear(self.background_color);
        for object in &mut self.objects {
            object.draw(backend, light_position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{ResourceHandle, ResourceKind};
    use crate::scene::node::{CollisionState, SceneNode};
    use crate::scene::object::ObjectKind;

    fn test_object(name: &str) -> GameObject {
        let mut object = GameObject::new(name, ObjectKind::Rock);
        let root = object.add_node(SceneNode::new(
            "Root",
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
        ));
        object.set_root(root);
        object
    }

    #[test]
    fn test_sweep_removes_exactly_the_consumed_object() {
        let mut registry = SceneRegistry::new();
        registry.add(test_object("A"));
        registry.add(test_object("B"));
        registry.add(test_object("C"));

        registry
            .get_mut("B")
            .unwrap()
            .root_mut()
            .unwrap()
            .set_collision(CollisionState::Consumed);

        registry.update(0.016);

        assert_eq!(registry.len(), 2);
        assert!(registry.get("A").is_some());
        assert!(registry.get("B").is_none());
        assert!(registry.get("C").is_some());
    }

    #[test]
    fn test_sweep_handles_adjacent_consumed_objects() {
        let mut registry = SceneRegistry::new();
        for name in ["A", "B", "C", "D"] {
            registry.add(test_object(name));
        }
        for name in ["B", "C"] {
            registry
                .get_mut(name)
                .unwrap()
                .root_mut()
                .unwrap()
                .set_collision(CollisionState::Consumed);
        }

        registry.update(0.016);

        assert_eq!(registry.len(), 2);
        assert!(registry.get("B").is_none());
        assert!(registry.get("C").is_none());
    }

    #[test]
    fn test_name_lookup_returns_first_match() {
        let mut registry = SceneRegistry::new();
        registry.add(test_object("Seaweed"));
        registry.add(test_object("Seaweed"));
        assert_eq!(registry.len(), 2);
        assert!(registry.get("Seaweed").is_some());
        assert!(registry.get_at(1).is_some());
        assert!(registry.get_at(2).is_none());
    }
}
