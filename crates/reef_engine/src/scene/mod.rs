//! Scene graph: nodes, composite objects, and the scene registry

mod node;
mod object;
mod registry;

pub use node::{CollisionState, NodeKey, PartTag, SceneNode};
pub use object::{GameObject, ObjectKind};
pub use registry::SceneRegistry;
