//! # Reef Engine
//!
//! A small scene-graph game engine core built for underwater exploration
//! games. The engine owns the simulation side of a frame: hierarchical
//! transform propagation, composite multi-part game objects, a physics-lite
//! player controller driven against a sampled heightfield, and sphere-based
//! collision dispatch.
//!
//! Rendering, windowing, input, audio, and file parsing are deliberately
//! external collaborators. The engine hands a world matrix and a node view to
//! a [`render::DrawBackend`] and expects input to arrive as velocity signs and
//! rotation deltas on the [`player::Player`].
//!
//! ## Frame ordering
//!
//! Per tick, work must proceed strictly as:
//!
//! 1. apply input deltas to the player,
//! 2. [`player::Player::update`] against the heightfield,
//! 3. object animation ([`scene::SceneRegistry::update`]),
//! 4. collision dispatch ([`collision::CollisionDispatcher::run`]),
//! 5. registry sweep of consumed objects (part of `update`),
//! 6. draw with parent-before-child transform propagation.
//!
//! Drawing a subtree out of parent-then-child order would render children
//! with the previous frame's transform; the depth-first draw in
//! [`scene::GameObject::draw`] preserves the order by construction.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod collision;
pub mod foundation;
pub mod player;
pub mod render;
pub mod scene;
pub mod terrain;

mod error;

pub use error::{HeightfieldError, SceneError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{ResourceCatalog, ResourceHandle, ResourceKind},
        collision::CollisionDispatcher,
        foundation::math::{Mat4, Quat, Vec3},
        foundation::time::FrameClock,
        player::{Player, PlayerState},
        render::DrawBackend,
        scene::{CollisionState, GameObject, NodeKey, ObjectKind, PartTag, SceneNode, SceneRegistry},
        terrain::Heightfield,
        HeightfieldError, SceneError,
    };
}
