//! Sphere collision dispatch between the player and the scene
//!
//! Every object kind gets an explicit match arm, so introducing a kind
//! forces a decision about its contact behavior. Consumption is flagged on
//! the node and swept by the registry afterwards; the dispatcher itself
//! never removes objects.

use crate::foundation::math::Vec3;
use crate::player::Player;
use crate::scene::{CollisionState, GameObject, ObjectKind, SceneRegistry};

/// Timer seconds drained per harmful contact frame
const CONTACT_DAMAGE: f32 = 1.0;

/// One gameplay-relevant contact resolved this frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollisionEvent {
    /// A machine part was collected
    PartCollected {
        /// Name of the collected object
        object: String,
        /// Parts held after collection
        total: u32,
    },
    /// The player took contact damage
    Hurt {
        /// Name of the damaging object
        object: String,
    },
}

/// Per-frame collision pass over the whole registry
#[derive(Debug, Default)]
pub struct CollisionDispatcher;

impl CollisionDispatcher {
    /// Create a dispatcher
    pub fn new() -> Self {
        Self
    }

    /// Test the player against every object and apply contact effects
    ///
    /// Returns the contacts that changed game state this frame. Runs after
    /// player movement and before the registry sweep, so a part consumed
    /// here disappears at the end of the same frame.
    pub fn run(&self, player: &mut Player, registry: &mut SceneRegistry) -> Vec<CollisionEvent> {
        let mut events = Vec::new();

        for object in registry.iter_mut() {
            let Ok(root_position) = object.root_position() else {
                continue;
            };
            let (root_radius, root_collision) = match object.root() {
                Ok(root) => (root.radius(), root.collision()),
                Err(_) => continue,
            };
            let reach = player.radius() + root_radius;
            let overlapping = if is_tall_and_thin(object.kind()) {
                // Vents and stalagmites extend vertically well past their
                // root sphere; contact is judged in the ground plane only
                horizontal_distance(player.position(), root_position) <= reach
            } else {
                (player.position() - root_position).norm() <= reach
            };

            match object.kind() {
                ObjectKind::Part => {
                    if overlapping && root_collision == CollisionState::Collidable {
                        if let Ok(root) = object.root_mut() {
                            root.set_collision(CollisionState::Consumed);
                        }
                        player.collect_part();
                        log::info!(
                            "collected part \"{}\" ({} held)",
                            object.name(),
                            player.parts()
                        );
                        events.push(CollisionEvent::PartCollected {
                            object: object.name().to_string(),
                            total: player.parts(),
                        });
                    }
                }
                ObjectKind::Vent => {
                    if overlapping && root_collision == CollisionState::Collidable {
                        player.decrease_timer(CONTACT_DAMAGE);
                        player.mark_hurt();
                        events.push(CollisionEvent::Hurt {
                            object: object.name().to_string(),
                        });
                    }
                }
                ObjectKind::Stalagmite => {
                    if let Some(event) = Self::test_hitboxes(player, object, root_position) {
                        events.push(event);
                    }
                }
                // Scenery and structural kinds have no contact response
                ObjectKind::None
                | ObjectKind::Kelp
                | ObjectKind::Coral
                | ObjectKind::Submarine
                | ObjectKind::Anemone
                | ObjectKind::Seaweed
                | ObjectKind::Rock
                | ObjectKind::ParticleSystem
                | ObjectKind::VentBase => {}
            }
        }

        events
    }

    /// Test the player against an object's hitbox spheres
    ///
    /// Hitbox nodes store offsets from the object root; their world centers
    /// are the root position plus that offset. Unlike the column test on
    /// tall-thin roots, each hitbox is a genuine sphere, so a spike several
    /// tiers up cannot hit a player at ground level.
    fn test_hitboxes(
        player: &mut Player,
        object: &GameObject,
        root_position: Vec3,
    ) -> Option<CollisionEvent> {
        for &key in object.hitboxes() {
            let Some(hitbox) = object.node(key) else {
                continue;
            };
            if hitbox.collision() != CollisionState::Collidable {
                continue;
            }
            let center = root_position + hitbox.position();
            let reach = player.radius() + hitbox.radius();
            if (player.position() - center).norm() <= reach {
                player.decrease_timer(CONTACT_DAMAGE);
                player.mark_hurt();
                return Some(CollisionEvent::Hurt {
                    object: object.name().to_string(),
                });
            }
        }
        None
    }
}

/// Kinds whose collision volume is a vertical column rather than a sphere
fn is_tall_and_thin(kind: ObjectKind) -> bool {
    matches!(
        kind,
        ObjectKind::Vent | ObjectKind::VentBase | ObjectKind::Stalagmite
    )
}

fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}
