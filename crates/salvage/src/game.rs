//! Game session: owns the world and drives the per-tick pipeline
//!
//! Tick order is fixed: drain oxygen, move the player, animate plants,
//! dispatch collisions, sweep consumed objects, then draw. Input arrives
//! between ticks as velocity signs and rotation deltas.

use std::sync::Arc;

use reef_engine::collision::{CollisionDispatcher, CollisionEvent};
use reef_engine::foundation::time::FrameClock;
use reef_engine::prelude::{DrawBackend, Heightfield, Player, ResourceCatalog, SceneRegistry};
use reef_engine::{HeightfieldError, SceneError};
use thiserror::Error;

use crate::animate::animate;
use crate::level;
use crate::settings::{vec3, Settings};

/// World construction failure
#[derive(Debug, Error)]
pub enum GameError {
    /// Scene assembly failed
    #[error("scene setup failed: {0}")]
    Scene(#[from] SceneError),

    /// Terrain generation failed
    #[error("terrain generation failed: {0}")]
    Terrain(#[from] HeightfieldError),
}

/// Terminal result of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// All parts recovered
    Won,
    /// Oxygen ran out
    Lost,
}

/// Read-only view of the state the HUD displays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudSnapshot {
    /// Oxygen remaining in seconds
    pub oxygen: f32,
    /// Parts collected so far
    pub parts: u32,
    /// Whether the hurt flash is showing
    pub hurt: bool,
    /// Terminal result, once reached
    pub outcome: Option<Outcome>,
}

/// One running game
pub struct GameSession {
    settings: Settings,
    catalog: ResourceCatalog,
    registry: SceneRegistry,
    player: Player,
    dispatcher: CollisionDispatcher,
    clock: FrameClock,
    heightfield: Arc<Heightfield>,
    time: f32,
    outcome: Option<Outcome>,
}

impl GameSession {
    /// Build the full world from settings
    pub fn new(settings: Settings) -> Result<Self, GameError> {
        let mut catalog = ResourceCatalog::new();
        level::register_default_resources(&mut catalog);

        let mut rng = level::world_rng(&settings.world);
        let heightfield = Arc::new(level::generate_heightfield(&settings.world, &mut rng)?);
        let registry = level::populate(&settings.world, &catalog, &mut rng)?;

        let mut player = Player::new();
        player.set_view(
            vec3(settings.camera.position),
            vec3(settings.camera.look_at),
            vec3(settings.camera.up),
        );
        player.set_timer(settings.player.oxygen_seconds);
        player.set_max_speed(settings.player.max_speed);
        player.set_radius(settings.player.radius);
        player.set_heightfield(Arc::clone(&heightfield));

        log::info!(
            "world ready: {} objects, {}x{} terrain",
            registry.len(),
            heightfield.width(),
            heightfield.height()
        );

        Ok(Self {
            clock: FrameClock::new(settings.sim.frame_interval),
            settings,
            catalog,
            registry,
            player,
            dispatcher: CollisionDispatcher::new(),
            heightfield,
            time: 0.0,
            outcome: None,
        })
    }

    /// The player/camera
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable player access for input wiring
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// The live scene
    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    /// The resource catalog the world was built from
    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    /// The terrain the player moves on
    pub fn heightfield(&self) -> &Arc<Heightfield> {
        &self.heightfield
    }

    /// Terminal result, once reached
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Total simulated time in seconds
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Current HUD state
    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            oxygen: self.player.timer(),
            parts: self.player.parts(),
            hurt: self.player.is_hurt(),
            outcome: self.outcome,
        }
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Returns the collision events resolved during the step. Once an
    /// outcome is reached the world freezes and steps become no-ops.
    pub fn step(&mut self, dt: f32) -> Vec<CollisionEvent> {
        if self.outcome.is_some() {
            return Vec::new();
        }

        self.time += dt;
        self.player.decrease_timer(dt);
        self.player.update(dt);
        animate(&mut self.registry, self.time);
        let events = self.dispatcher.run(&mut self.player, &mut self.registry);
        self.registry.update(dt);

        if self.player.has_won() {
            log::info!("all parts recovered, surfacing");
            self.outcome = Some(Outcome::Won);
        } else if self.player.is_out_of_air() {
            log::info!("oxygen exhausted");
            self.player.set_dead(true);
            self.outcome = Some(Outcome::Lost);
        }

        events
    }

    /// Step the simulation if the frame clock allows, then draw
    ///
    /// Returns the events of the step that ran, or `None` when gated.
    pub fn tick(&mut self, backend: &mut dyn DrawBackend) -> Option<Vec<CollisionEvent>> {
        let dt = self.clock.try_tick()?;
        let events = self.step(dt);
        self.draw(backend);
        Some(events)
    }

    /// Draw the current frame
    pub fn draw(&mut self, backend: &mut dyn DrawBackend) {
        self.registry
            .draw(backend, vec3(self.settings.world.sun_position));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reef_engine::prelude::{ObjectKind, Vec3};
    use reef_engine::render::RecordingBackend;

    fn session() -> GameSession {
        GameSession::new(Settings::default()).unwrap()
    }

    fn part_positions(session: &GameSession) -> Vec<Vec3> {
        session
            .registry()
            .iter()
            .filter(|o| o.kind() == ObjectKind::Part)
            .map(|o| o.root_position().unwrap())
            .collect()
    }

    #[test]
    fn test_collecting_all_parts_wins() {
        let mut session = session();
        let spots = part_positions(&session);
        assert_eq!(spots.len(), 5);

        for spot in spots {
            session.player_mut().set_position(spot);
            session.step(0.05);
        }

        assert_eq!(session.outcome(), Some(Outcome::Won));
        assert_eq!(session.hud().parts, 5);
        // Consumed parts were swept out of the scene
        assert!(part_positions(&session).is_empty());
    }

    #[test]
    fn test_oxygen_exhaustion_loses() {
        let mut session = session();
        session.player_mut().set_timer(0.04);
        session.step(0.05);

        assert_eq!(session.outcome(), Some(Outcome::Lost));
        assert!(session.player().is_dead());
    }

    #[test]
    fn test_finished_session_freezes() {
        let mut session = session();
        session.player_mut().set_timer(0.04);
        session.step(0.05);
        let oxygen_after_loss = session.hud().oxygen;

        let events = session.step(0.05);
        assert!(events.is_empty());
        assert_eq!(session.hud().oxygen, oxygen_after_loss);
    }

    #[test]
    fn test_same_seed_and_input_replays_identically() {
        let mut a = session();
        let mut b = session();

        for s in [&mut a, &mut b] {
            s.player_mut().set_forward_velocity(1.0);
            for i in 0..40 {
                if i == 10 {
                    s.player_mut().jump();
                }
                s.step(0.05);
            }
        }

        assert_eq!(a.player().position(), b.player().position());
        assert_eq!(a.player().state(), b.player().state());
        assert_eq!(a.registry().len(), b.registry().len());
    }

    #[test]
    fn test_draw_clears_to_background_color() {
        let mut session = session();
        let mut backend = RecordingBackend::default();
        session.step(0.05);
        session.draw(&mut backend);

        assert_eq!(backend.cleared_to, Some(Vec3::new(0.5, 0.5, 1.0)));
        assert!(!backend.draws.is_empty());
    }

    #[test]
    fn test_oxygen_drains_with_time() {
        let mut session = session();
        let start = session.hud().oxygen;
        for _ in 0..20 {
            session.step(0.05);
        }
        let drained = start - session.hud().oxygen;
        assert!((drained - 1.0).abs() < 1e-3, "drained {drained}");
    }
}
