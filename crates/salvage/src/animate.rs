//! Per-frame plant animation
//!
//! Kelp and seaweed sway by accumulating small orbit rotations around their
//! base pivot. The axis drifts with simulation time, so the sway wanders
//! instead of ticking back and forth metronomically.

use reef_engine::foundation::math::{angle_axis, constants::PI, Quat, Vec3};
use reef_engine::prelude::{ObjectKind, SceneRegistry};

/// Orbit step angle applied on each animation tick
pub const SWAY_STEP: f32 = PI / 64.0;

/// One sway step for the given simulation time
///
/// Pure in `time`, so replaying the same tick sequence reproduces the same
/// motion.
pub fn sway_rotation(time: f32) -> Quat {
    let axis = Vec3::new(0.1 * time.sin(), 0.0, 0.05 * (1.0 - time).sin());
    angle_axis(SWAY_STEP, axis)
}

/// Advance every animated object by one tick
///
/// Matches on the full kind set; kinds without an arm here are static
/// scenery by decision, not omission.
pub fn animate(registry: &mut SceneRegistry, time: f32) {
    let step = sway_rotation(time);
    for object in registry.iter_mut() {
        match object.kind() {
            ObjectKind::Kelp | ObjectKind::Seaweed => {
                if let Err(err) = object.orbit(step) {
                    log::warn!("cannot animate \"{}\": {err}", object.name());
                }
            }
            ObjectKind::None
            | ObjectKind::Coral
            | ObjectKind::Stalagmite
            | ObjectKind::Submarine
            | ObjectKind::Part
            | ObjectKind::Anemone
            | ObjectKind::Rock
            | ObjectKind::ParticleSystem
            | ObjectKind::VentBase
            | ObjectKind::Vent => {}
        }
    }
}
