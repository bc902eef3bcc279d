//! Salvage: recover the five machine parts before the oxygen runs out
//!
//! This shell runs the simulation headless with a simple autopilot standing
//! in for mouse and keyboard input, which makes it useful for exercising the
//! whole pipeline without a window.

mod animate;
mod builders;
mod game;
mod level;
mod settings;

use game::{GameSession, Outcome};
use reef_engine::foundation::logging;
use reef_engine::prelude::{ObjectKind, Vec3};
use reef_engine::render::NullBackend;
use settings::Settings;

fn main() {
    logging::init();

    let settings = Settings::load_or_default("settings.toml");
    let frame_dt = settings.sim.frame_interval;

    let mut session = match GameSession::new(settings) {
        Ok(session) => session,
        Err(err) => {
            log::error!("failed to build the world: {err}");
            std::process::exit(1);
        }
    };

    let spawn = session.player().position();
    log::info!(
        "spawn at ({:.1}, {:.1}, {:.1}), terrain there {:.2}, {} resources loaded",
        spawn.x,
        spawn.y,
        spawn.z,
        session.heightfield().sample(spawn.x, spawn.z),
        session.catalog().len()
    );

    // Headless autopilot: steer toward the nearest remaining part each frame
    let mut backend = NullBackend;
    let frame_cap = 20_000;
    for frame in 0..frame_cap {
        steer_toward_nearest_part(&mut session);
        session.step(frame_dt);
        session.draw(&mut backend);

        if frame % 100 == 0 {
            let hud = session.hud();
            log::info!(
                "t={:.1}s oxygen={:.0}s parts={}/5",
                session.time(),
                hud.oxygen,
                hud.parts
            );
        }
        if session.outcome().is_some() {
            break;
        }
    }

    match session.outcome() {
        Some(Outcome::Won) => log::info!(
            "salvage complete in {:.1}s with {:.0}s of air to spare",
            session.time(),
            session.hud().oxygen
        ),
        Some(Outcome::Lost) => log::info!("drowned after {:.1}s", session.time()),
        None => log::warn!("frame cap reached without an outcome"),
    }
}

/// Turn and swim toward the closest remaining machine part
fn steer_toward_nearest_part(session: &mut GameSession) {
    let position = session.player().position();
    let target = session
        .registry()
        .iter()
        .filter(|o| o.kind() == ObjectKind::Part)
        .filter_map(|o| o.root_position().ok())
        .min_by(|a, b| {
            let da = (a - position).norm();
            let db = (b - position).norm();
            da.total_cmp(&db)
        });

    let Some(target) = target else {
        session.player_mut().set_forward_velocity(0.0);
        return;
    };

    let to_target = Vec3::new(target.x - position.x, 0.0, target.z - position.z);
    if to_target.norm() < 1e-3 {
        return;
    }
    let heading = session.player().forward_movement();

    // Signed angle between heading and target direction in the ground plane
    let cross_y = heading.x * to_target.z - heading.z * to_target.x;
    let dot = heading.x * to_target.x + heading.z * to_target.z;
    let angle = cross_y.atan2(dot);

    let turn = angle.clamp(-0.1, 0.1);
    session.player_mut().yaw(-turn);
    session.player_mut().set_forward_velocity(1.0);
}
