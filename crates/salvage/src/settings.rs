//! Game settings loaded from a TOML file, with sensible defaults

use std::path::Path;

use reef_engine::prelude::Vec3;
use serde::{Deserialize, Serialize};

/// Top-level game settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Player tuning
    pub player: PlayerSettings,

    /// World generation
    pub world: WorldSettings,

    /// Starting view placement
    pub camera: CameraSettings,

    /// Simulation loop tuning
    pub sim: SimSettings,
}

/// Player tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Starting oxygen in seconds
    pub oxygen_seconds: f32,

    /// Movement speed clamp
    pub max_speed: f32,

    /// Collision sphere radius
    pub radius: f32,
}

/// World generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Terrain grid cells along X
    pub grid_width: usize,

    /// Terrain grid cells along Z
    pub grid_height: usize,

    /// Seed for all world randomness
    pub seed: u64,

    /// Background (water) color
    pub background: [f32; 3],

    /// World position of the light source
    pub sun_position: [f32; 3],
}

/// Starting view placement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Eye position
    pub position: [f32; 3],

    /// Point looked at
    pub look_at: [f32; 3],

    /// Up direction
    pub up: [f32; 3],
}

/// Simulation loop tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    /// Minimum wall-clock seconds between simulation ticks
    pub frame_interval: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            oxygen_seconds: 480.0,
            max_speed: 6.0,
            radius: 1.0,
        }
    }
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            grid_width: 200,
            grid_height: 200,
            seed: 3535,
            background: [0.5, 0.5, 1.0],
            sun_position: [0.0, 100.0, 0.0],
        }
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: [0.0, 5.0, 8.0],
            look_at: [0.0, 2.5, 0.0],
            up: [0.0, 1.0, 0.0],
        }
    }
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            frame_interval: 0.05,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file, falling back to defaults
    ///
    /// A missing file is normal on first run; a malformed one is logged and
    /// ignored rather than aborting the game.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => match toml::from_str(&text) {
                Ok(settings) => {
                    log::info!("loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("ignoring malformed settings file {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no settings file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }
}

/// Convert a settings triple into a vector
pub fn vec3(components: [f32; 3]) -> Vec3 {
    Vec3::new(components[0], components[1], components[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_the_shipping_tuning() {
        let settings = Settings::default();
        assert_eq!(settings.player.oxygen_seconds, 480.0);
        assert_eq!(settings.player.max_speed, 6.0);
        assert_eq!(settings.world.grid_width, 200);
        assert_eq!(settings.world.seed, 3535);
        assert_eq!(settings.sim.frame_interval, 0.05);
    }

    #[test]
    fn test_partial_file_overrides_only_named_fields() {
        let parsed: Settings = toml::from_str(
            r#"
            [player]
            oxygen_seconds = 120.0

            [world]
            seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(parsed.player.oxygen_seconds, 120.0);
        assert_eq!(parsed.player.max_speed, 6.0);
        assert_eq!(parsed.world.seed, 42);
        assert_eq!(parsed.world.grid_width, 200);
    }

    #[test]
    fn test_settings_roundtrip_through_toml() {
        let settings = Settings::default();
        let text = toml::to_string(&settings).unwrap();
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back.world.grid_height, settings.world.grid_height);
        assert_eq!(back.camera.position, settings.camera.position);
    }
}
