//! World generation: resources, terrain, and scene population
//!
//! Everything random flows through one seeded generator, so a given seed
//! always produces the same reef.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reef_engine::prelude::{Heightfield, ResourceCatalog, ResourceKind, SceneRegistry, Vec3};
use reef_engine::{HeightfieldError, SceneError};

use crate::builders::ObjectBuilder;
use crate::settings::{vec3, WorldSettings};

/// Register the handles for every mesh and material the builders reference
///
/// In the shipped game the ids come back from the graphics loader; the
/// catalog mints stand-in ids in the same shape.
pub fn register_default_resources(catalog: &mut ResourceCatalog) {
    for name in [
        "Cylinder",
        "Sphere",
        "StalagmiteBase",
        "StalagmiteSpike",
        "SubmarineBase",
        "FatStem",
        "LongStem",
        "Branch",
        "Tip",
        "MachinePart",
        "Exhaust",
        "Base",
        "Middle",
        "Tentacle",
        "LowPolyCylinder",
        "Plane",
        "Boundary",
    ] {
        catalog.register(name, ResourceKind::Geometry);
    }
    for name in ["KelpMaterial", "ObjectMaterial", "NormalMapMaterial", "GlassMaterial"] {
        catalog.register(name, ResourceKind::Material);
    }
    for name in ["NormalMapSand", "NormalMapStone", "NormalMapMetal", "NormalMapGlass"] {
        catalog.register(name, ResourceKind::Texture);
    }
}

/// Generate the terrain heightfield from the world settings
///
/// The floor layer is gentle random sand. The boundary layer sits below the
/// floor almost everywhere and rises into walls on the outer band, and the
/// two merge cell-wise by maximum.
pub fn generate_heightfield(
    world: &WorldSettings,
    rng: &mut StdRng,
) -> Result<Heightfield, HeightfieldError> {
    let width = world.grid_width;
    let height = world.grid_height;

    let mut floor = Vec::with_capacity(width * height);
    let mut boundary = Vec::with_capacity(width * height);
    for _ in 0..width * height {
        floor.push(rng.gen_range(0.0..0.5));
        boundary.push(-0.1 - rng.gen_range(0.0..1.0));
    }

    // Raise boundary walls on the outer band, tallest at the very edge
    let band = 4usize;
    for z in 0..height {
        for x in 0..width {
            let edge_distance = x.min(z).min(width - 1 - x).min(height - 1 - z);
            if edge_distance < band {
                let wall = (band - edge_distance) as f32 * 30.0 + rng.gen_range(0.0..16.0);
                boundary[x + width * z] += wall / 8.0;
            }
        }
    }

    Heightfield::from_layers(
        &floor,
        &boundary,
        width,
        height,
        width as f32 / 2.0,
        height as f32 / 2.0,
    )
}

/// Build and place every object in the reef
pub fn populate(
    world: &WorldSettings,
    catalog: &ResourceCatalog,
    rng: &mut StdRng,
) -> Result<SceneRegistry, SceneError> {
    let builder = ObjectBuilder::new(catalog);
    let mut registry = SceneRegistry::new();
    registry.set_background_color(vec3(world.background));

    registry.add(builder.floor_plane()?);
    registry.add(builder.boundary()?);
    registry.add(builder.sun(vec3(world.sun_position))?);

    registry.add(builder.submarine("Submarine", Vec3::new(-17.0, 7.5, -33.0))?);

    registry.add(builder.stalagmite("Stalagmite1", Vec3::new(10.0, 0.0, -10.0))?);
    registry.add(builder.stalagmite("Stalagmite2", Vec3::new(-25.0, 0.0, 15.0))?);

    // The five parts the player must recover
    let part_spots = [
        Vec3::new(0.0, 4.0, 0.0),
        Vec3::new(-20.0, 4.0, -30.0),
        Vec3::new(25.0, 4.0, -12.0),
        Vec3::new(-12.0, 4.0, 28.0),
        Vec3::new(30.0, 4.0, 22.0),
    ];
    for (i, spot) in part_spots.into_iter().enumerate() {
        registry.add(builder.machine_part(&format!("Part{i}"), spot)?);
    }

    for (i, spot) in [Vec3::new(15.0, 0.0, 18.0), Vec3::new(-8.0, 0.0, -22.0)]
        .into_iter()
        .enumerate()
    {
        registry.add(builder.vent_base(&format!("VentBase{i}"), spot)?);
        registry.add(builder.vent(&format!("Vent{i}"), spot + Vec3::new(0.0, 3.0, 0.0))?);
    }

    registry.add(builder.anemone("Anemone1", Vec3::new(4.0, 2.0, 6.0))?);
    registry.add(builder.coral("Coral1", Vec3::new(-8.0, 5.0, -20.0))?);
    registry.add(builder.kelp("Kelp1", 4, Vec3::new(6.0, 0.0, -8.0))?);

    for i in 0..6 {
        let position = Vec3::new(
            rng.gen_range(-40.0..40.0),
            1.0,
            rng.gen_range(-40.0..40.0),
        );
        registry.add(builder.rock(&format!("Rock{i}"), position, rng.gen_range(0.5..2.5))?);
    }

    for stalk in builder.seaweed_patch(rng, 10, 50.0, 50.0, Vec3::new(0.0, 0.0, -5.0))? {
        registry.add(stalk);
    }

    Ok(registry)
}

/// Seeded generator for all world randomness
pub fn world_rng(world: &WorldSettings) -> StdRng {
    StdRng::seed_from_u64(world.seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reef_engine::prelude::ObjectKind;

    #[test]
    fn test_heightfield_matches_grid_settings() {
        let world = WorldSettings::default();
        let field = generate_heightfield(&world, &mut world_rng(&world)).unwrap();
        assert_eq!(field.width(), 200);
        assert_eq!(field.height(), 200);
        // Interior samples stay near the sand floor
        let center = field.sample(0.0, 0.0);
        assert!(center < 5.0, "interior unexpectedly tall: {center}");
    }

    #[test]
    fn test_boundary_walls_rise_above_the_floor() {
        let world = WorldSettings::default();
        let field = generate_heightfield(&world, &mut world_rng(&world)).unwrap();
        // A point hard against the grid edge sits on a wall
        let edge = field.sample(-99.5, 0.0);
        let center = field.sample(0.0, 0.0);
        assert!(edge > center + 3.0, "no wall at the edge: {edge} vs {center}");
    }

    #[test]
    fn test_world_population_is_seed_deterministic() {
        let world = WorldSettings::default();
        let mut catalog = ResourceCatalog::new();
        register_default_resources(&mut catalog);

        let a = populate(&world, &catalog, &mut world_rng(&world)).unwrap();
        let b = populate(&world, &catalog, &mut world_rng(&world)).unwrap();

        assert_eq!(a.len(), b.len());
        for i in 0..a.len() {
            let (left, right) = (a.get_at(i).unwrap(), b.get_at(i).unwrap());
            assert_eq!(left.name(), right.name());
            assert_eq!(
                left.root_position().unwrap(),
                right.root_position().unwrap()
            );
        }
    }

    #[test]
    fn test_world_contains_five_parts() {
        let world = WorldSettings::default();
        let mut catalog = ResourceCatalog::new();
        register_default_resources(&mut catalog);
        let registry = populate(&world, &catalog, &mut world_rng(&world)).unwrap();

        let parts = registry
            .iter()
            .filter(|o| o.kind() == ObjectKind::Part)
            .count();
        assert_eq!(parts, 5);
    }
}
