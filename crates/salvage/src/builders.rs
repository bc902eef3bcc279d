//! Constructors for every composite object in the game world
//!
//! Builders look up geometry and material handles in the resource catalog
//! and assemble node hierarchies inside a fresh [`GameObject`] arena. Node
//! positions are relative to the object root except where a part is left
//! deliberately un-parented.

use rand::Rng;
use reef_engine::foundation::math::{angle_axis, constants::{HALF_PI, PI, TAU}};
use reef_engine::prelude::{
    CollisionState, GameObject, ObjectKind, PartTag, ResourceCatalog, SceneNode, Vec3,
};
use reef_engine::scene::NodeKey;
use reef_engine::SceneError;

/// Assembles game objects from catalog resources
pub struct ObjectBuilder<'a> {
    catalog: &'a ResourceCatalog,
}

impl<'a> ObjectBuilder<'a> {
    /// Create a builder over a populated catalog
    pub fn new(catalog: &'a ResourceCatalog) -> Self {
        Self { catalog }
    }

    /// Resolve handles and create a detached node
    fn instance(
        &self,
        name: &str,
        geometry: &str,
        material: &str,
        collision: CollisionState,
    ) -> Result<SceneNode, SceneError> {
        Ok(SceneNode::new(
            name,
            self.catalog.geometry(geometry)?,
            self.catalog.material(material)?,
            None,
            collision,
        ))
    }

    /// Swaying kelp bush: a rooted stem with orbiting branches and leaves
    ///
    /// `complexity` controls the branch fan-out; the shipped world uses 4.
    pub fn kelp(
        &self,
        name: &str,
        complexity: usize,
        position: Vec3,
    ) -> Result<GameObject, SceneError> {
        let mut kelp = GameObject::new(name, ObjectKind::Kelp);

        let mut root = self.instance("Root", "Cylinder", "KelpMaterial", CollisionState::None)?;
        root.set_position(position);
        root.set_pivot(Vec3::new(0.0, -1.0, 0.0));
        root.set_tag(PartTag::Stem);
        let root_key = kelp.add_node(root);
        kelp.set_root(root_key);

        let offset = 0.2;
        let stem_len = 2.0;
        for i in 0..=complexity {
            let frac = i as f32 / (complexity + 1) as f32;
            let mut branch =
                self.instance("Branch", "Cylinder", "KelpMaterial", CollisionState::None)?;
            branch.set_tag(PartTag::Stem);
            branch.set_position(Vec3::new(0.0, 2.0, 0.0));
            branch.set_pivot(Vec3::new(0.0, -stem_len / 2.0, 0.0));
            // Fan the branch out from the stem as its starting pose
            branch.orbit(angle_axis(
                TAU / 12.0,
                Vec3::new((TAU * frac).cos(), 0.0, (TAU * frac).sin()),
            ));
            let branch_key = kelp.add_node(branch);
            kelp.link_child(root_key, branch_key)?;

            for j in 0..complexity {
                let frac = j as f32 / complexity as f32;
                self.attach_kelp_leaf(&mut kelp, branch_key, frac, 1.0, offset)?;
                self.attach_kelp_leaf(&mut kelp, branch_key, frac, 0.0, offset)?;
            }

            for k in 0..complexity {
                let frac = k as f32 / complexity as f32;
                let mut sub =
                    self.instance("SubBranch", "Cylinder", "KelpMaterial", CollisionState::None)?;
                sub.set_tag(PartTag::Stem);
                sub.set_position(Vec3::new(0.0, stem_len, 0.0));
                sub.set_pivot(Vec3::new(0.0, -stem_len / 2.0, 0.0));
                sub.orbit(angle_axis(
                    -TAU / 16.0,
                    Vec3::new((TAU * frac).cos(), 0.0, (TAU * frac).sin()),
                ));
                let sub_key = kelp.add_node(sub);
                kelp.link_child(branch_key, sub_key)?;

                for j in 0..complexity {
                    let frac = j as f32 / complexity as f32;
                    self.attach_kelp_leaf(&mut kelp, sub_key, frac, 1.0, offset)?;
                }
            }
        }

        Ok(kelp)
    }

    fn attach_kelp_leaf(
        &self,
        kelp: &mut GameObject,
        parent: NodeKey,
        frac: f32,
        height: f32,
        offset: f32,
    ) -> Result<(), SceneError> {
        let mut leaf = self.instance("Leaf", "Sphere", "KelpMaterial", CollisionState::None)?;
        leaf.set_tag(PartTag::Leaf);
        leaf.set_scale(
            0.25 * Vec3::new(
                1.0 + (TAU * frac).cos().abs(),
                0.2,
                1.0 + (TAU * frac).sin().abs(),
            ),
        );
        leaf.set_position(Vec3::new(
            offset * (TAU * frac).cos(),
            height,
            offset * (TAU * frac).sin(),
        ));
        leaf.set_pivot(Vec3::new(0.0, -1.0, 0.0));
        let leaf_key = kelp.add_node(leaf);
        kelp.link_child(parent, leaf_key)
    }

    /// Spiked stone column; the spikes are registered as damaging hitboxes
    pub fn stalagmite(&self, name: &str, position: Vec3) -> Result<GameObject, SceneError> {
        let mut stalagmite = GameObject::new(name, ObjectKind::Stalagmite);

        let mut root =
            self.instance("Root", "StalagmiteBase", "ObjectMaterial", CollisionState::None)?;
        root.set_position(position);
        root.set_tag(PartTag::Stem);
        let root_key = stalagmite.add_node(root);
        stalagmite.set_root(root_key);

        // Tapering tiers, each ringed by four spikes
        let mut s = 0.9;
        let mut h = 0.0;
        for i in 0..8 {
            let mut tier = self.instance(
                "Tier",
                "StalagmiteBase",
                "ObjectMaterial",
                CollisionState::None,
            )?;
            tier.set_scale(Vec3::new(s, i as f32 * s, s));
            tier.set_position(Vec3::new(0.0, h, 0.0));
            let tier_height = tier.scale().y;
            let tier_key = stalagmite.add_node(tier);
            stalagmite.link_child(root_key, tier_key)?;

            let ring = [
                (Vec3::new(tier_height, h, 0.0), Vec3::new(0.0, 0.0, -1.0)),
                (Vec3::new(-tier_height, h, 0.0), Vec3::new(0.0, 0.0, 1.0)),
                (Vec3::new(0.0, h, tier_height), Vec3::new(1.0, 0.0, 0.0)),
                (Vec3::new(0.0, h, -tier_height), Vec3::new(-1.0, 0.0, 0.0)),
            ];
            for (spike_position, axis) in ring {
                let mut spike = self.instance(
                    "Spike",
                    "StalagmiteSpike",
                    "ObjectMaterial",
                    CollisionState::Collidable,
                )?;
                spike.set_scale(Vec3::new(1.0, 2.0, 1.0));
                spike.set_position(spike_position);
                spike.rotate(angle_axis(HALF_PI, axis));
                let spike_key = stalagmite.add_node(spike);
                stalagmite.link_child(root_key, spike_key)?;
                stalagmite.add_hitbox(spike_key);
            }

            s -= 0.1;
            h += 2.0;
        }

        let mut tip = self.instance(
            "Tip",
            "StalagmiteSpike",
            "ObjectMaterial",
            CollisionState::None,
        )?;
        tip.set_scale(Vec3::new(1.0, 2.0, 1.0));
        tip.set_position(Vec3::new(0.0, 17.0, 0.0));
        let tip_key = stalagmite.add_node(tip);
        stalagmite.link_child(root_key, tip_key)?;

        Ok(stalagmite)
    }

    /// The wrecked submarine with its independently placed front window
    pub fn submarine(&self, name: &str, position: Vec3) -> Result<GameObject, SceneError> {
        let mut submarine = GameObject::new(name, ObjectKind::Submarine);

        let mut hull =
            self.instance("Hull", "SubmarineBase", "ObjectMaterial", CollisionState::None)?;
        hull.set_scale(Vec3::new(1.2, 0.5, 0.7));
        hull.set_position(position);
        let hull_key = submarine.add_node(hull);
        submarine.set_root(hull_key);

        // The window sits in the arena un-parented; it holds its own world
        // position instead of inheriting the hull transform
        let mut window = self.instance(
            "FrontWindow",
            "SubmarineBase",
            "GlassMaterial",
            CollisionState::None,
        )?;
        window.set_scale(Vec3::new(0.4, 0.3, 0.5));
        window.set_position(position + Vec3::new(-7.0, 1.0, 0.0));
        window.rotate(angle_axis(PI, Vec3::new(0.0, 0.0, 1.0)));
        submarine.add_node(window);

        Ok(submarine)
    }

    /// Collectible machine part; consuming all of them wins the game
    pub fn machine_part(&self, name: &str, position: Vec3) -> Result<GameObject, SceneError> {
        let mut part = GameObject::new(name, ObjectKind::Part);

        let mut body = self.instance(
            "Body",
            "MachinePart",
            "ObjectMaterial",
            CollisionState::Collidable,
        )?;
        body.set_position(position);
        let body_key = part.add_node(body);
        part.set_root(body_key);

        let mut exhaust =
            self.instance("Exhaust", "Exhaust", "ObjectMaterial", CollisionState::None)?;
        exhaust.set_position(Vec3::new(0.0, 1.2, 0.0));
        let exhaust_key = part.add_node(exhaust);
        part.link_child(body_key, exhaust_key)?;

        Ok(part)
    }

    /// Sea anemone: a squat base, a middle bulb, and a ring of tentacles
    pub fn anemone(&self, name: &str, position: Vec3) -> Result<GameObject, SceneError> {
        let mut anemone = GameObject::new(name, ObjectKind::Anemone);

        let mut base = self.instance("Base", "Base", "ObjectMaterial", CollisionState::None)?;
        base.set_position(position);
        base.set_tag(PartTag::Stem);
        let base_key = anemone.add_node(base);
        anemone.set_root(base_key);

        let mut middle = self.instance("Middle", "Middle", "ObjectMaterial", CollisionState::None)?;
        middle.set_position(Vec3::new(0.0, 0.5, 0.0));
        let middle_key = anemone.add_node(middle);
        anemone.link_child(base_key, middle_key)?;

        let tentacles = 8;
        for i in 0..tentacles {
            let frac = i as f32 / tentacles as f32;
            let mut tentacle =
                self.instance("Tentacle", "Tentacle", "ObjectMaterial", CollisionState::None)?;
            tentacle.set_tag(PartTag::Stem);
            tentacle.set_position(Vec3::new(
                0.6 * (TAU * frac).cos(),
                1.0,
                0.6 * (TAU * frac).sin(),
            ));
            tentacle.set_pivot(Vec3::new(0.0, -0.25, 0.0));
            tentacle.orbit(angle_axis(
                TAU / 16.0,
                Vec3::new((TAU * frac).cos(), 0.0, (TAU * frac).sin()),
            ));
            let key = anemone.add_node(tentacle);
            anemone.link_child(middle_key, key)?;
        }

        Ok(anemone)
    }

    /// Branching coral made of stacked stems with sphere tips
    pub fn coral(&self, name: &str, position: Vec3) -> Result<GameObject, SceneError> {
        let mut coral = GameObject::new(name, ObjectKind::Coral);

        let mut trunk = self.instance("Trunk", "FatStem", "ObjectMaterial", CollisionState::None)?;
        trunk.set_position(position);
        trunk.set_tag(PartTag::Stem);
        let trunk_key = coral.add_node(trunk);
        coral.set_root(trunk_key);

        for i in 0..4 {
            let frac = i as f32 / 4.0;
            let mut branch =
                self.instance("Branch", "Branch", "ObjectMaterial", CollisionState::None)?;
            branch.set_tag(PartTag::Stem);
            branch.set_position(Vec3::new(0.0, 1.0 + i as f32 * 0.5, 0.0));
            branch.set_pivot(Vec3::new(0.0, -1.5, 0.0));
            branch.orbit(angle_axis(
                TAU / 10.0,
                Vec3::new((TAU * frac).cos(), 0.0, (TAU * frac).sin()),
            ));
            let branch_key = coral.add_node(branch);
            coral.link_child(trunk_key, branch_key)?;

            let mut tip = self.instance("Tip", "Tip", "ObjectMaterial", CollisionState::None)?;
            tip.set_position(Vec3::new(0.0, 1.5, 0.0));
            let tip_key = coral.add_node(tip);
            coral.link_child(branch_key, tip_key)?;
        }

        Ok(coral)
    }

    /// A single seaweed stalk: a chain of short segments swaying from the base
    pub fn seaweed(
        &self,
        name: &str,
        segments: usize,
        position: Vec3,
    ) -> Result<GameObject, SceneError> {
        let mut seaweed = GameObject::new(name, ObjectKind::Seaweed);

        let mut base = self.instance(
            "Root",
            "LowPolyCylinder",
            "KelpMaterial",
            CollisionState::None,
        )?;
        base.set_position(position);
        base.set_pivot(Vec3::new(0.0, -0.5, 0.0));
        base.set_tag(PartTag::Stem);
        let mut parent = seaweed.add_node(base);
        seaweed.set_root(parent);

        for _ in 0..segments {
            let mut segment = self.instance(
                "Segment",
                "LowPolyCylinder",
                "KelpMaterial",
                CollisionState::None,
            )?;
            segment.set_tag(PartTag::Stem);
            segment.set_position(Vec3::new(0.0, 1.0, 0.0));
            segment.set_pivot(Vec3::new(0.0, -0.5, 0.0));
            let key = seaweed.add_node(segment);
            seaweed.link_child(parent, key)?;
            parent = key;
        }

        Ok(seaweed)
    }

    /// Scatter seaweed stalks over a rectangle around `center`
    ///
    /// `density` is the number of stalks; placement comes from the caller's
    /// seeded generator so the patch is reproducible.
    pub fn seaweed_patch(
        &self,
        rng: &mut impl Rng,
        density: usize,
        width: f32,
        depth: f32,
        center: Vec3,
    ) -> Result<Vec<GameObject>, SceneError> {
        let mut patch = Vec::with_capacity(density);
        for i in 0..density {
            let x = center.x + rng.gen_range(-width / 2.0..width / 2.0);
            let z = center.z + rng.gen_range(-depth / 2.0..depth / 2.0);
            let segments = rng.gen_range(2..=4);
            patch.push(self.seaweed(
                &format!("Seaweed{i}"),
                segments,
                Vec3::new(x, center.y, z),
            )?);
        }
        Ok(patch)
    }

    /// Inert rock
    pub fn rock(&self, name: &str, position: Vec3, scale: f32) -> Result<GameObject, SceneError> {
        let mut rock = GameObject::new(name, ObjectKind::Rock);
        let mut body = self.instance("Body", "Sphere", "ObjectMaterial", CollisionState::None)?;
        body.set_position(position);
        body.set_scale(Vec3::new(scale, scale * 0.7, scale));
        let key = rock.add_node(body);
        rock.set_root(key);
        Ok(rock)
    }

    /// Hydrothermal vent chimney (solid, harmless)
    pub fn vent_base(&self, name: &str, position: Vec3) -> Result<GameObject, SceneError> {
        let mut base = GameObject::new(name, ObjectKind::VentBase);
        let mut chimney =
            self.instance("Chimney", "StalagmiteBase", "ObjectMaterial", CollisionState::None)?;
        chimney.set_position(position);
        chimney.set_scale(Vec3::new(0.8, 1.5, 0.8));
        chimney.set_tag(PartTag::Stem);
        let key = base.add_node(chimney);
        base.set_root(key);
        Ok(base)
    }

    /// Hydrothermal vent stream rising from a chimney; hurts while overlapped
    pub fn vent(&self, name: &str, position: Vec3) -> Result<GameObject, SceneError> {
        let mut vent = GameObject::new(name, ObjectKind::Vent);
        let mut stream = self.instance(
            "Stream",
            "Cylinder",
            "ObjectMaterial",
            CollisionState::Collidable,
        )?;
        stream.set_position(position);
        stream.set_scale(Vec3::new(0.5, 4.0, 0.5));
        stream.set_tag(PartTag::Particle);
        stream.set_radius(1.5);
        let key = vent.add_node(stream);
        vent.set_root(key);
        Ok(vent)
    }

    /// The light source, drawn as a bright sphere
    pub fn sun(&self, position: Vec3) -> Result<GameObject, SceneError> {
        let mut sun = GameObject::new("Sun", ObjectKind::None);
        let mut body = self.instance("Sphere", "Sphere", "ObjectMaterial", CollisionState::None)?;
        body.set_position(position);
        body.set_scale(Vec3::new(5.0, 5.0, 5.0));
        let key = sun.add_node(body);
        sun.set_root(key);
        Ok(sun)
    }

    /// The sandy floor mesh
    pub fn floor_plane(&self) -> Result<GameObject, SceneError> {
        let mut plane = GameObject::new("Plane", ObjectKind::None);
        let mesh = self.instance("Plane", "Plane", "NormalMapMaterial", CollisionState::None)?;
        let key = plane.add_node(mesh);
        plane.set_root(key);
        Ok(plane)
    }

    /// The boundary wall mesh ringing the playable area
    pub fn boundary(&self) -> Result<GameObject, SceneError> {
        let mut boundary = GameObject::new("Boundary", ObjectKind::None);
        let mesh =
            self.instance("Boundary", "Boundary", "NormalMapMaterial", CollisionState::None)?;
        let key = boundary.add_node(mesh);
        boundary.set_root(key);
        Ok(boundary)
    }
}
