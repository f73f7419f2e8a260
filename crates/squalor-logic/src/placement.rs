//! Clutter and creature placement planning.
//!
//! Everything here is pure: given collision geometry, the inferred rooms and
//! an RNG, produce a `DressingPlan` describing what should be spawned where.
//! The ECS layer turns the plan into entities.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::archetypes::{PropKind, Visual};
use crate::config::{DressingConfig, SamplingConfig, WasteConfig};
use crate::context::{Doorway, InteriorContext, InteriorIdentity};
use crate::creature::{roll_size, CreatureSize};
use crate::geometry::Vec3;
use crate::probe::{self, CollisionWorld};
use crate::rooms::{gather_rooms, Room};

/// Why an interior was left undressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gate {
    Open,
    QualityTooHigh,
    WrongBuildingType,
}

/// One prop to instantiate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropPlacement {
    pub kind: PropKind,
    pub position: Vec3,
    /// Surface normal the prop lies against.
    pub facing: Vec3,
    /// Rotation about the facing, in degrees.
    pub roll_degrees: f32,
    /// Width/height override for randomly sized props.
    pub size: Option<(f32, f32)>,
    pub scale: f32,
    pub visual: Visual,
}

/// One creature to spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreaturePlacement {
    pub position: Vec3,
    pub size: CreatureSize,
}

/// Everything one interior visit should spawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DressingPlan {
    pub gate: Gate,
    pub rooms: Vec<Room>,
    pub props: Vec<PropPlacement>,
    pub creatures: Vec<CreaturePlacement>,
    /// Food bit, stain and kept waste positions, shared by every creature's wander.
    pub points_of_interest: Arc<[Vec3]>,
}

impl DressingPlan {
    fn empty(gate: Gate, rooms: Vec<Room>) -> Self {
        Self {
            gate,
            rooms,
            props: Vec::new(),
            creatures: Vec::new(),
            points_of_interest: Arc::from(Vec::new()),
        }
    }

    pub fn count(&self, kind: PropKind) -> usize {
        self.props.iter().filter(|p| p.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty() && self.creatures.is_empty()
    }
}

/// Global checks applied before anything is placed.
pub fn gate(config: &DressingConfig, ctx: &InteriorContext) -> Gate {
    if ctx.quality > config.max_quality {
        Gate::QualityTooHigh
    } else if !config.allows(ctx.building_type) {
        Gate::WrongBuildingType
    } else {
        Gate::Open
    }
}

/// Infer rooms from the doorways, then plan the whole interior.
pub fn plan_interior<W, R>(
    world: &W,
    config: &DressingConfig,
    ctx: &InteriorContext,
    doors: &[Doorway],
    rng: &mut R,
) -> DressingPlan
where
    W: CollisionWorld + ?Sized,
    R: Rng + ?Sized,
{
    let rooms = gather_rooms(world, doors);
    plan_rooms(world, config, ctx, rooms, rng)
}

/// Plan clutter and creatures for already-inferred rooms.
pub fn plan_rooms<W, R>(
    world: &W,
    config: &DressingConfig,
    ctx: &InteriorContext,
    rooms: Vec<Room>,
    rng: &mut R,
) -> DressingPlan
where
    W: CollisionWorld + ?Sized,
    R: Rng + ?Sized,
{
    let gate = gate(config, ctx);
    if gate != Gate::Open {
        log::debug!(
            "{}: not dressing ({:?}, quality {}, {:?})",
            ctx.identity.name,
            gate,
            ctx.quality,
            ctx.building_type
        );
        return DressingPlan::empty(gate, rooms);
    }

    let quality = ctx.quality as i32;
    let mut props = Vec::new();
    let mut points_of_interest = Vec::new();

    for room in &rooms {
        for bit in plan_food_bits(world, config, room, quality, rng) {
            points_of_interest.push(bit.position);
            props.push(bit);
        }
        for stain in plan_stains(world, config, room, quality, rng) {
            points_of_interest.push(stain.position);
            props.push(stain);
        }
        for waste in plan_waste(world, config, room, quality, ctx.proprietor, rng) {
            points_of_interest.push(waste.position);
            props.push(waste);
        }
    }

    let creatures = plan_creatures(world, config, &rooms, quality, rng);

    props.extend(
        rooms
            .iter()
            .filter_map(|room| plan_skeleton(world, config, room, quality, &ctx.identity)),
    );

    log::info!(
        "{}: {} rooms, {} props, {} creatures, {} points of interest",
        ctx.identity.name,
        rooms.len(),
        props.len(),
        creatures.len(),
        points_of_interest.len()
    );

    DressingPlan {
        gate,
        rooms,
        props,
        creatures,
        points_of_interest: Arc::from(points_of_interest),
    }
}

/// Random floor point inside `room`, lifted by half of `height` (or by the
/// floor clearance when the height is unknown).
pub fn determine_item_location<W, R>(
    world: &W,
    sampling: &SamplingConfig,
    room: &Room,
    height: Option<f32>,
    rng: &mut R,
) -> Vec3
where
    W: CollisionWorld + ?Sized,
    R: Rng + ?Sized,
{
    let center = room.bounds.center;
    let direction = Vec3::new(rng.gen_range(-1.0..=1.0), 0.0, rng.gen_range(-1.0..=1.0)).normalize();

    let mut location = center;
    if direction != Vec3::ZERO {
        if let Some(distance) = probe::cast_distance(world, center, direction, sampling.probe_range) {
            let reach = distance - sampling.wall_clearance;
            if reach > 0.0 {
                location = center + direction * rng.gen_range(0.0..reach);
            }
        }
    }

    let lift = match height {
        Some(h) => h / 2.0,
        None => sampling.floor_clearance,
    };
    probe::find_ground(world, location) + Vec3::UP * lift
}

/// Crumbs in rooms large enough to eat in.
pub fn plan_food_bits<W, R>(
    world: &W,
    config: &DressingConfig,
    room: &Room,
    quality: i32,
    rng: &mut R,
) -> Vec<PropPlacement>
where
    W: CollisionWorld + ?Sized,
    R: Rng + ?Sized,
{
    let food = &config.food;
    if quality > food.max_quality as i32 || room.area() < food.min_area {
        return Vec::new();
    }

    let profile = config.archetypes.get(PropKind::FoodBit);
    let count = food.count.roll(quality, rng);
    (0..count)
        .map(|_| {
            let width = food.size.sample(rng);
            let height = food.size.sample(rng);
            let position = determine_item_location(world, &config.sampling, room, Some(height), rng);
            PropPlacement {
                kind: PropKind::FoodBit,
                position,
                facing: Vec3::UP,
                roll_degrees: 0.0,
                size: Some((width, height)),
                scale: profile.scale,
                visual: profile.visual.clone(),
            }
        })
        .collect()
}

/// Floor decals with random roll and size.
pub fn plan_stains<W, R>(
    world: &W,
    config: &DressingConfig,
    room: &Room,
    quality: i32,
    rng: &mut R,
) -> Vec<PropPlacement>
where
    W: CollisionWorld + ?Sized,
    R: Rng + ?Sized,
{
    let stains = &config.stains;
    let profile = config.archetypes.get(PropKind::Stain);
    let count = stains.count.roll(quality, rng);

    (0..count)
        .map(|_| {
            let sampled = determine_item_location(world, &config.sampling, room, None, rng);
            let facing = Vec3::UP;
            let surface = probe::find_ground(world, sampled + facing * stains.reground_height);
            let position = surface + facing * stains.surface_offset;
            let roll_degrees = rng.gen_range(0.0..359.0);
            let width = stains.size.sample(rng);
            let height = stains.size.sample(rng);
            PropPlacement {
                kind: PropKind::Stain,
                position,
                facing,
                roll_degrees,
                size: Some((width, height)),
                scale: profile.scale,
                visual: profile.visual.clone(),
            }
        })
        .collect()
}

/// Waste in small rooms, dropped wherever the proprietor could see it.
pub fn plan_waste<W, R>(
    world: &W,
    config: &DressingConfig,
    room: &Room,
    quality: i32,
    proprietor: Option<Vec3>,
    rng: &mut R,
) -> Vec<PropPlacement>
where
    W: CollisionWorld + ?Sized,
    R: Rng + ?Sized,
{
    let waste = &config.waste;
    let area = room.area();
    if area > waste.max_area {
        return Vec::new();
    }

    let count = if area < waste.closet_area {
        waste.closet_count.roll(quality, rng)
    } else {
        waste.count.roll(quality, rng)
    };

    let profile = config.archetypes.get(PropKind::Waste);
    let height = profile.scaled_height();
    let mut placed = Vec::new();
    for _ in 0..count {
        let position = determine_item_location(world, &config.sampling, room, Some(height), rng);
        if let Some(eye) = proprietor {
            if visible_to_proprietor(world, waste, eye, position) {
                log::trace!("waste at {:?} discarded, proprietor can see it", position);
                continue;
            }
        }
        placed.push(PropPlacement {
            kind: PropKind::Waste,
            position,
            facing: Vec3::UP,
            roll_degrees: 0.0,
            size: None,
            scale: profile.scale,
            visual: profile.visual.clone(),
        });
    }
    placed
}

/// Can the proprietor see a point raised above the floor under `position`?
pub fn visible_to_proprietor<W: CollisionWorld + ?Sized>(
    world: &W,
    waste: &WasteConfig,
    proprietor: Vec3,
    position: Vec3,
) -> bool {
    let eye = proprietor + Vec3::UP * waste.proprietor_eye_height;
    let target = probe::find_ground(world, position) + Vec3::UP * waste.sight_height;
    let path = target - eye;
    let range = path.length().min(waste.sight_range);
    world.raycast(eye, path.normalize(), range).is_none()
}

/// A skeleton in a small single-door room of a shabby building. Placement is
/// a pure function of the interior name and the room center, so a given
/// closet either always or never has one.
pub fn plan_skeleton<W: CollisionWorld + ?Sized>(
    world: &W,
    config: &DressingConfig,
    room: &Room,
    quality: i32,
    identity: &InteriorIdentity,
) -> Option<PropPlacement> {
    let skeleton = &config.skeleton;
    if quality > skeleton.max_quality as i32
        || room.area() > skeleton.max_area
        || room.door_count > 1
        || room.bounds.min_floor_dimension() < skeleton.min_dimension
    {
        return None;
    }

    let center = room.bounds.center;
    if identity.location_hash(center) % skeleton.hash_modulus != 0 {
        return None;
    }

    let profile = config.archetypes.get(PropKind::Skeleton);
    Some(PropPlacement {
        kind: PropKind::Skeleton,
        position: probe::find_ground(world, center) + Vec3::UP * (profile.scaled_height() / 2.0),
        facing: Vec3::UP,
        roll_degrees: 0.0,
        size: None,
        scale: profile.scale,
        visual: profile.visual.clone(),
    })
}

/// Ambient creatures for every room large enough to hold them.
pub fn plan_creatures<W, R>(
    world: &W,
    config: &DressingConfig,
    rooms: &[Room],
    quality: i32,
    rng: &mut R,
) -> Vec<CreaturePlacement>
where
    W: CollisionWorld + ?Sized,
    R: Rng + ?Sized,
{
    let creatures = &config.creatures;
    let mut placed = Vec::new();

    for room in rooms.iter().filter(|room| room.area() >= creatures.min_area) {
        let count = creatures.count.roll(quality, rng);
        for _ in 0..count {
            let position = determine_item_location(world, &config.sampling, room, None, rng)
                + Vec3::UP * creatures.spawn_lift;
            let size = roll_size(quality, creatures.large_offset, creatures.large_high, rng);
            placed.push(CreaturePlacement { position, size });
        }
    }
    placed
}
