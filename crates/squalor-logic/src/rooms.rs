//! Room inference from doorway probes.
//!
//! Algorithm: "three-ray box fit"
//! 1. Step just inside the doorway, climb to the ceiling, drop a little
//!    (keeps the probes above furniture)
//! 2. Cast forward to the far wall
//! 3. From the forward midpoint, cast sideways to one wall
//! 4. From that wall, cast back across to the opposite wall
//! 5. The box is centered between the two side walls, halfway down the room
//!
//! Irregular or L-shaped rooms come out too big or too small; that is the
//! accepted cost of having no floor plan.

use serde::{Deserialize, Serialize};

use crate::context::Doorway;
use crate::geometry::Vec3;
use crate::probe::{self, CollisionWorld};

/// How far past the door plane the probe starts.
pub const DOOR_STEP_IN: f32 = 0.45;
/// How far below the ceiling the horizontal probes run.
pub const CEILING_DROP: f32 = 0.2;
/// Longest wall-finding cast.
pub const MAX_PROBE_RANGE: f32 = 100.0;
/// Fixed height given to every inferred room.
pub const ROOM_HEIGHT: f32 = 2.0;

/// Estimated axis-aligned room volume: center plus full size.
///
/// `size.x` runs away from the door that found the room, `size.z` across it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomBounds {
    pub center: Vec3,
    pub size: Vec3,
}

impl RoomBounds {
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self { center, size }
    }

    /// Result of a probe that found no bounding surface.
    pub fn degenerate() -> Self {
        Self::default()
    }

    /// Floor area (depth × width).
    pub fn area(&self) -> f32 {
        self.size.x * self.size.z
    }

    /// Any zero extent means the probe failed.
    pub fn is_degenerate(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0 || self.size.z <= 0.0
    }

    pub fn min_floor_dimension(&self) -> f32 {
        self.size.x.min(self.size.z)
    }
}

/// An inferred room and how many doorways led into it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub bounds: RoomBounds,
    pub door_count: u32,
}

impl Room {
    pub fn new(bounds: RoomBounds) -> Self {
        Self {
            bounds,
            door_count: 1,
        }
    }

    pub fn area(&self) -> f32 {
        self.bounds.area()
    }
}

/// Guess the bounds of the room on the `door_direction` side of a doorway.
pub fn estimate_bounds<W: CollisionWorld + ?Sized>(
    world: &W,
    door_position: Vec3,
    door_direction: Vec3,
) -> RoomBounds {
    let forward = door_direction.horizontal().normalize();
    if forward == Vec3::ZERO {
        return RoomBounds::degenerate();
    }

    let start = door_position + forward * DOOR_STEP_IN;
    let start = probe::find_ceiling(world, start) + Vec3::DOWN * CEILING_DROP;

    let Some(forward_distance) = probe::cast_distance(world, start, forward, MAX_PROBE_RANGE) else {
        return RoomBounds::degenerate();
    };
    let center_forward = start + forward * (forward_distance / 2.0);

    let across = forward.cross(&Vec3::UP).normalize();

    let Some(side_hit) = world.raycast(center_forward, across, MAX_PROBE_RANGE) else {
        return RoomBounds::degenerate();
    };
    let side = side_hit.point;

    let Some(across_distance) = probe::cast_distance(world, side, -across, MAX_PROBE_RANGE) else {
        return RoomBounds::degenerate();
    };

    RoomBounds::new(
        side - across * (across_distance / 2.0),
        Vec3::new(forward_distance, ROOM_HEIGHT, across_distance),
    )
}

/// Probe both sides of every doorway and merge probes that see each other.
///
/// Two probes are the same room when an unobstructed line joins their
/// centers. That is not transitive in concave spaces and can merge rooms
/// whose centers line up through an open doorway; the first room found keeps
/// its bounds.
pub fn gather_rooms<W: CollisionWorld + ?Sized>(world: &W, doors: &[Doorway]) -> Vec<Room> {
    let mut rooms: Vec<Room> = Vec::new();

    for door in doors {
        for direction in [door.facing, -door.facing] {
            let bounds = estimate_bounds(world, door.position, direction);
            if bounds.is_degenerate() {
                continue;
            }

            let existing = rooms
                .iter_mut()
                .find(|room| probe::visible(world, room.bounds.center, bounds.center));

            match existing {
                Some(room) => room.door_count += 1,
                None => rooms.push(Room::new(bounds)),
            }
        }
    }

    log::debug!("inferred {} rooms from {} doorways", rooms.len(), doors.len());
    rooms
}
