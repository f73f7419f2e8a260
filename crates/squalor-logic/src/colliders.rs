//! Box-based static collision world.
//!
//! A minimal [`CollisionWorld`] made of axis-aligned boxes. Hosts with a real
//! physics scene implement the trait themselves; this one backs the tests and
//! the headless harness, and is handy for hosts whose interiors are built from
//! block geometry.

use serde::{Deserialize, Serialize};

use crate::geometry::{Aabb, Vec3};
use crate::probe::{CollisionWorld, RayHit};

/// Directions this close to parallel with a face slide along it.
const PUSH_EPSILON: f32 = 1e-4;

/// Static geometry made of solid boxes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoxWorld {
    boxes: Vec<Aabb>,
}

impl BoxWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, solid: Aabb) -> Self {
        self.boxes.push(solid);
        self
    }

    pub fn push(&mut self, solid: Aabb) {
        self.boxes.push(solid);
    }

    pub fn boxes(&self) -> &[Aabb] {
        &self.boxes
    }

    /// Add floor, ceiling and four walls of `thickness` around the open
    /// `interior` volume.
    pub fn with_enclosure(mut self, interior: Aabb, thickness: f32) -> Self {
        self.boxes.extend(enclosure(interior, thickness));
        self
    }

    fn first_entry(&self, origin: Vec3, direction: Vec3, max_distance: f32, pad: f32) -> Option<RayHit> {
        let direction = direction.normalize();
        if direction == Vec3::ZERO || max_distance <= 0.0 {
            return None;
        }

        self.boxes
            .iter()
            .filter_map(|solid| {
                if pad <= 0.0 {
                    return solid.ray_entry(origin, direction, max_distance);
                }
                let solid = solid.expand(pad);
                if solid.contains(&origin) {
                    // Already overlapping: blocked only when pushing further in
                    let pushing_in = direction.dot(&solid.nearest_face_normal(&origin)) < -PUSH_EPSILON;
                    return pushing_in.then_some(0.0);
                }
                solid.ray_entry(origin, direction, max_distance)
            })
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|distance| RayHit {
                point: origin + direction * distance,
                distance,
            })
    }
}

impl CollisionWorld for BoxWorld {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        self.first_entry(origin, direction, max_distance, 0.0)
    }

    // Boxes are inflated by the radius (square corners rather than rounded).
    // A sphere already overlapping a box hits it at distance 0 when moving
    // deeper through its nearest face, and slides free otherwise.
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<RayHit> {
        self.first_entry(origin, direction, max_distance, radius.max(0.0))
    }
}

/// Six slabs enclosing `interior`: floor, ceiling and four walls.
pub fn enclosure(interior: Aabb, thickness: f32) -> Vec<Aabb> {
    let t = thickness;
    let (lo, hi) = (interior.min, interior.max);

    vec![
        // floor
        Aabb::new(
            Vec3::new(lo.x - t, lo.y - t, lo.z - t),
            Vec3::new(hi.x + t, lo.y, hi.z + t),
        ),
        // ceiling
        Aabb::new(
            Vec3::new(lo.x - t, hi.y, lo.z - t),
            Vec3::new(hi.x + t, hi.y + t, hi.z + t),
        ),
        // -x / +x walls
        Aabb::new(
            Vec3::new(lo.x - t, lo.y, lo.z - t),
            Vec3::new(lo.x, hi.y, hi.z + t),
        ),
        Aabb::new(
            Vec3::new(hi.x, lo.y, lo.z - t),
            Vec3::new(hi.x + t, hi.y, hi.z + t),
        ),
        // -z / +z walls
        Aabb::new(
            Vec3::new(lo.x, lo.y, lo.z - t),
            Vec3::new(hi.x, hi.y, lo.z),
        ),
        Aabb::new(
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z + t),
        ),
    ]
}
