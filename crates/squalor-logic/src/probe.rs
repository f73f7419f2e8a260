//! Directional probes against static collision geometry.
//!
//! The host owns the collision world and exposes it through
//! [`CollisionWorld`]. Everything here is a read-only query; a miss is a
//! normal outcome and comes back as `None` (or the input point unchanged).

use crate::geometry::Vec3;

/// Maximum range for unbounded ground/ceiling probes.
pub const PROBE_RANGE: f32 = 1000.0;

/// Extra length added to line-of-sight casts so a surface sitting exactly on
/// the far endpoint still counts as an obstruction.
pub const VISIBILITY_EPSILON: f32 = 0.1;

/// First surface hit by a probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub distance: f32,
}

/// Read-only ray and swept-sphere queries against static geometry.
pub trait CollisionWorld {
    /// Cast a ray from `origin` along unit `direction`.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit>;

    /// Sweep a sphere of `radius` from `origin` along unit `direction`.
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<RayHit>;
}

impl<T: CollisionWorld + ?Sized> CollisionWorld for &T {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        (**self).raycast(origin, direction, max_distance)
    }

    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<RayHit> {
        (**self).sphere_cast(origin, radius, direction, max_distance)
    }
}

/// Surface directly below `point`, or `point` itself if nothing is there.
pub fn find_ground<W: CollisionWorld + ?Sized>(world: &W, point: Vec3) -> Vec3 {
    world
        .raycast(point, Vec3::DOWN, PROBE_RANGE)
        .map(|hit| hit.point)
        .unwrap_or(point)
}

/// Surface directly above `point`, or `point` itself if nothing is there.
pub fn find_ceiling<W: CollisionWorld + ?Sized>(world: &W, point: Vec3) -> Vec3 {
    world
        .raycast(point, Vec3::UP, PROBE_RANGE)
        .map(|hit| hit.point)
        .unwrap_or(point)
}

/// True when nothing obstructs the straight line from `from` to `to`.
pub fn visible<W: CollisionWorld + ?Sized>(world: &W, from: Vec3, to: Vec3) -> bool {
    let path = to - from;
    let direction = path.normalize();
    let distance = path.length() + VISIBILITY_EPSILON;

    world.raycast(from, direction, distance).is_none()
}

/// Distance to the first obstruction along `direction`, if any within range.
pub fn cast_distance<W: CollisionWorld + ?Sized>(
    world: &W,
    origin: Vec3,
    direction: Vec3,
    max_range: f32,
) -> Option<f32> {
    world
        .raycast(origin, direction.normalize(), max_range)
        .map(|hit| hit.distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colliders::BoxWorld;
    use crate::geometry::Aabb;

    fn floor_and_ceiling() -> BoxWorld {
        BoxWorld::new()
            .with(Aabb::new(Vec3::new(-10.0, -1.0, -10.0), Vec3::new(10.0, 0.0, 10.0)))
            .with(Aabb::new(Vec3::new(-10.0, 3.0, -10.0), Vec3::new(10.0, 4.0, 10.0)))
    }

    #[test]
    fn test_find_ground_and_ceiling() {
        let world = floor_and_ceiling();
        let p = Vec3::new(1.0, 1.5, 2.0);
        assert!((find_ground(&world, p).y - 0.0).abs() < 1e-5);
        assert!((find_ceiling(&world, p).y - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_find_ground_miss_returns_input() {
        let world = BoxWorld::new();
        let p = Vec3::new(1.0, 1.5, 2.0);
        assert_eq!(find_ground(&world, p), p);
        assert_eq!(find_ceiling(&world, p), p);
    }

    #[test]
    fn test_visible_blocked_by_wall() {
        let world = floor_and_ceiling()
            .with(Aabb::new(Vec3::new(2.0, 0.0, -10.0), Vec3::new(2.2, 3.0, 10.0)));
        let a = Vec3::new(0.0, 1.0, 0.0);
        let b = Vec3::new(4.0, 1.0, 0.0);
        let c = Vec3::new(0.0, 1.0, 4.0);
        assert!(!visible(&world, a, b));
        assert!(visible(&world, a, c));
    }

    #[test]
    fn test_cast_distance() {
        let world = floor_and_ceiling();
        let origin = Vec3::new(0.0, 2.0, 0.0);
        let d = cast_distance(&world, origin, Vec3::DOWN, 10.0);
        assert!((d.unwrap() - 2.0).abs() < 1e-5);
        assert!(cast_distance(&world, origin, Vec3::new(1.0, 0.0, 0.0), 10.0).is_none());
    }
}
