//! Ambient creature wandering.
//!
//! One tick of a small per-creature state machine:
//!
//! ```text
//!   hostile ──────────────────────────────► Interrupted (destination cleared)
//!   now < pause_until ────────────────────► Paused
//!   no destination ───────────────────────► ChoosingDestination
//!   otherwise ────────────────────────────► Moving
//! ```
//!
//! Choosing prefers nearby points of interest (first qualifying point in
//! supplied order wins) and falls back to a short random hop. Every
//! candidate must be reachable in a straight line at roughly the same height.

use std::f32::consts::PI;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::Vec3;
use crate::probe::CollisionWorld;

/// Gap left between a moving creature and whatever stopped it.
const CONTACT_SKIN: f32 = 0.01;

/// Where the state machine ended up on the last tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WanderState {
    #[default]
    Paused,
    ChoosingDestination,
    Moving,
    Interrupted,
}

/// Tunables shared by every wandering creature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderParams {
    /// Candidates closer than this are not worth the trip.
    pub min_visit_distance: f32,
    /// Points of interest farther than this are ignored.
    pub max_visit_radius: f32,
    /// Chance (0..=1) that a qualifying point of interest is picked.
    pub visit_chance: f64,
    /// Half-width of the square an exploring hop is drawn from.
    pub explore_offset: f32,
    /// Allowed height difference beyond the creature's radius.
    pub height_tolerance: f32,
    /// Ground must be within radius + this below a candidate.
    pub ledge_tolerance: f32,
    /// Arrival distance beyond the creature's radius.
    pub arrival_margin: f32,
    /// Sweep radius beyond the creature's radius.
    pub sweep_margin: f32,
    pub pause_min: f32,
    pub pause_max: f32,
    /// Seconds after a choice before an unfinished trip is abandoned.
    pub stuck_timeout: f32,
    pub max_turn_degrees: f32,
    /// Facing error that does not warrant turning.
    pub yaw_tolerance_degrees: f32,
}

impl Default for WanderParams {
    fn default() -> Self {
        Self {
            min_visit_distance: 0.3,
            max_visit_radius: 6.0,
            visit_chance: 0.13,
            explore_offset: 2.0,
            height_tolerance: 0.05,
            ledge_tolerance: 0.05,
            arrival_margin: 0.03,
            sweep_margin: 0.03,
            pause_min: 0.0,
            pause_max: 4.0,
            stuck_timeout: 6.0,
            max_turn_degrees: 20.0,
            yaw_tolerance_degrees: 5.625,
        }
    }
}

/// The creature's physical state as seen by the wander logic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mover {
    pub position: Vec3,
    /// Horizontal unit facing.
    pub forward: Vec3,
    pub radius: f32,
    pub speed: f32,
}

/// Inputs for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WanderTick {
    /// Simulation clock in seconds.
    pub now: f64,
    /// Seconds since the previous tick.
    pub delta: f32,
    /// External aggression flag.
    pub hostile: bool,
}

/// Per-creature wandering controller.
#[derive(Debug, Clone)]
pub struct WanderBehavior {
    pub destination: Option<Vec3>,
    points_of_interest: Arc<[Vec3]>,
    pub pause_until: f64,
    pub last_choice_time: f64,
    state: WanderState,
}

impl WanderBehavior {
    pub fn new(points_of_interest: Arc<[Vec3]>) -> Self {
        Self {
            destination: None,
            points_of_interest,
            pause_until: 0.0,
            last_choice_time: 0.0,
            state: WanderState::Paused,
        }
    }

    pub fn state(&self) -> WanderState {
        self.state
    }

    pub fn points_of_interest(&self) -> &[Vec3] {
        &self.points_of_interest
    }

    /// Advance the state machine by one tick.
    pub fn tick<W, R>(
        &mut self,
        mover: &mut Mover,
        world: &W,
        params: &WanderParams,
        tick: WanderTick,
        rng: &mut R,
    ) -> WanderState
    where
        W: CollisionWorld + ?Sized,
        R: Rng + ?Sized,
    {
        self.state = if tick.hostile {
            self.destination = None;
            WanderState::Interrupted
        } else if tick.now < self.pause_until {
            WanderState::Paused
        } else if self.destination.is_none() {
            self.choose_destination(mover, world, params, tick.now, rng);
            WanderState::ChoosingDestination
        } else {
            self.advance(mover, world, params, tick, rng);
            WanderState::Moving
        };
        self.state
    }

    fn choose_destination<W, R>(
        &mut self,
        mover: &Mover,
        world: &W,
        params: &WanderParams,
        now: f64,
        rng: &mut R,
    ) where
        W: CollisionWorld + ?Sized,
        R: Rng + ?Sized,
    {
        self.last_choice_time = now;

        let chance = params.visit_chance.clamp(0.0, 1.0);
        let visit = self.points_of_interest.iter().copied().find(|point| {
            let distance = mover.position.horizontal_distance(point);
            distance > params.min_visit_distance
                && distance < params.max_visit_radius
                && rng.gen_bool(chance)
                && can_reach(mover, world, params, *point)
        });

        if visit.is_some() {
            self.destination = visit;
            return;
        }

        // Nothing interesting nearby, just explore
        if params.explore_offset <= 0.0 {
            return;
        }
        let offset = params.explore_offset;
        let hop = Vec3::new(
            mover.position.x + rng.gen_range(-offset..offset),
            mover.position.y,
            mover.position.z + rng.gen_range(-offset..offset),
        );
        let distance = mover.position.horizontal_distance(&hop);
        if distance > params.min_visit_distance && can_reach(mover, world, params, hop) {
            self.destination = Some(hop);
        }
    }

    fn advance<W, R>(
        &mut self,
        mover: &mut Mover,
        world: &W,
        params: &WanderParams,
        tick: WanderTick,
        rng: &mut R,
    ) where
        W: CollisionWorld + ?Sized,
        R: Rng + ?Sized,
    {
        let Some(destination) = self.destination else {
            return;
        };

        if mover.position.horizontal_distance(&destination) <= mover.radius + params.arrival_margin {
            self.destination = None;
            self.pause_until = tick.now + pause_duration(params, rng) as f64;
            return;
        }

        let direction = (destination - mover.position).horizontal().normalize();
        mover.forward = rotate_towards(
            mover.forward,
            direction,
            params.max_turn_degrees.to_radians(),
            params.yaw_tolerance_degrees.to_radians(),
        );
        let step = mover.speed * tick.delta;
        step_forward(mover, world, step);

        if tick.now > self.last_choice_time + params.stuck_timeout as f64 {
            self.destination = None;
        }
    }
}

/// Move along the facing, stopping short of anything solid.
fn step_forward<W: CollisionWorld + ?Sized>(mover: &mut Mover, world: &W, step: f32) {
    if step <= 0.0 {
        return;
    }
    let travel = match world.sphere_cast(mover.position, mover.radius, mover.forward, step) {
        Some(hit) => (hit.distance - CONTACT_SKIN).max(0.0),
        None => step,
    };
    mover.position += mover.forward * travel;
}

fn pause_duration<R: Rng + ?Sized>(params: &WanderParams, rng: &mut R) -> f32 {
    if params.pause_max > params.pause_min {
        rng.gen_range(params.pause_min..params.pause_max)
    } else {
        params.pause_min.max(0.0)
    }
}

/// Can the creature get to `location` in one straight, level move?
pub fn can_reach<W: CollisionWorld + ?Sized>(
    mover: &Mover,
    world: &W,
    params: &WanderParams,
    location: Vec3,
) -> bool {
    // Stairs and other height changes
    if (mover.position.y - location.y).abs() > mover.radius + params.height_tolerance {
        return false;
    }

    let level = location.with_y(mover.position.y);

    // Ledges: there must be floor right under the candidate
    if world
        .raycast(level, Vec3::DOWN, mover.radius + params.ledge_tolerance)
        .is_none()
    {
        return false;
    }

    let path = level - mover.position;
    let distance = path.length();
    if distance <= 0.0 {
        return true;
    }

    world
        .sphere_cast(
            mover.position,
            mover.radius + params.sweep_margin,
            path.normalize(),
            distance,
        )
        .is_none()
}

/// Turn a horizontal facing toward `target` by at most `max_step` radians.
/// Errors within `tolerance` leave the facing alone.
pub fn rotate_towards(forward: Vec3, target: Vec3, max_step: f32, tolerance: f32) -> Vec3 {
    let current = forward.horizontal().normalize();
    let target = target.horizontal().normalize();
    if target == Vec3::ZERO {
        return current;
    }
    if current == Vec3::ZERO {
        return target;
    }

    let heading = current.z.atan2(current.x);
    let mut delta = target.z.atan2(target.x) - heading;
    while delta > PI {
        delta -= 2.0 * PI;
    }
    while delta < -PI {
        delta += 2.0 * PI;
    }

    if delta.abs() <= tolerance {
        return current;
    }

    let turned = heading + delta.clamp(-max_step, max_step);
    Vec3::new(turned.cos(), 0.0, turned.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colliders::BoxWorld;
    use crate::geometry::Aabb;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DT: f32 = 1.0 / 60.0;

    fn open_floor() -> BoxWorld {
        BoxWorld::new().with_enclosure(
            Aabb::new(Vec3::new(-10.0, 0.0, -10.0), Vec3::new(10.0, 3.0, 10.0)),
            0.2,
        )
    }

    fn rat_at(position: Vec3) -> Mover {
        Mover {
            position,
            forward: Vec3::new(1.0, 0.0, 0.0),
            radius: 0.1,
            speed: 2.5,
        }
    }

    fn calm(now: f64) -> WanderTick {
        WanderTick {
            now,
            delta: DT,
            hostile: false,
        }
    }

    #[test]
    fn test_hostile_interrupts_and_clears_destination() {
        let world = open_floor();
        let params = WanderParams::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut mover = rat_at(Vec3::new(0.0, 0.12, 0.0));
        let mut wander = WanderBehavior::new(Arc::from(Vec::new()));
        wander.destination = Some(Vec3::new(2.0, 0.12, 0.0));

        let tick = WanderTick { hostile: true, ..calm(1.0) };
        let before = mover.position;
        assert_eq!(wander.tick(&mut mover, &world, &params, tick, &mut rng), WanderState::Interrupted);
        assert!(wander.destination.is_none());
        assert_eq!(mover.position, before);
    }

    #[test]
    fn test_paused_until_timer_elapses() {
        let world = open_floor();
        let params = WanderParams::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut mover = rat_at(Vec3::new(0.0, 0.12, 0.0));
        let mut wander = WanderBehavior::new(Arc::from(Vec::new()));
        wander.pause_until = 5.0;

        assert_eq!(wander.tick(&mut mover, &world, &params, calm(4.9), &mut rng), WanderState::Paused);
        assert!(wander.destination.is_none());
        assert_eq!(
            wander.tick(&mut mover, &world, &params, calm(5.0), &mut rng),
            WanderState::ChoosingDestination
        );
        assert_eq!(wander.last_choice_time, 5.0);
    }

    #[test]
    fn test_points_of_interest_respect_distance_window() {
        let world = open_floor();
        let params = WanderParams {
            visit_chance: 1.0,
            explore_offset: 0.0,
            ..WanderParams::default()
        };
        let origin = Vec3::new(0.0, 0.12, 0.0);
        let pois: Arc<[Vec3]> = Arc::from(vec![
            Vec3::new(0.2, 0.12, 0.0),
            Vec3::new(0.3, 0.12, 0.0),
            Vec3::new(0.0, 0.12, 6.0),
            Vec3::new(7.0, 0.12, 0.0),
            Vec3::new(-3.0, 0.12, 1.0),
        ]);
        let mut rng = StdRng::seed_from_u64(5);
        let mut mover = rat_at(origin);
        let mut wander = WanderBehavior::new(pois);

        wander.tick(&mut mover, &world, &params, calm(0.0), &mut rng);
        assert_eq!(wander.destination, Some(Vec3::new(-3.0, 0.12, 1.0)));
    }

    #[test]
    fn test_chosen_poi_distance_always_in_window() {
        let world = open_floor();
        let params = WanderParams {
            explore_offset: 0.0,
            ..WanderParams::default()
        };
        let mut rng = StdRng::seed_from_u64(77);
        let origin = Vec3::new(0.0, 0.12, 0.0);
        let pois: Vec<Vec3> = (0..40)
            .map(|i| {
                let a = i as f32 * 0.7;
                let r = (i % 9) as f32 * 0.9;
                Vec3::new(a.cos() * r, 0.12, a.sin() * r)
            })
            .collect();
        let pois: Arc<[Vec3]> = Arc::from(pois);

        for round in 0..300 {
            let mut mover = rat_at(origin);
            let mut wander = WanderBehavior::new(pois.clone());
            wander.tick(&mut mover, &world, &params, calm(round as f64), &mut rng);
            if let Some(dest) = wander.destination {
                let d = origin.horizontal_distance(&dest);
                assert!(d > params.min_visit_distance && d < params.max_visit_radius, "{}", d);
            }
        }
    }

    #[test]
    fn test_unreachable_across_height_drop() {
        let world = open_floor();
        let params = WanderParams::default();
        let mover = rat_at(Vec3::new(0.0, 0.12, 0.0));
        assert!(!can_reach(&mover, &world, &params, Vec3::new(2.0, 0.5, 0.0)));
        assert!(can_reach(&mover, &world, &params, Vec3::new(2.0, 0.12, 0.0)));
    }

    #[test]
    fn test_unreachable_over_ledge() {
        // Floor ends at x = 1
        let world = BoxWorld::new().with(Aabb::new(
            Vec3::new(-5.0, -1.0, -5.0),
            Vec3::new(1.0, 0.0, 5.0),
        ));
        let params = WanderParams::default();
        let mover = rat_at(Vec3::new(0.0, 0.12, 0.0));
        assert!(!can_reach(&mover, &world, &params, Vec3::new(2.0, 0.12, 0.0)));
        assert!(can_reach(&mover, &world, &params, Vec3::new(0.0, 0.12, 0.8)));
    }

    #[test]
    fn test_unreachable_through_obstacle() {
        let world = open_floor().with(Aabb::new(
            Vec3::new(1.0, 0.0, -0.5),
            Vec3::new(1.2, 1.0, 0.5),
        ));
        let params = WanderParams::default();
        let mover = rat_at(Vec3::new(0.0, 0.12, 0.0));
        assert!(!can_reach(&mover, &world, &params, Vec3::new(2.0, 0.12, 0.0)));
        assert!(can_reach(&mover, &world, &params, Vec3::new(0.0, 0.12, 2.0)));
    }

    #[test]
    fn test_moves_to_destination_then_pauses() {
        let world = open_floor();
        let params = WanderParams::default();
        let mut rng = StdRng::seed_from_u64(9);
        let mut mover = rat_at(Vec3::new(0.0, 0.12, 0.0));
        mover.forward = Vec3::new(0.0, 0.0, -1.0);
        let mut wander = WanderBehavior::new(Arc::from(Vec::new()));
        let target = Vec3::new(2.0, 0.12, 1.0);
        wander.destination = Some(target);

        let mut now = 0.0;
        let mut arrived = false;
        for _ in 0..240 {
            now += DT as f64;
            wander.tick(&mut mover, &world, &params, calm(now), &mut rng);
            if wander.destination.is_none() {
                arrived = true;
                break;
            }
        }

        assert!(arrived);
        assert!(mover.position.horizontal_distance(&target) <= mover.radius + params.arrival_margin + 0.05);
        assert!(wander.pause_until >= now);
        assert!(wander.pause_until < now + params.pause_max as f64);
    }

    #[test]
    fn test_movement_stops_short_of_walls() {
        let world = open_floor().with(Aabb::new(
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(1.2, 1.0, 1.0),
        ));
        let params = WanderParams::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut mover = rat_at(Vec3::new(0.0, 0.12, 0.0));
        let mut wander = WanderBehavior::new(Arc::from(Vec::new()));
        wander.destination = Some(Vec3::new(3.0, 0.12, 0.0));

        for frame in 1..=120 {
            wander.tick(&mut mover, &world, &params, calm(frame as f64 * DT as f64), &mut rng);
        }
        assert!(mover.position.x < 1.0 - mover.radius);
        assert!(mover.position.x > 0.8);
        assert!(wander.destination.is_some());
    }

    #[test]
    fn test_creature_touching_wall_cannot_pass_through() {
        // Two rooms sharing a solid wall at x in [4.0, 4.2]
        let world = BoxWorld::new()
            .with_enclosure(Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(8.2, 3.0, 5.0)), 0.2)
            .with(Aabb::new(Vec3::new(4.0, 0.0, 0.0), Vec3::new(4.2, 3.0, 5.0)));
        let params = WanderParams::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut mover = Mover {
            position: Vec3::new(3.85, 0.12, 2.5),
            forward: Vec3::new(1.0, 0.0, 0.0),
            radius: 0.2,
            speed: 2.0,
        };
        let beyond = Vec3::new(6.0, 0.12, 2.5);
        assert!(!can_reach(&mover, &world, &params, beyond));

        let mut wander = WanderBehavior::new(Arc::from(Vec::new()));
        wander.destination = Some(beyond);
        for frame in 1..=120 {
            wander.tick(&mut mover, &world, &params, calm(frame as f64 * DT as f64), &mut rng);
        }
        assert!(mover.position.x < 4.0, "walked through to x={}", mover.position.x);

        // Backing away from the wall is still allowed
        assert!(can_reach(&mover, &world, &params, Vec3::new(2.0, 0.12, 2.5)));
    }

    #[test]
    fn test_stuck_detection_abandons_trip() {
        let world = open_floor();
        let params = WanderParams::default();
        let mut rng = StdRng::seed_from_u64(9);
        let mut mover = rat_at(Vec3::new(0.0, 0.12, 0.0));
        mover.speed = 0.0;
        let mut wander = WanderBehavior::new(Arc::from(Vec::new()));
        wander.destination = Some(Vec3::new(3.0, 0.12, 0.0));
        wander.last_choice_time = 10.0;

        wander.tick(&mut mover, &world, &params, calm(15.0), &mut rng);
        assert!(wander.destination.is_some());
        assert_eq!(wander.tick(&mut mover, &world, &params, calm(16.5), &mut rng), WanderState::Moving);
        assert!(wander.destination.is_none());
    }

    #[test]
    fn test_rotate_towards_is_rate_limited() {
        let forward = Vec3::new(1.0, 0.0, 0.0);
        let target = Vec3::new(-1.0, 0.0, 0.001);
        let step = 20.0f32.to_radians();
        let turned = rotate_towards(forward, target, step, 0.0);
        let angle = forward.dot(&turned).clamp(-1.0, 1.0).acos();
        assert!((angle - step).abs() < 1e-4);
    }

    #[test]
    fn test_rotate_towards_within_tolerance_keeps_facing() {
        let forward = Vec3::new(1.0, 0.0, 0.0);
        let target = Vec3::new(1.0, 0.0, 0.05);
        let turned = rotate_towards(forward, target, 1.0, 5.625f32.to_radians());
        assert_eq!(turned, forward);
    }
}
