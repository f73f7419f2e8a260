//! Wandering system - ticks every creature's wander state machine

use hecs::World;
use rand::Rng;
use squalor_logic::probe::CollisionWorld;
use squalor_logic::wander::{Mover, WanderBehavior, WanderParams, WanderState, WanderTick};

use crate::components::{Creature, Hostile, Transform};

/// How many creatures ended the tick in each state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WanderCounts {
    pub paused: usize,
    pub choosing: usize,
    pub moving: usize,
    pub interrupted: usize,
}

impl WanderCounts {
    pub fn total(&self) -> usize {
        self.paused + self.choosing + self.moving + self.interrupted
    }

    fn record(&mut self, state: WanderState) {
        match state {
            WanderState::Paused => self.paused += 1,
            WanderState::ChoosingDestination => self.choosing += 1,
            WanderState::Moving => self.moving += 1,
            WanderState::Interrupted => self.interrupted += 1,
        }
    }
}

/// Advance every wandering creature by one tick and write the result back
/// into its transform.
pub fn wandering_system<W: CollisionWorld + ?Sized>(
    world: &mut World,
    collision: &W,
    params: &WanderParams,
    now: f64,
    delta: f32,
    rng: &mut impl Rng,
) -> WanderCounts {
    let mut counts = WanderCounts::default();

    for (_, (transform, creature, wander, hostile)) in world.query_mut::<(
        &mut Transform,
        &Creature,
        &mut WanderBehavior,
        Option<&Hostile>,
    )>() {
        let mut mover = Mover {
            position: transform.position,
            forward: transform.forward,
            radius: creature.stats.radius,
            speed: creature.stats.speed,
        };
        let tick = WanderTick {
            now,
            delta,
            hostile: hostile.is_some(),
        };

        counts.record(wander.tick(&mut mover, collision, params, tick, rng));

        transform.position = mover.position;
        transform.forward = mover.forward;
    }

    counts
}
