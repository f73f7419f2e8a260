//! Pure interior-dressing logic for Squalor.
//!
//! This crate contains all dressing logic that is independent of any engine
//! or runtime. Functions take plain data (collision geometry behind the
//! [`probe::CollisionWorld`] trait, an interior context, an RNG) and return
//! results, making them unit-testable and portable across hosts.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`archetypes`] | Prop kinds and the visuals/heights hosts instantiate |
//! | [`colliders`] | Axis-aligned box world implementing the probe trait |
//! | [`config`] | Serializable thresholds, draw ranges and validation |
//! | [`context`] | Building type, interior identity, location hash, seeding |
//! | [`counts`] | Quality-biased "draw until quality wins" counters |
//! | [`creature`] | Creature size tiers and derived stats |
//! | [`geometry`] | Y-up vectors and boxes |
//! | [`placement`] | Food bits, stains, waste, skeletons and creature spawns |
//! | [`probe`] | Collision queries: ground, ceiling, line of sight |
//! | [`rooms`] | Room inference from doorway ray probes |
//! | [`wander`] | Creature wander state machine and reachability checks |

pub mod archetypes;
pub mod colliders;
pub mod config;
pub mod context;
pub mod counts;
pub mod creature;
pub mod geometry;
pub mod placement;
pub mod probe;
pub mod rooms;
pub mod wander;
