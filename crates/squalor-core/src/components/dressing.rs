//! Components for clutter props and ambient creatures.

use serde::{Deserialize, Serialize};
use squalor_logic::archetypes::{PropKind, Visual};
use squalor_logic::creature::CreatureStats;

/// A clutter prop: food bit, stain, waste or skeleton.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prop {
    pub kind: PropKind,
    pub visual: Visual,
    /// Width/height for randomly sized props; `None` uses the visual's own size.
    pub size: Option<(f32, f32)>,
}

/// An ambient creature and its derived size numbers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Creature {
    pub stats: CreatureStats,
}

/// Marker: the creature has turned on someone and stops wandering.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hostile;

/// What is left after a creature dies. Vanishes with the interior.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Corpse {
    pub stats: CreatureStats,
}
