//! Ambient creature sizing.
//!
//! Creatures come in size tiers 1..=3 (mouse-sized up to cat-sized). The tier
//! drives visual scale, collision radius, controller height and the small
//! health/damage numbers the host's combat system needs.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::counts::DrawRange;

/// Size tier, always within 1..=3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CreatureSize(u8);

impl CreatureSize {
    pub const SMALL: Self = Self(1);
    pub const LARGE: Self = Self(2);
    pub const HUGE: Self = Self(3);

    /// Out-of-range tiers are clamped.
    pub fn new(tier: u8) -> Self {
        Self(tier.clamp(1, 3))
    }

    pub fn tier(self) -> u8 {
        self.0
    }
}

impl Default for CreatureSize {
    fn default() -> Self {
        Self::SMALL
    }
}

/// Per-tier multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatureProfile {
    pub scale_per_tier: f32,
    pub height_per_tier: f32,
    pub radius_per_tier: f32,
    /// Units per second, the same for every tier.
    pub speed: f32,
}

impl Default for CreatureProfile {
    fn default() -> Self {
        Self {
            scale_per_tier: 0.2,
            height_per_tier: 0.65,
            radius_per_tier: 0.1,
            speed: 2.5,
        }
    }
}

/// Derived numbers for one creature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreatureStats {
    pub size: CreatureSize,
    pub scale: f32,
    pub height: f32,
    pub radius: f32,
    pub speed: f32,
    pub min_health: u32,
    pub max_health: u32,
    pub min_damage: u32,
    pub max_damage: u32,
}

impl CreatureProfile {
    pub fn stats(&self, size: CreatureSize) -> CreatureStats {
        let tier = size.tier();
        let t = tier as f32;
        CreatureStats {
            size,
            scale: self.scale_per_tier * t,
            height: self.height_per_tier * t,
            radius: self.radius_per_tier * t,
            speed: self.speed,
            min_health: tier as u32,
            max_health: tier as u32 * 2,
            min_damage: 1,
            max_damage: tier as u32,
        }
    }
}

/// Quality-biased size tier: a negative draw from `[quality - offset, high)`
/// gives a large creature, anything else a small one.
pub fn roll_size<R: Rng + ?Sized>(quality: i32, offset: i32, high: i32, rng: &mut R) -> CreatureSize {
    let range = DrawRange::new(quality - offset, high);
    match range.draw(rng) {
        Some(draw) if draw < 0 => CreatureSize::LARGE,
        _ => CreatureSize::SMALL,
    }
}
