//! Dressing configuration: every tunable threshold, draw range and
//! clearance in one serializable value.
//!
//! `DressingConfig::default()` reproduces the stock behaviour. Hosts can load
//! a partial JSON override; missing fields keep their defaults, and the
//! result is validated before use.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::archetypes::ArchetypeTable;
use crate::context::BuildingType;
use crate::counts::BiasedCount;
use crate::creature::CreatureProfile;
use crate::wander::WanderParams;

/// Why a configuration was rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Inclusive-exclusive float range `[min, max)` for randomized sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: f32,
    pub max: f32,
}

impl SizeRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }
}

/// Interior point sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Range of the wall-finding cast from the room center.
    pub probe_range: f32,
    /// Keep this far off the wall that was hit.
    pub wall_clearance: f32,
    /// Lift for objects with no known height.
    pub floor_clearance: f32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            probe_range: 50.0,
            wall_clearance: 0.15,
            floor_clearance: 0.02,
        }
    }
}

/// Food bits: crumbs in rooms big enough to eat in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodConfig {
    pub max_quality: u8,
    pub min_area: f32,
    pub count: BiasedCount,
    pub size: SizeRange,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            max_quality: 8,
            min_area: 15.0,
            count: BiasedCount::new(-2, 9),
            size: SizeRange::new(0.08, 0.12),
        }
    }
}

/// Floor stains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StainConfig {
    pub count: BiasedCount,
    pub size: SizeRange,
    /// Height above the sampled point from which the floor is re-found.
    pub reground_height: f32,
    /// Offset along the facing so the decal sits just off the surface.
    pub surface_offset: f32,
}

impl Default for StainConfig {
    fn default() -> Self {
        Self {
            count: BiasedCount::new(-4, 10),
            size: SizeRange::new(0.4, 0.8),
            reground_height: 0.5,
            surface_offset: 0.01,
        }
    }
}

/// Waste: small neglected rooms, out of the proprietor's sight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WasteConfig {
    pub max_area: f32,
    /// Rooms smaller than this are closets and get `closet_count`.
    pub closet_area: f32,
    pub count: BiasedCount,
    pub closet_count: BiasedCount,
    pub proprietor_eye_height: f32,
    /// Height above the floor at which a candidate is sighted.
    pub sight_height: f32,
    pub sight_range: f32,
}

impl Default for WasteConfig {
    fn default() -> Self {
        Self {
            max_area: 70.0,
            closet_area: 10.0,
            count: BiasedCount::new(-5, 5),
            closet_count: BiasedCount::new(-3, 7),
            proprietor_eye_height: 1.0,
            sight_height: 2.0,
            sight_range: 30.0,
        }
    }
}

/// Skeletons in the closet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkeletonConfig {
    pub max_quality: u8,
    pub max_area: f32,
    pub min_dimension: f32,
    /// One qualifying room in this many gets a skeleton.
    pub hash_modulus: u32,
}

impl Default for SkeletonConfig {
    fn default() -> Self {
        Self {
            max_quality: 4,
            max_area: 6.5,
            min_dimension: 1.0,
            hash_modulus: 12,
        }
    }
}

/// Ambient creatures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatureConfig {
    pub min_area: f32,
    pub count: BiasedCount,
    /// Size draw is `[quality - large_offset, large_high)`; negative ⇒ large.
    pub large_offset: i32,
    pub large_high: i32,
    /// Extra lift above the floor clearance at spawn.
    pub spawn_lift: f32,
    pub profile: CreatureProfile,
}

impl Default for CreatureConfig {
    fn default() -> Self {
        Self {
            min_area: 10.0,
            count: BiasedCount::new(-5, 6),
            large_offset: 3,
            large_high: 10,
            spawn_lift: 0.1,
            profile: CreatureProfile::default(),
        }
    }
}

/// Complete dressing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DressingConfig {
    /// Above this quality nothing is placed at all.
    pub max_quality: u8,
    /// Building types that get dressed.
    pub buildings: Vec<BuildingType>,
    pub sampling: SamplingConfig,
    pub food: FoodConfig,
    pub stains: StainConfig,
    pub waste: WasteConfig,
    pub skeleton: SkeletonConfig,
    pub creatures: CreatureConfig,
    pub wander: WanderParams,
    pub archetypes: ArchetypeTable,
}

impl Default for DressingConfig {
    fn default() -> Self {
        Self {
            max_quality: 6,
            buildings: BuildingType::RESIDENCES.to_vec(),
            sampling: SamplingConfig::default(),
            food: FoodConfig::default(),
            stains: StainConfig::default(),
            waste: WasteConfig::default(),
            skeleton: SkeletonConfig::default(),
            creatures: CreatureConfig::default(),
            wander: WanderParams::default(),
            archetypes: ArchetypeTable::default(),
        }
    }
}

impl DressingConfig {
    /// Parse a (possibly partial) JSON override and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn allows(&self, building: BuildingType) -> bool {
        self.buildings.contains(&building)
    }

    /// Reject ranges and thresholds that would make placement meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_count("food.count", &self.food.count)?;
        check_count("stains.count", &self.stains.count)?;
        check_count("waste.count", &self.waste.count)?;
        check_count("waste.closet_count", &self.waste.closet_count)?;
        check_count("creatures.count", &self.creatures.count)?;

        check_size("food.size", &self.food.size)?;
        check_size("stains.size", &self.stains.size)?;

        check_non_negative("sampling.probe_range", self.sampling.probe_range)?;
        check_non_negative("sampling.wall_clearance", self.sampling.wall_clearance)?;
        check_non_negative("sampling.floor_clearance", self.sampling.floor_clearance)?;
        check_non_negative("waste.sight_range", self.waste.sight_range)?;
        check_non_negative("creatures.spawn_lift", self.creatures.spawn_lift)?;
        check_non_negative("creatures.profile.speed", self.creatures.profile.speed)?;
        check_non_negative("creatures.profile.radius_per_tier", self.creatures.profile.radius_per_tier)?;

        if self.skeleton.hash_modulus == 0 {
            return Err(invalid("skeleton.hash_modulus", "must be at least 1"));
        }

        let wander = &self.wander;
        if !(0.0..=1.0).contains(&wander.visit_chance) {
            return Err(invalid(
                "wander.visit_chance",
                format!("{} is not a probability", wander.visit_chance),
            ));
        }
        if wander.pause_min > wander.pause_max {
            return Err(invalid(
                "wander.pause_min",
                format!("{} exceeds pause_max {}", wander.pause_min, wander.pause_max),
            ));
        }
        if wander.min_visit_distance >= wander.max_visit_radius {
            return Err(invalid(
                "wander.min_visit_distance",
                "must be below max_visit_radius",
            ));
        }
        check_non_negative("wander.explore_offset", wander.explore_offset)?;
        check_non_negative("wander.stuck_timeout", wander.stuck_timeout)?;
        check_non_negative("wander.max_turn_degrees", wander.max_turn_degrees)?;

        if self.buildings.is_empty() {
            log::warn!("dressing config allows no building types; nothing will be dressed");
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn check_count(field: &'static str, count: &BiasedCount) -> Result<(), ConfigError> {
    if count.range.low > count.range.high {
        return Err(invalid(
            field,
            format!("draw range [{}, {}) is inverted", count.range.low, count.range.high),
        ));
    }
    Ok(())
}

fn check_size(field: &'static str, size: &SizeRange) -> Result<(), ConfigError> {
    if !size.min.is_finite() || !size.max.is_finite() || size.min < 0.0 || size.min > size.max {
        return Err(invalid(
            field,
            format!("size range [{}, {}) is not a valid non-negative range", size.min, size.max),
        ));
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(field, format!("{} must be finite and non-negative", value)));
    }
    Ok(())
}
