//! Common components used across multiple entity types.

use serde::{Deserialize, Serialize};

pub use squalor_logic::geometry::Vec3;

/// World placement of a spawned entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Facing: surface normal for props, heading for creatures.
    pub forward: Vec3,
    /// Rotation about `forward`, in degrees.
    pub roll_degrees: f32,
    pub scale: f32,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            forward: Vec3::new(0.0, 0.0, 1.0),
            roll_degrees: 0.0,
            scale: 1.0,
        }
    }

    pub fn facing(mut self, forward: Vec3) -> Self {
        self.forward = forward;
        self
    }

    pub fn rolled(mut self, degrees: f32) -> Self {
        self.roll_degrees = degrees;
        self
    }

    pub fn scaled(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

/// Marker: spawned by interior dressing, removed on unload.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dressing;

/// Hit points, rolled at spawn for the host's combat system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }
}
