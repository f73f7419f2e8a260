//! Errors surfaced by the dressing engine.

use hecs::Entity;
use squalor_logic::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DressingError {
    #[error("invalid dressing config: {0}")]
    Config(#[from] ConfigError),
    #[error("entity {0:?} no longer exists")]
    NoSuchEntity(Entity),
    #[error("entity {0:?} is not a creature")]
    NotACreature(Entity),
    #[error("non-finite {what} position {x}, {y}, {z}")]
    NonFinite {
        what: &'static str,
        x: f32,
        y: f32,
        z: f32,
    },
}
