//! Squalor Core - Interior Dressing Engine
//!
//! An ECS-based layer that dresses building interiors with clutter (food
//! bits, stains, waste, skeletons) and ambient creatures that wander between
//! points of interest. Planning lives in `squalor-logic`; this crate turns
//! plans into entities and ticks them.
//!
//! # Architecture
//!
//! The engine uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Props, creatures, corpses
//! - **Components**: Pure data attached to entities (Transform, Prop, Creature, etc.)
//! - **Systems**: Logic that queries and updates components
//!
//! # Example
//!
//! ```rust,no_run
//! use squalor_core::prelude::*;
//! use squalor_logic::colliders::BoxWorld;
//! use squalor_logic::config::DressingConfig;
//! use squalor_logic::context::{BuildingType, Doorway, InteriorContext, InteriorIdentity};
//! use squalor_logic::geometry::Aabb;
//!
//! let geometry = BoxWorld::new()
//!     .with_enclosure(Aabb::new(Vec3::ZERO, Vec3::new(6.0, 3.0, 6.0)), 0.2);
//! let doors = [Doorway::new(Vec3::new(3.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0))];
//! let ctx = InteriorContext::new(InteriorIdentity::new("Tavern"), 2, BuildingType::Tavern);
//!
//! let mut engine = DressingEngine::new(DressingConfig::default()).unwrap();
//! engine.enter_interior(&geometry, &ctx, &doors);
//!
//! loop {
//!     engine.update(&geometry, 1.0 / 60.0); // 60 FPS
//! }
//! ```

pub mod components;
pub mod corpse;
pub mod engine;
pub mod error;
pub mod generation;
pub mod systems;

pub use error::DressingError;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::corpse::{CreatureDeath, CorpseAdjustment};
    pub use crate::engine::{DressingEngine, DressingSummary};
    pub use crate::error::DressingError;
    pub use crate::systems::WanderCounts;
}
