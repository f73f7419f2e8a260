//! Corpse placement for ambient creatures.
//!
//! A dying creature leaves a corpse scaled like the creature and resting on
//! the ground beneath it. Corpses of dressing creatures are never persistent.

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};

use crate::components::{Creature, Transform, Vec3};
use crate::error::DressingError;

/// Sent by the host when a creature dies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreatureDeath {
    pub creature: Entity,
    /// Ground point under the creature at the moment of death.
    pub ground: Vec3,
}

/// Where and how the corpse should appear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorpseAdjustment {
    pub position: Vec3,
    pub forward: Vec3,
    pub scale: f32,
    pub persistent: bool,
}

pub fn adjust_corpse(world: &World, death: &CreatureDeath) -> Result<CorpseAdjustment, DressingError> {
    let entity = death.creature;
    if !world.contains(entity) {
        return Err(DressingError::NoSuchEntity(entity));
    }
    let creature = world
        .get::<&Creature>(entity)
        .map_err(|_| DressingError::NotACreature(entity))?;
    let transform = world
        .get::<&Transform>(entity)
        .map_err(|_| DressingError::NotACreature(entity))?;

    let scale = creature.stats.scale;
    Ok(CorpseAdjustment {
        position: death.ground + Vec3::UP * (creature.stats.radius * scale),
        forward: transform.forward,
        scale,
        persistent: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use squalor_logic::creature::{CreatureProfile, CreatureSize};

    #[test]
    fn test_corpse_rests_on_ground() {
        let mut world = World::new();
        let stats = CreatureProfile::default().stats(CreatureSize::LARGE);
        let rat = world.spawn((
            Transform::at(Vec3::new(1.0, 0.3, 1.0)).scaled(stats.scale),
            Creature { stats },
        ));
        let death = CreatureDeath {
            creature: rat,
            ground: Vec3::new(1.0, 0.0, 1.0),
        };

        let corpse = adjust_corpse(&world, &death).unwrap();
        assert!((corpse.scale - 0.4).abs() < 1e-6);
        // radius 0.2 at scale 0.4
        assert!((corpse.position.y - 0.08).abs() < 1e-6);
        assert!(!corpse.persistent);
    }

    #[test]
    fn test_corpse_requires_creature() {
        let mut world = World::new();
        let rock = world.spawn((Transform::default(),));
        let death = CreatureDeath {
            creature: rock,
            ground: Vec3::ZERO,
        };
        assert!(matches!(adjust_corpse(&world, &death), Err(DressingError::NotACreature(_))));

        world.despawn(rock).unwrap();
        assert!(matches!(adjust_corpse(&world, &death), Err(DressingError::NoSuchEntity(_))));
    }
}
