//! Prop and creature spawning from a `DressingPlan`

use std::sync::Arc;

use hecs::{Entity, World};
use rand::Rng;
use squalor_logic::creature::CreatureProfile;
use squalor_logic::placement::{CreaturePlacement, PropPlacement};
use squalor_logic::wander::WanderBehavior;

use crate::components::*;
use crate::error::DressingError;

fn check_finite(what: &'static str, position: Vec3) -> Result<(), DressingError> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(DressingError::NonFinite {
            what,
            x: position.x,
            y: position.y,
            z: position.z,
        })
    }
}

/// Spawn one entity per planned prop.
///
/// Entities are pushed to `spawned` as they are created, so a failure part
/// way through leaves the earlier props in place and accounted for.
pub fn spawn_props(
    world: &mut World,
    props: &[PropPlacement],
    spawned: &mut Vec<Entity>,
) -> Result<(), DressingError> {
    for placement in props {
        check_finite("prop", placement.position)?;

        let transform = Transform::at(placement.position)
            .facing(placement.facing)
            .rolled(placement.roll_degrees)
            .scaled(placement.scale);
        let prop = Prop {
            kind: placement.kind,
            visual: placement.visual.clone(),
            size: placement.size,
        };

        spawned.push(world.spawn((transform, prop, Dressing)));
    }
    Ok(())
}

/// Spawn planned creatures, each wandering over the shared points of interest.
pub fn spawn_creatures(
    world: &mut World,
    creatures: &[CreaturePlacement],
    profile: &CreatureProfile,
    points_of_interest: &Arc<[Vec3]>,
    rng: &mut impl Rng,
    spawned: &mut Vec<Entity>,
) -> Result<(), DressingError> {
    for placement in creatures {
        check_finite("creature", placement.position)?;

        let stats = profile.stats(placement.size);
        let yaw = rng.gen_range(0.0..std::f32::consts::TAU);
        let transform = Transform::at(placement.position)
            .facing(Vec3::new(yaw.cos(), 0.0, yaw.sin()))
            .scaled(stats.scale);
        let health = Health::new(rng.gen_range(stats.min_health..=stats.max_health));

        spawned.push(world.spawn((
            transform,
            Creature { stats },
            health,
            WanderBehavior::new(Arc::clone(points_of_interest)),
            Dressing,
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use squalor_logic::archetypes::{PropKind, Visual};
    use squalor_logic::creature::CreatureSize;

    fn stain_at(position: Vec3) -> PropPlacement {
        PropPlacement {
            kind: PropKind::Stain,
            position,
            facing: Vec3::UP,
            roll_degrees: 90.0,
            size: Some((0.5, 0.6)),
            scale: 1.0,
            visual: Visual::Texture("Stain".to_string()),
        }
    }

    #[test]
    fn test_spawn_props() {
        let mut world = World::new();
        let mut spawned = Vec::new();
        spawn_props(
            &mut world,
            &[stain_at(Vec3::new(1.0, 0.01, 1.0)), stain_at(Vec3::new(2.0, 0.01, 1.0))],
            &mut spawned,
        )
        .unwrap();

        assert_eq!(spawned.len(), 2);
        let transform = world.get::<&Transform>(spawned[0]).unwrap();
        assert_eq!(transform.forward, Vec3::UP);
        assert_eq!(transform.roll_degrees, 90.0);
        assert!(world.get::<&Dressing>(spawned[1]).is_ok());
    }

    #[test]
    fn test_non_finite_prop_stops_spawning() {
        let mut world = World::new();
        let mut spawned = Vec::new();
        let result = spawn_props(
            &mut world,
            &[
                stain_at(Vec3::new(1.0, 0.01, 1.0)),
                stain_at(Vec3::new(f32::NAN, 0.01, 1.0)),
                stain_at(Vec3::new(2.0, 0.01, 1.0)),
            ],
            &mut spawned,
        );

        assert!(matches!(result, Err(DressingError::NonFinite { what: "prop", .. })));
        assert_eq!(spawned.len(), 1);
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn test_spawn_creatures_share_points_of_interest() {
        let mut world = World::new();
        let mut spawned = Vec::new();
        let mut rng = StdRng::seed_from_u64(3);
        let pois: Arc<[Vec3]> = Arc::from(vec![Vec3::new(1.0, 0.0, 1.0)]);
        let placements = [
            CreaturePlacement {
                position: Vec3::new(2.0, 0.12, 2.0),
                size: CreatureSize::SMALL,
            },
            CreaturePlacement {
                position: Vec3::new(3.0, 0.12, 2.0),
                size: CreatureSize::LARGE,
            },
        ];

        spawn_creatures(
            &mut world,
            &placements,
            &CreatureProfile::default(),
            &pois,
            &mut rng,
            &mut spawned,
        )
        .unwrap();

        assert_eq!(spawned.len(), 2);
        for &entity in &spawned {
            let wander = world.get::<&WanderBehavior>(entity).unwrap();
            assert_eq!(wander.points_of_interest(), &pois[..]);
            let health = world.get::<&Health>(entity).unwrap();
            let creature = world.get::<&Creature>(entity).unwrap();
            assert!(health.max >= creature.stats.min_health && health.max <= creature.stats.max_health);
        }
        let large = world.get::<&Transform>(spawned[1]).unwrap();
        assert!((large.scale - 0.4).abs() < 1e-6);
        assert!((large.forward.length() - 1.0).abs() < 1e-4);
        // Arc shared by both creatures plus the local handle
        assert_eq!(Arc::strong_count(&pois), 3);
    }
}
