//! Dressing engine - main entry point for dressing interiors and ticking creatures

use std::sync::Arc;

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;
use squalor_logic::archetypes::PropKind;
use squalor_logic::config::DressingConfig;
use squalor_logic::context::{Doorway, InteriorContext};
use squalor_logic::placement::{plan_interior, Gate};
use squalor_logic::probe::CollisionWorld;

use crate::components::*;
use crate::corpse::{adjust_corpse, CreatureDeath};
use crate::error::DressingError;
use crate::generation::{spawn_creatures, spawn_props};
use crate::systems::{wandering_system, WanderCounts};

/// What one interior-entry pass produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DressingSummary {
    pub gate: Gate,
    pub rooms: usize,
    pub props: usize,
    pub creatures: usize,
    pub points_of_interest: usize,
}

/// Main dressing engine
pub struct DressingEngine {
    /// ECS world containing all spawned entities
    pub world: World,
    config: DressingConfig,
    /// Seconds of unpaused time since creation
    sim_time: f64,
    paused: bool,
    /// Drives wandering; placement uses its own per-visit seed
    rng: StdRng,
    /// Points of interest of the current interior
    points_of_interest: Arc<[Vec3]>,
}

impl DressingEngine {
    /// Create an engine after validating `config`.
    pub fn new(config: DressingConfig) -> Result<Self, DressingError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic engine for tests and replays.
    pub fn with_seed(config: DressingConfig, seed: u64) -> Result<Self, DressingError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: DressingConfig, rng: StdRng) -> Result<Self, DressingError> {
        config.validate()?;
        Ok(Self {
            world: World::new(),
            config,
            sim_time: 0.0,
            paused: false,
            rng,
            points_of_interest: Arc::from(Vec::new()),
        })
    }

    pub fn config(&self) -> &DressingConfig {
        &self.config
    }

    /// Dress an interior the player just entered.
    ///
    /// Any failure is logged and swallowed; whatever was spawned before the
    /// failure stays. Returns the summary on success.
    pub fn enter_interior<W: CollisionWorld + ?Sized>(
        &mut self,
        collision: &W,
        ctx: &InteriorContext,
        doors: &[Doorway],
    ) -> Option<DressingSummary> {
        match self.try_enter_interior(collision, ctx, doors) {
            Ok(summary) => Some(summary),
            Err(err) => {
                log::error!("failed to dress {}: {}", ctx.identity.name, err);
                None
            }
        }
    }

    /// Fallible form of [`enter_interior`](Self::enter_interior).
    pub fn try_enter_interior<W: CollisionWorld + ?Sized>(
        &mut self,
        collision: &W,
        ctx: &InteriorContext,
        doors: &[Doorway],
    ) -> Result<DressingSummary, DressingError> {
        // A new interior replaces whatever the last one left behind
        self.unload();

        let mut rng = StdRng::seed_from_u64(ctx.seed());
        let plan = plan_interior(collision, &self.config, ctx, doors, &mut rng);
        self.points_of_interest = Arc::clone(&plan.points_of_interest);

        let mut spawned = Vec::with_capacity(plan.props.len() + plan.creatures.len());
        let mut result = spawn_props(&mut self.world, &plan.props, &mut spawned);
        if result.is_ok() {
            result = spawn_creatures(
                &mut self.world,
                &plan.creatures,
                &self.config.creatures.profile,
                &plan.points_of_interest,
                &mut rng,
                &mut spawned,
            );
        }
        if let Err(err) = result {
            log::warn!(
                "{}: spawning stopped after {} of {} entities",
                ctx.identity.name,
                spawned.len(),
                plan.props.len() + plan.creatures.len()
            );
            return Err(err);
        }

        Ok(DressingSummary {
            gate: plan.gate,
            rooms: plan.rooms.len(),
            props: plan.props.len(),
            creatures: plan.creatures.len(),
            points_of_interest: plan.points_of_interest.len(),
        })
    }

    /// Tick every creature. Does nothing while paused.
    pub fn update<W: CollisionWorld + ?Sized>(&mut self, collision: &W, delta_seconds: f32) -> WanderCounts {
        if self.paused {
            return WanderCounts::default();
        }
        self.sim_time += delta_seconds as f64;
        wandering_system(
            &mut self.world,
            collision,
            &self.config.wander,
            self.sim_time,
            delta_seconds,
            &mut self.rng,
        )
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Get seconds of unpaused simulation time
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Despawn everything dressing created. Returns how many entities went.
    pub fn unload(&mut self) -> usize {
        let doomed: Vec<Entity> = self
            .world
            .query::<&Dressing>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        for &entity in &doomed {
            let _ = self.world.despawn(entity);
        }
        self.points_of_interest = Arc::from(Vec::new());
        if !doomed.is_empty() {
            log::debug!("unloaded {} dressing entities", doomed.len());
        }
        doomed.len()
    }

    /// Mark a creature hostile (stops its wandering) or calm it again.
    pub fn set_hostile(&mut self, creature: Entity, hostile: bool) -> Result<(), DressingError> {
        if self.world.get::<&Creature>(creature).is_err() {
            return Err(if self.world.contains(creature) {
                DressingError::NotACreature(creature)
            } else {
                DressingError::NoSuchEntity(creature)
            });
        }
        if hostile {
            self.world
                .insert_one(creature, Hostile)
                .map_err(|_| DressingError::NoSuchEntity(creature))?;
        } else {
            let _ = self.world.remove_one::<Hostile>(creature);
        }
        Ok(())
    }

    /// Replace a dead creature with its corpse. Returns the corpse entity.
    pub fn handle_death(&mut self, death: CreatureDeath) -> Result<Entity, DressingError> {
        let adjustment = adjust_corpse(&self.world, &death)?;
        let stats = self
            .world
            .get::<&Creature>(death.creature)
            .map(|creature| creature.stats)
            .map_err(|_| DressingError::NotACreature(death.creature))?;

        self.world
            .despawn(death.creature)
            .map_err(|_| DressingError::NoSuchEntity(death.creature))?;

        let transform = Transform::at(adjustment.position)
            .facing(adjustment.forward)
            .scaled(adjustment.scale);
        // Never persistent, so it goes with the rest of the dressing on unload
        Ok(self.world.spawn((transform, Corpse { stats }, Dressing)))
    }

    /// Points of interest shared by the current interior's creatures
    pub fn points_of_interest(&self) -> &[Vec3] {
        &self.points_of_interest
    }

    /// Count props, optionally of one kind
    pub fn prop_count(&self, kind: Option<PropKind>) -> usize {
        self.world
            .query::<&Prop>()
            .iter()
            .filter(|(_, prop)| kind.map_or(true, |k| prop.kind == k))
            .count()
    }

    /// Count living creatures
    pub fn creature_count(&self) -> usize {
        self.world.query::<&Creature>().iter().count()
    }

    /// Count corpses
    pub fn corpse_count(&self) -> usize {
        self.world.query::<&Corpse>().iter().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use squalor_logic::colliders::BoxWorld;
    use squalor_logic::context::{BuildingType, InteriorIdentity};
    use squalor_logic::geometry::Aabb;

    fn tavern() -> (BoxWorld, Vec<Doorway>, InteriorContext) {
        let world = BoxWorld::new().with_enclosure(Aabb::new(Vec3::ZERO, Vec3::new(6.0, 3.0, 6.0)), 0.2);
        let doors = vec![Doorway::new(Vec3::new(3.0, 1.0, 0.0), Vec3::new(0.0, 0.0, 1.0))];
        let ctx = InteriorContext::new(InteriorIdentity::new("Sleeping Dog"), 0, BuildingType::Tavern);
        (world, doors, ctx)
    }

    #[test]
    fn test_engine_creation() {
        let engine = DressingEngine::with_seed(DressingConfig::default(), 1).unwrap();
        assert_eq!(engine.prop_count(None), 0);
        assert_eq!(engine.creature_count(), 0);
        assert_eq!(engine.sim_time(), 0.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = DressingConfig::default();
        config.skeleton.hash_modulus = 0;
        assert!(matches!(
            DressingEngine::with_seed(config, 1),
            Err(DressingError::Config(_))
        ));
    }

    #[test]
    fn test_enter_interior_spawns_plan() {
        let (world, doors, ctx) = tavern();
        let mut engine = DressingEngine::with_seed(DressingConfig::default(), 1).unwrap();
        let summary = engine.enter_interior(&world, &ctx, &doors).unwrap();

        assert_eq!(summary.gate, Gate::Open);
        assert_eq!(summary.rooms, 1);
        assert_eq!(engine.prop_count(None), summary.props);
        assert_eq!(engine.creature_count(), summary.creatures);
        assert_eq!(engine.points_of_interest().len(), summary.points_of_interest);
    }

    #[test]
    fn test_reentering_replaces_dressing() {
        let (world, doors, ctx) = tavern();
        let mut engine = DressingEngine::with_seed(DressingConfig::default(), 1).unwrap();
        let first = engine.enter_interior(&world, &ctx, &doors).unwrap();
        let second = engine.enter_interior(&world, &ctx, &doors).unwrap();
        assert_eq!(first, second);
        assert_eq!(engine.prop_count(None), second.props);
    }

    #[test]
    fn test_unload_removes_everything() {
        let (world, doors, ctx) = tavern();
        let mut engine = DressingEngine::with_seed(DressingConfig::default(), 1).unwrap();
        let summary = engine.enter_interior(&world, &ctx, &doors).unwrap();
        let keep = engine.world.spawn((Transform::default(),));

        assert_eq!(engine.unload(), summary.props + summary.creatures);
        assert_eq!(engine.prop_count(None), 0);
        assert_eq!(engine.creature_count(), 0);
        assert!(engine.points_of_interest().is_empty());
        assert!(engine.world.contains(keep));
    }

    #[test]
    fn test_pause_freezes_time() {
        let (world, _, _) = tavern();
        let mut engine = DressingEngine::with_seed(DressingConfig::default(), 1).unwrap();
        engine.update(&world, 0.5);
        engine.set_paused(true);
        engine.update(&world, 0.5);
        assert!(engine.is_paused());
        assert!((engine.sim_time() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_handle_death_leaves_transient_corpse() {
        let mut engine = DressingEngine::with_seed(DressingConfig::default(), 1).unwrap();
        let stats = engine.config().creatures.profile.stats(Default::default());
        let rat = engine.world.spawn((
            Transform::at(Vec3::new(3.0, 0.12, 3.0)).scaled(stats.scale),
            Creature { stats },
            Dressing,
        ));

        let corpse = engine
            .handle_death(CreatureDeath {
                creature: rat,
                ground: Vec3::new(3.0, 0.0, 3.0),
            })
            .unwrap();

        assert!(!engine.world.contains(rat));
        assert_eq!(engine.corpse_count(), 1);
        assert!(engine.world.get::<&Dressing>(corpse).is_ok());
        engine.unload();
        assert_eq!(engine.corpse_count(), 0);
    }

    #[test]
    fn test_set_hostile_errors() {
        let mut engine = DressingEngine::with_seed(DressingConfig::default(), 1).unwrap();
        let rock = engine.world.spawn((Transform::default(),));
        assert!(matches!(
            engine.set_hostile(rock, true),
            Err(DressingError::NotACreature(_))
        ));
        engine.world.despawn(rock).unwrap();
        assert!(matches!(
            engine.set_hostile(rock, true),
            Err(DressingError::NoSuchEntity(_))
        ));
    }
}
