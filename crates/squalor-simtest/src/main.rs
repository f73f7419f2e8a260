//! Squalor Headless Dressing Harness
//!
//! Validates room inference, clutter placement and creature wandering on
//! synthetic box-built interiors. Runs entirely in-process: no game, no
//! rendering.
//!
//! Usage:
//!   cargo run -p squalor-simtest
//!   cargo run -p squalor-simtest -- --verbose
//!   cargo run -p squalor-simtest -- --config overrides.json

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use squalor_core::prelude::*;
use squalor_logic::archetypes::PropKind;
use squalor_logic::colliders::BoxWorld;
use squalor_logic::config::DressingConfig;
use squalor_logic::context::{BuildingType, Doorway, InteriorContext, InteriorIdentity};
use squalor_logic::counts::BiasedCount;
use squalor_logic::geometry::Aabb;
use squalor_logic::placement::{self, visible_to_proprietor, Gate};
use squalor_logic::probe;
use squalor_logic::rooms::gather_rooms;

// ── Interior scenarios ──────────────────────────────────────────────────
const INTERIORS_JSON: &str = include_str!("../../../data/interiors.json");

/// Wall thickness for scenario shells.
const SHELL_THICKNESS: f32 = 0.2;

/// Visits simulated per scenario in the placement sweep.
const VISITS: u16 = 120;

#[derive(Debug, Deserialize)]
struct Scenario {
    name: String,
    building_type: BuildingType,
    quality: u8,
    shell: Aabb,
    #[serde(default)]
    solids: Vec<Aabb>,
    doors: Vec<Doorway>,
    #[serde(default)]
    proprietor: Option<Vec3>,
    expected_rooms: usize,
}

impl Scenario {
    fn world(&self) -> BoxWorld {
        let mut world = BoxWorld::new().with_enclosure(self.shell, SHELL_THICKNESS);
        for solid in &self.solids {
            world.push(*solid);
        }
        world
    }

    fn context(&self, day: u16) -> InteriorContext {
        let mut ctx = InteriorContext::new(InteriorIdentity::new(&self.name), self.quality, self.building_type)
            .with_day(day);
        ctx.proprietor = self.proprietor;
        ctx
    }

    fn contains(&self, p: Vec3) -> bool {
        let (lo, hi) = (self.shell.min, self.shell.max);
        p.x > lo.x && p.x < hi.x && p.z > lo.z && p.z < hi.z && p.y >= lo.y && p.y < hi.y
    }
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    println!("=== Squalor Dressing Harness ===\n");

    let mut results = Vec::new();

    // 0. Configuration
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(detail) => {
            println!("  ✗ config_load: {}", detail);
            std::process::exit(1);
        }
    };
    results.push(TestResult {
        name: "config_valid".into(),
        passed: config.validate().is_ok(),
        detail: "dressing config validates".into(),
    });

    // 1. Scenario data
    let scenarios: Vec<Scenario> = match serde_json::from_str(INTERIORS_JSON) {
        Ok(s) => s,
        Err(e) => {
            println!("  ✗ scenarios_parse: JSON parse error: {}", e);
            std::process::exit(1);
        }
    };
    results.push(TestResult {
        name: "scenarios_not_empty".into(),
        passed: !scenarios.is_empty(),
        detail: format!("{} interiors loaded", scenarios.len()),
    });

    // 2. Count generators
    results.extend(validate_count_generators(&config, verbose));

    // 3. Room inference
    results.extend(validate_room_inference(&scenarios, verbose));

    // 4. Placement sweep
    results.extend(validate_placement(&scenarios, &config, verbose));

    // 5. Engine lifecycle and wandering
    results.extend(validate_engine(&scenarios, &config, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn load_config(args: &[String]) -> Result<DressingConfig, String> {
    let Some(index) = args.iter().position(|a| a == "--config") else {
        return Ok(DressingConfig::default());
    };
    let path = args
        .get(index + 1)
        .ok_or_else(|| "--config needs a path".to_string())?;
    let json = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
    DressingConfig::from_json(&json).map_err(|e| format!("{}: {}", path, e))
}

// ── 2. Count generators ─────────────────────────────────────────────────

fn validate_count_generators(config: &DressingConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Count Generators ---");
    let mut results = Vec::new();

    let generators: [(&str, BiasedCount); 5] = [
        ("food", config.food.count),
        ("stains", config.stains.count),
        ("waste", config.waste.count),
        ("closet_waste", config.waste.closet_count),
        ("creatures", config.creatures.count),
    ];

    for (name, generator) in generators {
        let mut rng = StdRng::seed_from_u64(7);
        let means: Vec<f32> = (0..=10)
            .map(|quality| {
                let total: u32 = (0..4000).map(|_| generator.roll(quality, &mut rng)).sum();
                total as f32 / 4000.0
            })
            .collect();

        // Allow for sampling noise between neighbouring qualities
        let monotone = means.windows(2).all(|pair| pair[0] + 0.1 >= pair[1]);
        results.push(TestResult {
            name: format!("counts_{}_non_increasing", name),
            passed: monotone,
            detail: format!("mean at q0 {:.2}, q10 {:.2}", means[0], means[10]),
        });

        if verbose {
            let row: Vec<String> = means.iter().map(|m| format!("{:.2}", m)).collect();
            println!("  {:13} {}", name, row.join(" "));
        }
    }

    results
}

// ── 3. Room inference ───────────────────────────────────────────────────

fn validate_room_inference(scenarios: &[Scenario], verbose: bool) -> Vec<TestResult> {
    println!("--- Room Inference ---");
    let mut results = Vec::new();

    for scenario in scenarios {
        let world = scenario.world();
        let rooms = gather_rooms(&world, &scenario.doors);

        results.push(TestResult {
            name: format!("rooms_{}", slug(&scenario.name)),
            passed: rooms.len() == scenario.expected_rooms,
            detail: format!("{} rooms (expected {})", rooms.len(), scenario.expected_rooms),
        });

        let sane = rooms.iter().all(|room| {
            let size = room.bounds.size;
            !room.bounds.is_degenerate()
                && size.x <= scenario.shell.size().x.max(scenario.shell.size().z) + 1e-3
                && size.z <= scenario.shell.size().x.max(scenario.shell.size().z) + 1e-3
                && room.door_count >= 1
        });
        results.push(TestResult {
            name: format!("rooms_{}_bounds", slug(&scenario.name)),
            passed: sane,
            detail: "room sizes positive and within the shell".into(),
        });

        if verbose {
            for room in &rooms {
                println!(
                    "  {}: center ({:.2}, {:.2}, {:.2}) size {:.2} x {:.2} area {:.2} doors {}",
                    scenario.name,
                    room.bounds.center.x,
                    room.bounds.center.y,
                    room.bounds.center.z,
                    room.bounds.size.x,
                    room.bounds.size.z,
                    room.area(),
                    room.door_count
                );
            }
        }
    }

    results
}

// ── 4. Placement ────────────────────────────────────────────────────────

fn validate_placement(scenarios: &[Scenario], config: &DressingConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Placement ---");
    let mut results = Vec::new();

    for scenario in scenarios {
        let world = scenario.world();
        let name = slug(&scenario.name);

        let mut outside = 0;
        let mut seen_waste = 0;
        let mut kind_totals = [0usize; 4];
        let mut creature_total = 0;
        let mut gates = Vec::new();
        let mut reproducible = true;
        let mut skeleton_stable = true;
        let mut skeleton_seen: Option<bool> = None;

        for day in 0..VISITS {
            let ctx = scenario.context(day);
            let mut rng = StdRng::seed_from_u64(ctx.seed());
            let plan = placement::plan_interior(&world, config, &ctx, &scenario.doors, &mut rng);

            let mut replay_rng = StdRng::seed_from_u64(ctx.seed());
            let replay = placement::plan_interior(&world, config, &ctx, &scenario.doors, &mut replay_rng);
            reproducible &= replay.props == plan.props && replay.creatures == plan.creatures;

            for prop in &plan.props {
                if !scenario.contains(prop.position) {
                    outside += 1;
                }
                if prop.kind == PropKind::Waste {
                    if let Some(eye) = ctx.proprietor {
                        if visible_to_proprietor(&world, &config.waste, eye, prop.position) {
                            seen_waste += 1;
                        }
                    }
                }
                kind_totals[kind_index(prop.kind)] += 1;
            }
            for creature in &plan.creatures {
                if !scenario.contains(creature.position) {
                    outside += 1;
                }
            }
            creature_total += plan.creatures.len();

            if plan.gate == Gate::Open {
                let has_skeleton = plan.count(PropKind::Skeleton) > 0;
                match skeleton_seen {
                    None => skeleton_seen = Some(has_skeleton),
                    Some(previous) => skeleton_stable &= previous == has_skeleton,
                }
            }
            if !gates.contains(&plan.gate) {
                gates.push(plan.gate);
            }
        }

        results.push(TestResult {
            name: format!("placement_{}_inside", name),
            passed: outside == 0,
            detail: format!("{} placements outside the shell", outside),
        });
        results.push(TestResult {
            name: format!("placement_{}_reproducible", name),
            passed: reproducible,
            detail: "same seed gives the same plan".into(),
        });
        results.push(TestResult {
            name: format!("placement_{}_skeleton_stable", name),
            passed: skeleton_stable,
            detail: format!("skeleton present on every visit: {:?}", skeleton_seen),
        });
        if scenario.proprietor.is_some() {
            results.push(TestResult {
                name: format!("placement_{}_waste_hidden", name),
                passed: seen_waste == 0,
                detail: format!("{} waste in proprietor's view", seen_waste),
            });
        }

        let gated = scenario.quality > config.max_quality || !config.allows(scenario.building_type);
        let total_props: usize = kind_totals.iter().sum();
        results.push(TestResult {
            name: format!("placement_{}_gate", name),
            passed: if gated {
                total_props == 0 && creature_total == 0 && !gates.contains(&Gate::Open)
            } else {
                gates == [Gate::Open]
            },
            detail: format!("gates {:?}, {} props", gates, total_props),
        });

        if verbose {
            println!(
                "  {}: food {} stains {} waste {} skeletons {} creatures {} over {} visits",
                scenario.name,
                kind_totals[0],
                kind_totals[1],
                kind_totals[2],
                kind_totals[3],
                creature_total,
                VISITS
            );
        }
    }

    results
}

fn kind_index(kind: PropKind) -> usize {
    match kind {
        PropKind::FoodBit => 0,
        PropKind::Stain => 1,
        PropKind::Waste => 2,
        PropKind::Skeleton => 3,
    }
}

// ── 5. Engine ───────────────────────────────────────────────────────────

fn validate_engine(scenarios: &[Scenario], config: &DressingConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Engine & Wandering ---");
    let mut results = Vec::new();

    let mut engine = match DressingEngine::with_seed(config.clone(), 42) {
        Ok(engine) => engine,
        Err(e) => {
            results.push(TestResult {
                name: "engine_create".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    for scenario in scenarios {
        let world = scenario.world();
        let name = slug(&scenario.name);

        // Find a visit with creatures so wandering has something to do
        let mut summary = None;
        for day in 0..VISITS {
            match engine.enter_interior(&world, &scenario.context(day), &scenario.doors) {
                Some(s) if s.creatures > 0 => {
                    summary = Some(s);
                    break;
                }
                Some(_) => {}
                None => break,
            }
        }
        let Some(summary) = summary else {
            if verbose {
                println!("  {}: no creatures in {} visits", scenario.name, VISITS);
            }
            continue;
        };

        let mut totals = WanderCounts::default();
        for _ in 0..(60 * 60) {
            let counts = engine.update(&world, 1.0 / 60.0);
            totals.paused += counts.paused;
            totals.choosing += counts.choosing;
            totals.moving += counts.moving;
            totals.interrupted += counts.interrupted;
        }

        let escaped = engine
            .world
            .query::<(&Creature, &Transform)>()
            .iter()
            .filter(|(_, (_, t))| {
                let grown = scenario.shell.expand(SHELL_THICKNESS);
                !grown.contains(&t.position)
            })
            .count();
        results.push(TestResult {
            name: format!("engine_{}_creatures_contained", name),
            passed: escaped == 0,
            detail: format!("{} of {} creatures escaped", escaped, summary.creatures),
        });
        results.push(TestResult {
            name: format!("engine_{}_creatures_move", name),
            passed: totals.moving > 0 && totals.interrupted == 0,
            detail: format!(
                "paused {} choosing {} moving {} interrupted {}",
                totals.paused, totals.choosing, totals.moving, totals.interrupted
            ),
        });

        // Kill one creature and check the corpse lands on the floor
        let victim = engine
            .world
            .query::<(&Creature, &Transform)>()
            .iter()
            .map(|(entity, (creature, t))| (entity, creature.stats, t.position))
            .next();
        if let Some((entity, stats, position)) = victim {
            let ground = probe::find_ground(&world, position);
            let corpse_ok = match engine.handle_death(CreatureDeath { creature: entity, ground }) {
                Ok(corpse) => engine
                    .world
                    .get::<&Transform>(corpse)
                    .map(|t| (t.position.y - (ground.y + stats.radius * stats.scale)).abs() < 1e-4)
                    .unwrap_or(false),
                Err(_) => false,
            };
            results.push(TestResult {
                name: format!("engine_{}_corpse_grounded", name),
                passed: corpse_ok,
                detail: "corpse rests at radius x scale above the ground".into(),
            });
        }

        let removed = engine.unload();
        results.push(TestResult {
            name: format!("engine_{}_unload", name),
            passed: engine.world.len() == 0,
            detail: format!("{} entities removed", removed),
        });

        if verbose {
            println!(
                "  {}: {} props, {} creatures, {} points of interest",
                scenario.name, summary.props, summary.creatures, summary.points_of_interest
            );
        }
    }

    results
}

fn slug(name: &str) -> String {
    name.to_lowercase().replace(|c: char| !c.is_ascii_alphanumeric(), "_")
}
