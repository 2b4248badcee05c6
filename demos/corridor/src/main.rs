//! corridor — smallest demo for the rust_cd crowd simulation.
//!
//! 100 pedestrians walk the length of a 40 m × 4 m corridor under the
//! social-force model.  Scale comment: the model is O(n) per step thanks to
//! the cell grid; swap AGENT_COUNT for a stadium-scale population and enable
//! the `parallel` feature of `cd-sim` to run it across cores.

use std::time::Instant;

use anyhow::Result;

use cd_agent::{AgentStoreBuilder, BodyModel};
use cd_core::{SimClock, SimConfig, SimRng, Vec2};
use cd_sim::{SimObserver, SimulationBuilder, StepResult};
use cd_spatial::Obstacles;

// ── Constants ─────────────────────────────────────────────────────────────────

const AGENT_COUNT:       usize = 100;
const SEED:              u64   = 42;
const CORRIDOR_LENGTH:   f64   = 40.0;
const CORRIDOR_WIDTH:    f64   = 4.0;
const SPAWN_ZONE_LENGTH: f64   = 10.0; // agents start in the leftmost 10 m
const STEPS:             u64   = 3_000; // 30 s of simulated time at dt_max
const REPORT_INTERVAL:   u64   = 500;

// ── Progress observer ─────────────────────────────────────────────────────────

struct ProgressObserver {
    steps: u64,
}

impl SimObserver for ProgressObserver {
    fn on_step_end(&mut self, result: &StepResult) {
        self.steps += 1;
        if self.steps % REPORT_INTERVAL == 0 {
            println!(
                "  i {:>5} | t {:>6.2} s | dt {:.4} s | active {}",
                result.iteration, result.elapsed, result.dt, result.active
            );
        }
    }

    fn on_sim_end(&mut self, clock: &SimClock) {
        println!("  final clock: {clock}");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== corridor — rust_cd crowd simulation ===");
    println!("Agents: {AGENT_COUNT}  |  Steps: {STEPS}  |  Seed: {SEED}");
    println!();

    // 1. Walls: two long segments closing the corridor top and bottom, plus
    //    a back wall behind the spawn zone.
    let mut obstacles = Obstacles::new();
    obstacles.add_segment(Vec2::new(0.0, 0.0), Vec2::new(CORRIDOR_LENGTH, 0.0));
    obstacles.add_segment(Vec2::new(0.0, CORRIDOR_WIDTH), Vec2::new(CORRIDOR_LENGTH, CORRIDOR_WIDTH));
    obstacles.add_segment(Vec2::new(0.0, 0.0), Vec2::new(0.0, CORRIDOR_WIDTH));
    println!("Corridor: {CORRIDOR_LENGTH} m × {CORRIDOR_WIDTH} m, {} walls", obstacles.len());

    // 2. Agent store: adult pedestrians, jittered into the spawn zone, all
    //    heading toward +x (the far end of the corridor).
    let (mut store, rngs) = AgentStoreBuilder::new(AGENT_COUNT, BodyModel::Circular, SEED).build();
    let mut placement_rng = SimRng::new(SEED);
    let margin = store.radius[0] * 1.5;
    for i in 0..AGENT_COUNT {
        store.position[i] = Vec2::new(
            placement_rng.gen_range(margin..SPAWN_ZONE_LENGTH),
            placement_rng.gen_range(margin..CORRIDOR_WIDTH - margin),
        );
        store.target_direction[i] = Vec2::new(1.0, 0.0);
        store.active[i] = true;
    }

    // 3. Sim config: adaptive timestep in [1 ms, 10 ms].
    let config = SimConfig { seed: SEED, ..SimConfig::default() };
    println!(
        "Timestep: adaptive in [{} s, {} s]",
        config.dt_min, config.dt_max
    );
    println!();

    // 4. Build and run.
    let mut sim = SimulationBuilder::new(config, store, rngs)
        .obstacles(obstacles)
        .build()?;

    let t0 = Instant::now();
    sim.run(STEPS, &mut ProgressObserver { steps: 0 })?;
    let wall_time = t0.elapsed();

    // 5. Summary.
    println!();
    println!(
        "Simulated {:.1} s of crowd time in {:.3} s of wall time",
        sim.clock.elapsed,
        wall_time.as_secs_f64()
    );
    println!();

    let mut reached = 0usize;
    let mut mean_speed = 0.0;
    for i in 0..sim.agents.count {
        if sim.agents.position[i].x >= CORRIDOR_LENGTH {
            reached += 1;
        }
        mean_speed += sim.agents.velocity[i].length();
    }
    mean_speed /= sim.agents.count as f64;

    println!("{:<24} {:>8}", "Reached corridor end", reached);
    println!("{:<24} {:>8.3}", "Mean speed (m/s)", mean_speed);
    println!("{:<24} {:>8.3}", "Max speed (m/s)", sim.agents.max_speed());
    println!();

    println!("{:<8} {:>10} {:>10} {:>10}", "Agent", "x (m)", "y (m)", "|v| (m/s)");
    println!("{}", "-".repeat(42));
    for i in (0..sim.agents.count).step_by(10) {
        let p = sim.agents.position[i];
        println!(
            "{:<8} {:>10.3} {:>10.3} {:>10.3}",
            i,
            p.x,
            p.y,
            sim.agents.velocity[i].length()
        );
    }

    Ok(())
}
