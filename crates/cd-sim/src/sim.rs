//! The `Simulation` struct and its step loop.

use cd_agent::{AgentRngs, AgentStore};
use cd_core::{SimClock, SimConfig};
use cd_force::ForceParams;
use cd_spatial::{CellGrid, Obstacles};

use crate::{Integrator, SimObserver, SimResult, TimeStepper};

// ── StepResult ────────────────────────────────────────────────────────────────

/// Summary of one completed step, handed to
/// [`SimObserver::on_step_end`][crate::SimObserver::on_step_end].
#[derive(Copy, Clone, Debug)]
pub struct StepResult {
    /// Iteration number of the completed step (1-based: the first step
    /// reports 1).
    pub iteration: u64,
    /// Timestep the step integrated over, in seconds.
    pub dt: f64,
    /// Total simulated seconds elapsed, including this step.
    pub elapsed: f64,
    /// Number of active agents during the step.
    pub active: usize,
}

// ── Simulation ────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Holds all simulation state and drives the fixed per-step pipeline:
///
/// 1. **Reset** — zero the force/torque accumulators.
/// 2. **Adjustment + fluctuation** — goal-seeking drive and random
///    perturbation, per agent from its own RNG stream.
/// 3. **Neighbor index** — rebuild the uniform cell grid over active agent
///    positions (cell side = the interaction cutoff).
/// 4. **Agent-agent** — pairwise social + contact forces over the grid's
///    candidate pairs (Rayon per-agent path with the `parallel` feature).
/// 5. **Agent-wall** — one-sided wall repulsion/contact.
/// 6. **Integrate** — select the adaptive timestep, advance the equations of
///    motion, renormalize orientations, refresh shoulder geometry.
/// 7. **Verify + advance** — NaN/Inf scan (fatal on hit), then the clock.
///
/// Every pass accumulates additively, so within-step pass order (beyond
/// reset-first, integrate-last) does not change the result.
///
/// Create via [`SimulationBuilder`][crate::SimulationBuilder].
pub struct Simulation {
    /// Global configuration (timestep bounds, seed, snapshot interval).
    pub config: SimConfig,

    /// Continuous simulation clock, advanced once per step.
    pub clock: SimClock,

    /// Agent state (SoA arrays).
    pub agents: AgentStore,

    /// Per-agent deterministic RNGs, separated for the split-borrow pattern.
    pub rngs: AgentRngs,

    /// Wall geometry.  Immutable for the lifetime of the run.
    pub obstacles: Obstacles,

    /// Force-model constants shared by the agent-agent and agent-wall passes.
    pub params: ForceParams,

    pub(crate) stepper:    TimeStepper,
    pub(crate) integrator: Integrator,

    /// Largest body radius in the population, fixed at build time; together
    /// with the sight range it determines the grid cell side.
    pub(crate) max_body_radius: f64,
}

impl Simulation {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run `steps` steps from the current position.
    ///
    /// Calls observer hooks at every step boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, steps: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..steps {
            observer.on_step_start(&self.clock);
            let result = self.step()?;
            observer.on_step_end(&result);
            if self.config.snapshot_interval > 0
                && result.iteration.is_multiple_of(self.config.snapshot_interval)
            {
                observer.on_snapshot(&self.clock, &self.agents.snapshot());
            }
        }
        observer.on_sim_end(&self.clock);
        Ok(())
    }

    /// Advance the simulation by one step.
    ///
    /// On error the step is abandoned mid-pipeline and the clock does not
    /// advance; the store may hold partially accumulated forces, so a failed
    /// step must not be retried.
    pub fn step(&mut self) -> SimResult<StepResult> {
        let active = self.agents.active_count();

        // ── Reset accumulators ────────────────────────────────────────────
        self.agents.reset_forces();

        // ── Adjustment + fluctuation ──────────────────────────────────────
        cd_force::force_adjust(&mut self.agents);
        cd_force::torque_adjust(&mut self.agents);
        cd_force::force_fluctuation(&mut self.agents, &mut self.rngs)?;
        cd_force::torque_fluctuation(&mut self.agents, &mut self.rngs)?;

        // ── Neighbor index ────────────────────────────────────────────────
        //
        // Rebuilt from scratch every step; positions move every step and the
        // O(n) rebuild is cheap next to the force pass.
        let cell_size = self.params.interaction_radius(self.max_body_radius);
        let grid = CellGrid::build(&self.agents.position, &self.agents.active, cell_size)?;

        // ── Interaction passes ────────────────────────────────────────────
        #[cfg(not(feature = "parallel"))]
        cd_force::agent_agent(&mut self.agents, &grid, &self.params);
        #[cfg(feature = "parallel")]
        cd_force::agent_agent_parallel(&mut self.agents, &grid, &self.params);

        cd_force::agent_wall(&mut self.agents, &self.obstacles, &self.params);

        // ── Integrate ─────────────────────────────────────────────────────
        let dt = self.stepper.select(&self.agents);
        self.integrator.step(&mut self.agents, dt);
        self.agents.normalize_orientations();
        self.agents.update_all_shoulders();

        // ── Verify, then advance the clock ────────────────────────────────
        self.agents.check_finite()?;
        self.clock.advance(dt);

        Ok(StepResult {
            iteration: self.clock.iteration,
            dt,
            elapsed: self.clock.elapsed,
            active,
        })
    }
}
