//! Fluent builder for constructing a [`Simulation`].

use cd_agent::{AgentRngs, AgentStore};
use cd_core::{SimClock, SimConfig};
use cd_force::ForceParams;
use cd_spatial::Obstacles;

use crate::{Integrator, IntegratorScheme, SimError, SimResult, Simulation, TimeStepper};

/// Fluent builder for [`Simulation`].
///
/// # Required inputs
///
/// - [`SimConfig`] — timestep bounds, seed, snapshot interval
/// - [`AgentStore`] + [`AgentRngs`] — from [`cd_agent::AgentStoreBuilder`],
///   with positions/targets written and agents activated by the caller
///
/// # Optional inputs (have defaults)
///
/// | Method           | Default                          |
/// |------------------|----------------------------------|
/// | `.obstacles(o)`  | No walls                         |
/// | `.params(p)`     | `ForceParams::default()`         |
/// | `.scheme(s)`     | `IntegratorScheme::Euler`        |
///
/// # Example
///
/// ```rust,ignore
/// let (store, rngs) = AgentStoreBuilder::new(n, BodyModel::Circular, seed).build();
/// // ... place and activate agents ...
/// let mut sim = SimulationBuilder::new(config, store, rngs)
///     .obstacles(obstacles)
///     .scheme(IntegratorScheme::VelocityVerlet)
///     .build()?;
/// sim.run(1_000, &mut NoopObserver)?;
/// ```
pub struct SimulationBuilder {
    config:    SimConfig,
    agents:    AgentStore,
    rngs:      AgentRngs,
    obstacles: Option<Obstacles>,
    params:    Option<ForceParams>,
    scheme:    IntegratorScheme,
}

impl SimulationBuilder {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, agents: AgentStore, rngs: AgentRngs) -> Self {
        Self {
            config,
            agents,
            rngs,
            obstacles: None,
            params:    None,
            scheme:    IntegratorScheme::Euler,
        }
    }

    /// Supply the wall geometry (default: no walls).
    pub fn obstacles(mut self, obstacles: Obstacles) -> Self {
        self.obstacles = Some(obstacles);
        self
    }

    /// Override the force-model constants (default: [`ForceParams::default`]).
    pub fn params(mut self, params: ForceParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Select the integration scheme (default: [`IntegratorScheme::Euler`]).
    pub fn scheme(mut self, scheme: IntegratorScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Validate all inputs and return a ready-to-run [`Simulation`].
    ///
    /// Fails fast on invalid timestep bounds, invalid force constants,
    /// non-positive body parameters on active agents, or an RNG pool that
    /// does not match the agent count.  Nothing is clamped or repaired.
    pub fn build(self) -> SimResult<Simulation> {
        self.config.validate()?;
        self.agents.validate()?;

        let params = self.params.unwrap_or_default();
        params.validate()?;

        if self.rngs.len() != self.agents.count {
            return Err(SimError::AgentCountMismatch {
                expected: self.agents.count,
                got:      self.rngs.len(),
                what:     "per-agent RNGs",
            });
        }

        let stepper = TimeStepper::new(self.config.dt_min, self.config.dt_max)?;

        let max_body_radius = self
            .agents
            .radius
            .iter()
            .copied()
            .fold(0.0_f64, f64::max);

        let mut agents = self.agents;
        // Bring derived state in line with whatever the caller wrote during
        // placement.
        agents.normalize_orientations();
        agents.update_all_shoulders();

        Ok(Simulation {
            clock: SimClock::new(),
            config: self.config,
            agents,
            rngs: self.rngs,
            obstacles: self.obstacles.unwrap_or_default(),
            params,
            stepper,
            integrator: Integrator::new(self.scheme),
            max_body_radius,
        })
    }
}
