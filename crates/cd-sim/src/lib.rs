//! `cd-sim` — step orchestrator for the rust_cd crowd simulation.
//!
//! # The step pipeline
//!
//! ```text
//! for each step:
//!   ① Reset      — zero force/torque accumulators.
//!   ② Adjust     — goal-seeking drive + random fluctuation per agent.
//!   ③ Index      — rebuild the uniform cell grid over active positions.
//!   ④ Agent-agent — pairwise social + contact forces (candidate pairs).
//!   ⑤ Agent-wall  — one-sided wall repulsion/contact.
//!   ⑥ Integrate  — adaptive dt, Euler or velocity Verlet, renormalize.
//!   ⑦ Verify     — NaN/Inf scan (fatal), then advance the clock.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Runs the agent-agent pass on Rayon's thread pool.        |
//! | `serde`    | Serde derives on config, snapshot, and parameter types.  |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use cd_agent::{AgentStoreBuilder, BodyModel};
//! use cd_core::SimConfig;
//! use cd_sim::{NoopObserver, SimulationBuilder};
//!
//! let (mut store, rngs) = AgentStoreBuilder::new(200, BodyModel::Circular, 42).build();
//! // ... place and activate agents ...
//! let mut sim = SimulationBuilder::new(SimConfig::default(), store, rngs).build()?;
//! sim.run(10_000, &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod integrator;
pub mod observer;
pub mod sim;


pub use builder::SimulationBuilder;
pub use error::{SimError, SimResult};
pub use integrator::{Integrator, IntegratorScheme, TimeStepper};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Simulation, StepResult};
