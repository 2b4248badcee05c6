//! `cd-force` — the force models of the social-force crowd simulation.
//!
//! # Four force sources
//!
//! | Pass                                      | Writes                    |
//! |-------------------------------------------|---------------------------|
//! | [`force_adjust`] / [`torque_adjust`]      | goal-seeking drive        |
//! | [`force_fluctuation`] / [`torque_fluctuation`] | random fluctuation   |
//! | [`agent_agent`]                           | pairwise social + contact |
//! | [`agent_wall`]                            | one-sided wall repulsion  |
//!
//! All passes accumulate additively into `AgentStore::force` / `torque`:
//! running a pass twice without resetting the accumulators double-counts.
//! The orchestrator in `cd-sim` owns the reset and the pass ordering.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Adds [`agent_agent_parallel`], a Rayon per-agent path.  |

pub mod adjust;
pub mod error;
pub mod interactions;
pub mod params;

#[cfg(test)]
mod tests;

pub use adjust::{force_adjust, force_fluctuation, torque_adjust, torque_fluctuation};
pub use error::{ForceError, ForceResult};
pub use interactions::{agent_agent, agent_wall};
pub use params::ForceParams;

#[cfg(feature = "parallel")]
pub use interactions::agent_agent_parallel;
