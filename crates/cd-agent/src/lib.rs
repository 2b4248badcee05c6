//! `cd-agent` — agent state storage for the rust_cd crowd simulation.
//!
//! # Layout
//!
//! All per-agent state lives in [`AgentStore`], a Structure-of-Arrays block
//! indexed by `AgentId`.  The store owns data and its invariants (orientation
//! normalization, shoulder-geometry consistency, positive body parameters) —
//! it has no behavior of its own.  Force models and the integrator mutate it
//! through plain indexed access on the `pub` arrays.
//!
//! The body variant ([`BodyModel`]) is a store-wide tag, not a per-agent one:
//! a population is either all-circular or all-three-circle, selected once at
//! configuration time.  Force and integration passes branch on the tag once
//! at the top of each pass, never per agent.

pub mod body;
pub mod builder;
pub mod store;

#[cfg(test)]
mod tests;

pub use body::{Body, BodyModel};
pub use builder::AgentStoreBuilder;
pub use store::{AgentRngs, AgentStore, KinematicSnapshot};
