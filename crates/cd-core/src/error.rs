//! Framework error type.
//!
//! Sub-crates may define their own error enums and convert them into `CdError`
//! via `From` impls, or keep them separate and wrap `CdError` as one variant.
//! Both patterns are acceptable; prefer whichever keeps error sites clean.

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `cd-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CdError {
    #[error("configuration error: {0}")]
    Config(String),

    /// Integration timestep bounds must satisfy `0 < dt_min <= dt_max`.
    /// Bounds are never silently swapped or clamped.
    #[error("invalid timestep bounds: dt_min = {dt_min}, dt_max = {dt_max}")]
    TimestepBounds { dt_min: f64, dt_max: f64 },

    /// A NaN or infinity appeared in agent state.  This is fatal for the
    /// current step: it indicates an upstream model or parameter bug, so the
    /// simulation must not continue on corrupted state.
    #[error("non-finite {quantity} for agent {agent}")]
    NonFinite {
        agent:    AgentId,
        quantity: &'static str,
    },
}

/// Shorthand result type for all `cd-*` crates.
pub type CdResult<T> = Result<T, CdError>;
