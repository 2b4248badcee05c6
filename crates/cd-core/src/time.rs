//! Simulation time model.
//!
//! # Design
//!
//! Unlike fixed-tick discrete-event simulations, the crowd model advances by
//! an *adaptive* timestep chosen fresh every iteration, so simulated time is
//! a continuous `f64` accumulator rather than an integer tick counter.
//! `SimClock` tracks three things:
//!
//!   elapsed  — total simulated seconds since the run started
//!   iteration — how many steps have been taken
//!   dt_prev   — the timestep used by the most recent step
//!
//! `dt_prev` is part of the clock (not transient local state) because
//! downstream consumers — progress reporting, persistence collaborators —
//! want "what timestep did the last step use" without re-deriving it.

use std::fmt;

use crate::{CdError, CdResult};

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Continuous simulation clock advanced by the orchestrator once per step.
///
/// Cheap to copy and intentionally holds no heap data.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Total simulated seconds elapsed since iteration 0.
    pub elapsed: f64,
    /// Number of completed steps.
    pub iteration: u64,
    /// Timestep used by the most recent step (0.0 before the first step).
    pub dt_prev: f64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one step of length `dt` seconds.
    #[inline]
    pub fn advance(&mut self, dt: f64) {
        self.elapsed += dt;
        self.iteration += 1;
        self.dt_prev = dt;
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "i {:06} | t {:.3} s | dt {:.4} s",
            self.iteration, self.elapsed, self.dt_prev
        )
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically constructed by the application crate and passed to the
/// simulation builder, which calls [`SimConfig::validate`] before any state
/// is touched.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Lower bound for the adaptive timestep, in seconds.  Must be > 0.
    pub dt_min: f64,

    /// Upper bound for the adaptive timestep, in seconds.  Must be >= dt_min.
    pub dt_max: f64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Call the observer's snapshot hook every N iterations.  0 = never.
    pub snapshot_interval: u64,
}

impl SimConfig {
    /// Check the timestep bounds contract: `0 < dt_min <= dt_max`, both finite.
    ///
    /// Violations fail fast here — bounds are never swapped or clamped.
    pub fn validate(&self) -> CdResult<()> {
        let (lo, hi) = (self.dt_min, self.dt_max);
        if !lo.is_finite() || !hi.is_finite() || lo <= 0.0 || lo > hi {
            return Err(CdError::TimestepBounds { dt_min: lo, dt_max: hi });
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt_min:            0.001,
            dt_max:            0.01,
            seed:              0,
            snapshot_interval: 0,
        }
    }
}
