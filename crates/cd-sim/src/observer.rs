//! Simulation observer trait for progress reporting and data collection.

use cd_agent::KinematicSnapshot;
use cd_core::SimClock;

use crate::StepResult;

/// Callbacks invoked by [`Simulation::run`][crate::Simulation::run] at key
/// points in the step loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_step_end(&mut self, result: &StepResult) {
///         if result.iteration % self.interval == 0 {
///             println!("i {}: t = {:.2} s, dt = {:.4} s", result.iteration, result.elapsed, result.dt);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each step, before the force passes.
    fn on_step_start(&mut self, _clock: &SimClock) {}

    /// Called at the end of each step, after the clock has advanced.
    fn on_step_end(&mut self, _result: &StepResult) {}

    /// Called at snapshot intervals (every `config.snapshot_interval`
    /// iterations).
    ///
    /// Receives an immutable copy of the kinematic state, so output writers
    /// never observe a torn mid-step view and the simulation never needs to
    /// know about any specific output format.
    fn on_snapshot(&mut self, _clock: &SimClock, _snapshot: &KinematicSnapshot) {}

    /// Called once after the final step of a [`run`][crate::Simulation::run]
    /// completes.
    fn on_sim_end(&mut self, _clock: &SimClock) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
