//! Adaptive timestep selection and the two integration schemes.
//!
//! # Adaptive timestep
//!
//! Contact forces stiffen sharply with penetration depth, so the safe
//! timestep depends on how fast agents are actually moving.  The stepper
//! scales `dt_max` by the ratio of the population's preferred speed to its
//! current fastest speed:
//!
//!   dt = clamp(1.1 · max(v₀) · dt_max / max(|v|), dt_min, dt_max)
//!
//! While nobody exceeds ~1.1× their preferred speed the simulation runs at
//! `dt_max`; when a crowd crush accelerates someone far past it, `dt` shrinks
//! toward `dt_min` so the stiff contact forces stay resolved.  A population
//! at rest steps at `dt_max`.
//!
//! # Integration schemes
//!
//! Both schemes read the force/torque accumulators filled by the force
//! passes and advance position, velocity, orientation, and angular velocity
//! for active agents only.
//!
//! - [`IntegratorScheme::Euler`] — explicit with the second-order position
//!   term: `position += v·dt + ½·a·dt²`, then `velocity += a·dt`.
//! - [`IntegratorScheme::VelocityVerlet`] — averages the previous and
//!   current force over the velocity update.  The first step has no previous
//!   force, so it runs one plain Euler step to prime the
//!   `force_prev`/`torque_prev` arrays.

use cd_agent::{AgentStore, BodyModel};
use cd_core::CdError;

use crate::SimResult;

// ── TimeStepper ───────────────────────────────────────────────────────────────

/// Chooses the timestep for each step from the population's current speeds.
#[derive(Copy, Clone, Debug)]
pub struct TimeStepper {
    dt_min: f64,
    dt_max: f64,
}

impl TimeStepper {
    /// Safety factor applied to the preferred-speed numerator: agents up to
    /// 10 % over their target speed still step at `dt_max`.
    const SPEED_HEADROOM: f64 = 1.1;

    /// Build a stepper with the given bounds.  Requires `0 < dt_min <= dt_max`,
    /// both finite; bounds are never swapped or clamped.
    pub fn new(dt_min: f64, dt_max: f64) -> SimResult<Self> {
        if !dt_min.is_finite() || !dt_max.is_finite() || dt_min <= 0.0 || dt_min > dt_max {
            return Err(CdError::TimestepBounds { dt_min, dt_max }.into());
        }
        Ok(Self { dt_min, dt_max })
    }

    #[inline]
    pub fn dt_min(&self) -> f64 {
        self.dt_min
    }

    #[inline]
    pub fn dt_max(&self) -> f64 {
        self.dt_max
    }

    /// Select the timestep for the upcoming step.  Always within
    /// `[dt_min, dt_max]`.
    pub fn select(&self, store: &AgentStore) -> f64 {
        let v_max = store.max_speed();
        if v_max == 0.0 {
            return self.dt_max;
        }
        let dt = Self::SPEED_HEADROOM * store.max_target_velocity() * self.dt_max / v_max;
        dt.clamp(self.dt_min, self.dt_max)
    }
}

// ── Integrator ────────────────────────────────────────────────────────────────

/// Which update rule advances the equations of motion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntegratorScheme {
    /// Semi-implicit Euler.  One force evaluation per step; first choice for
    /// large populations.
    Euler,
    /// Velocity Verlet using the previous step's force.  Better energy
    /// behavior in dense contact at the cost of threading `force_prev`
    /// through the store.
    VelocityVerlet,
}

/// Advances agent state by one timestep under the selected scheme.
///
/// Holds the Verlet priming flag; everything else lives in the store.
#[derive(Debug)]
pub struct Integrator {
    scheme: IntegratorScheme,
    /// Whether `force_prev`/`torque_prev` hold a real previous force.
    primed: bool,
}

impl Integrator {
    pub fn new(scheme: IntegratorScheme) -> Self {
        Self { scheme, primed: false }
    }

    #[inline]
    pub fn scheme(&self) -> IntegratorScheme {
        self.scheme
    }

    /// Advance every active agent by `dt` seconds from the accumulated
    /// forces.  Orientation state is only touched for orientable bodies.
    pub fn step(&mut self, store: &mut AgentStore, dt: f64) {
        match self.scheme {
            IntegratorScheme::Euler => {
                translational_euler(store, dt);
                if store.body.is_orientable() {
                    rotational_euler(store, dt);
                }
            }
            IntegratorScheme::VelocityVerlet => {
                if self.primed {
                    translational_verlet(store, dt);
                    if store.body.is_orientable() {
                        rotational_verlet(store, dt);
                    }
                } else {
                    // No previous force yet: take one Euler step and cache
                    // this step's force as the Verlet history.
                    translational_euler(store, dt);
                    if store.body.is_orientable() {
                        rotational_euler(store, dt);
                    }
                    self.primed = true;
                }
                store.force_prev.copy_from_slice(&store.force);
                store.torque_prev.copy_from_slice(&store.torque);
            }
        }
    }
}

// ── Update rules ──────────────────────────────────────────────────────────────

fn translational_euler(store: &mut AgentStore, dt: f64) {
    for i in 0..store.count {
        if !store.active[i] {
            continue;
        }
        let acceleration = store.force[i] * (1.0 / store.mass[i]);
        store.position[i] += store.velocity[i] * dt + acceleration * (0.5 * dt * dt);
        store.velocity[i] += acceleration * dt;
    }
}

fn rotational_euler(store: &mut AgentStore, dt: f64) {
    debug_assert_eq!(store.body, BodyModel::ThreeCircle);
    for i in 0..store.count {
        if !store.active[i] {
            continue;
        }
        let angular_acceleration = store.torque[i] / store.inertia_rot[i];
        store.orientation[i] +=
            store.angular_velocity[i] * dt + angular_acceleration * (0.5 * dt * dt);
        store.angular_velocity[i] += angular_acceleration * dt;
    }
}

fn translational_verlet(store: &mut AgentStore, dt: f64) {
    for i in 0..store.count {
        if !store.active[i] {
            continue;
        }
        let half_inv_mass = 1.0 / (2.0 * store.mass[i]);
        store.velocity[i] += (store.force_prev[i] + store.force[i]) * (half_inv_mass * dt);
        store.position[i] +=
            store.velocity[i] * dt + store.force[i] * (half_inv_mass * dt * dt);
    }
}

fn rotational_verlet(store: &mut AgentStore, dt: f64) {
    debug_assert_eq!(store.body, BodyModel::ThreeCircle);
    for i in 0..store.count {
        if !store.active[i] {
            continue;
        }
        let half_inv_inertia = 1.0 / (2.0 * store.inertia_rot[i]);
        store.angular_velocity[i] +=
            (store.torque_prev[i] + store.torque[i]) * (half_inv_inertia * dt);
        store.orientation[i] += store.angular_velocity[i] * dt
            + store.torque[i] * (half_inv_inertia * dt * dt);
    }
}
