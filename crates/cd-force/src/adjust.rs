//! Goal-seeking adjustment forces and random fluctuation forces.
//!
//! The adjustment pair relaxes each agent toward its navigation targets over
//! the agent's own relaxation times; the fluctuation pair injects a small
//! truncated-normal perturbation from the agent's private random stream so
//! that identical agents do not move in lockstep.

use std::f64::consts::{PI, TAU};

use cd_agent::{AgentRngs, AgentStore, BodyModel};
use cd_core::{AgentId, CdResult, TruncNormal, Vec2, wrap_to_pi};

/// Number of standard deviations at which the fluctuation bands are cut off.
const FLUCTUATION_SIGMAS: f64 = 3.0;

// ── Adjustment ────────────────────────────────────────────────────────────────

/// Accumulate the translational drive toward each active agent's target
/// velocity:
///
///   f = m/τ · (v₀·e₀ − v)
///
/// where `v₀` is the target speed, `e₀` the unit target direction, and `τ`
/// the agent's translational relaxation time.
pub fn force_adjust(store: &mut AgentStore) {
    for i in 0..store.count {
        if !store.active[i] {
            continue;
        }
        let desired = store.target_direction[i] * store.target_velocity[i];
        let scale = store.mass[i] / store.tau_adjust[i];
        store.force[i] += (desired - store.velocity[i]) * scale;
    }
}

/// Accumulate the rotational drive toward each active agent's target heading.
///
/// The desired turning rate scales linearly with the wrapped heading error:
/// a half-turn error demands the full target angular velocity, a small error
/// proportionally less, so the agent decelerates smoothly into its target
/// heading instead of overshooting.  No-op for circular stores, which carry
/// no orientation dynamics.
pub fn torque_adjust(store: &mut AgentStore) {
    if store.body != BodyModel::ThreeCircle {
        return;
    }
    for i in 0..store.count {
        if !store.active[i] {
            continue;
        }
        let heading_error = wrap_to_pi(store.target_angle[i] - store.orientation[i]);
        let desired_rate = heading_error / PI * store.target_angular_velocity[i];
        let scale = store.inertia_rot[i] / store.tau_rotation[i];
        store.torque[i] += scale * (desired_rate - store.angular_velocity[i]);
    }
}

// ── Fluctuation ───────────────────────────────────────────────────────────────

/// Accumulate a random force on every active agent: magnitude drawn from a
/// truncated normal over `[0, 3σ]` (σ is the agent's `std_random_force`),
/// direction uniform over the circle, scaled by the agent's mass.
///
/// Each agent samples only its own RNG, so the draw order never affects any
/// other agent's stream.
pub fn force_fluctuation(store: &mut AgentStore, rngs: &mut AgentRngs) -> CdResult<()> {
    for i in 0..store.count {
        let agent = AgentId(i as u32);
        if !store.active[i] {
            continue;
        }
        let magnitude_dist = TruncNormal::new(store.std_random_force[i], 0.0, FLUCTUATION_SIGMAS)?;
        let rng = rngs.get_mut(agent);
        let magnitude = magnitude_dist.sample(rng.inner());
        let angle = rng.gen_range(0.0..TAU);
        store.force[i] += Vec2::from_angle(angle) * (magnitude * store.mass[i]);
    }
    Ok(())
}

/// Accumulate a random torque on every active agent: drawn from a symmetric
/// truncated normal over `[-3σ, 3σ]`, scaled by the agent's rotational
/// inertia.  No-op for circular stores.
pub fn torque_fluctuation(store: &mut AgentStore, rngs: &mut AgentRngs) -> CdResult<()> {
    if store.body != BodyModel::ThreeCircle {
        return Ok(());
    }
    for i in 0..store.count {
        let agent = AgentId(i as u32);
        if !store.active[i] {
            continue;
        }
        let dist =
            TruncNormal::new(store.std_random_force[i], -FLUCTUATION_SIGMAS, FLUCTUATION_SIGMAS)?;
        let sample = dist.sample(rngs.get_mut(agent).inner());
        store.torque[i] += sample * store.inertia_rot[i];
    }
    Ok(())
}
