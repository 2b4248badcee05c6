//! Core agent storage: `AgentStore` (SoA data) and `AgentRngs` (per-agent RNG).
//!
//! # Why two structs?
//!
//! The fluctuation pass needs `&mut AgentRngs` (exclusive access to each
//! agent's random stream) and `&mut` access to the force accumulators of the
//! same store at the same time.  Keeping RNGs in a separate `AgentRngs`
//! struct keeps both borrows disjoint without fighting the borrow checker.

use cd_core::{AgentId, AgentRng, CdError, CdResult, Vec2, wrap_to_pi};

use crate::BodyModel;

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, separated from [`AgentStore`] so the
/// fluctuation model can hold `&mut AgentRngs` alongside store borrows.
///
/// `AgentRngs` is `Send` (the inner `SmallRng` is `Send`) but intentionally
/// not `Sync` — per-agent RNG state must never be shared between threads.
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
}

impl AgentRngs {
    /// Allocate and seed `count` per-agent RNGs from `global_seed`.
    pub(crate) fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { inner }
    }

    /// Mutable reference to one agent's RNG.
    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        &mut self.inner[agent.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── KinematicSnapshot ─────────────────────────────────────────────────────────

/// Immutable copy of the externally visible kinematic state, taken between
/// steps.
///
/// Persistence, visualization, and termination-check collaborators read this
/// instead of the live store, so they can never observe a torn mid-step
/// state.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KinematicSnapshot {
    pub position:    Vec<Vec2>,
    pub velocity:    Vec<Vec2>,
    pub orientation: Vec<f64>,
    pub active:      Vec<bool>,
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for all agent state.
///
/// Every `Vec` field has exactly `count` elements; the `AgentId` value is the
/// index into all of them:
///
/// ```ignore
/// let pos = store.position[agent.index()];  // O(1), cache-friendly
/// ```
///
/// Created once at configuration time with fixed capacity; agents are marked
/// `active` as the placement collaborator positions them, and only ever
/// deactivated afterwards (goal reached), never removed.
///
/// The shoulder/front arrays are derived geometry: they are recomputed by
/// [`update_shoulders`](Self::update_shoulders) whenever position or
/// orientation changes and must never be read across a mutation without that
/// recomputation.  For `BodyModel::Circular` stores they stay at `Vec2::ZERO`
/// and nothing reads them.
pub struct AgentStore {
    /// Number of agents.  Equals the length of every SoA `Vec`.
    pub count: usize,

    /// Body variant shared by the whole population.
    pub body: BodyModel,

    /// Participates in physics.  Inactive agents are skipped by every force
    /// and integration pass and never enter the neighbor list.
    pub active: Vec<bool>,

    // ── Kinematic state ───────────────────────────────────────────────────
    /// Center-of-mass position in metres.
    pub position: Vec<Vec2>,
    /// Velocity in m/s.
    pub velocity: Vec<Vec2>,
    /// Body heading in radians, kept in `(-π, π]`.
    pub orientation: Vec<f64>,
    /// Angular velocity in rad/s.
    pub angular_velocity: Vec<f64>,

    // ── Force/torque accumulators ─────────────────────────────────────────
    /// Net force in newtons.  Zeroed at the start of each step; force models
    /// accumulate additively.
    pub force: Vec<Vec2>,
    /// Net torque in N·m.  Zeroed alongside `force`.
    pub torque: Vec<f64>,
    /// Previous step's net force — Verlet state threading from step to step.
    pub force_prev: Vec<Vec2>,
    /// Previous step's net torque, for the rotational Verlet update.
    pub torque_prev: Vec<f64>,

    // ── Physical parameters (immutable after placement) ───────────────────
    /// Mass in kg.  Must be > 0 for active agents.
    pub mass: Vec<f64>,
    /// Full body radius in metres.  Must be > 0 for active agents.
    pub radius: Vec<f64>,
    /// Rotational moment of inertia in kg·m².
    pub inertia_rot: Vec<f64>,
    /// Torso circle radius (three-circle only).
    pub radius_torso: Vec<f64>,
    /// Shoulder circle radius (three-circle only).
    pub radius_shoulder: Vec<f64>,
    /// Distance from torso center to each shoulder center (three-circle only).
    pub torso_shoulder_distance: Vec<f64>,

    // ── Derived geometry (three-circle only) ──────────────────────────────
    pub position_left_shoulder:  Vec<Vec2>,
    pub position_right_shoulder: Vec<Vec2>,
    /// Point ahead of the torso along the heading — where the agent "faces".
    pub front_direction: Vec<Vec2>,

    // ── Targets (written by the navigation collaborator between steps) ────
    /// Preferred speed in m/s.
    pub target_velocity: Vec<f64>,
    /// Unit vector toward the current goal.
    pub target_direction: Vec<Vec2>,
    /// Desired heading in radians.
    pub target_angle: Vec<f64>,
    /// Desired turning rate in rad/s.
    pub target_angular_velocity: Vec<f64>,

    // ── Relaxation constants ──────────────────────────────────────────────
    /// Translational relaxation time in seconds.
    pub tau_adjust: Vec<f64>,
    /// Rotational relaxation time in seconds.
    pub tau_rotation: Vec<f64>,
    /// Standard deviation of the fluctuation force.
    pub std_random_force: Vec<f64>,
}

impl AgentStore {
    /// `true` if there are no agents.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    /// Iterator over the `AgentId`s of active agents only.
    pub fn active_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.active
            .iter()
            .enumerate()
            .filter(|&(_, &a)| a)
            .map(|(i, _)| AgentId(i as u32))
    }

    /// Number of active agents.
    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    // ── Step lifecycle ────────────────────────────────────────────────────

    /// Zero the force/torque accumulators.  Called by the orchestrator at the
    /// start of each step; `force_prev`/`torque_prev` are left intact because
    /// the Verlet integrator threads them across steps.
    pub fn reset_forces(&mut self) {
        self.force.fill(Vec2::ZERO);
        self.torque.fill(0.0);
    }

    /// Recompute shoulder and front positions for one agent from its current
    /// position and orientation.
    ///
    /// No-op for circular stores (nothing reads the derived arrays).
    #[inline]
    pub fn update_shoulders(&mut self, agent: AgentId) {
        if self.body != BodyModel::ThreeCircle {
            return;
        }
        let i = agent.index();
        let heading = Vec2::from_angle(self.orientation[i]);
        let lateral = heading.perp() * self.torso_shoulder_distance[i];
        let pos = self.position[i];
        self.position_left_shoulder[i]  = pos + lateral;
        self.position_right_shoulder[i] = pos - lateral;
        self.front_direction[i] = pos + heading * self.torso_shoulder_distance[i];
    }

    /// Recompute derived geometry for every active agent.  Called after the
    /// rotational integration pass and after external placement/orientation
    /// writes.
    pub fn update_all_shoulders(&mut self) {
        if self.body != BodyModel::ThreeCircle {
            return;
        }
        for i in 0..self.count {
            if self.active[i] {
                self.update_shoulders(AgentId(i as u32));
            }
        }
    }

    /// Normalize every active agent's orientation to `(-π, π]`.
    pub fn normalize_orientations(&mut self) {
        for i in 0..self.count {
            if self.active[i] {
                self.orientation[i] = wrap_to_pi(self.orientation[i]);
            }
        }
    }

    // ── Aggregates used by the adaptive timestep ──────────────────────────

    /// Maximum speed over active agents.  0.0 if none are moving (or active).
    pub fn max_speed(&self) -> f64 {
        let mut v_max = 0.0_f64;
        for i in 0..self.count {
            if self.active[i] {
                v_max = v_max.max(self.velocity[i].length());
            }
        }
        v_max
    }

    /// Maximum target velocity over active agents.  0.0 if none are active.
    pub fn max_target_velocity(&self) -> f64 {
        let mut v_max = 0.0_f64;
        for i in 0..self.count {
            if self.active[i] {
                v_max = v_max.max(self.target_velocity[i]);
            }
        }
        v_max
    }

    // ── Validation ────────────────────────────────────────────────────────

    /// Check the construction invariants for every active agent: positive
    /// mass and radius, and — for three-circle stores — positive sub-circle
    /// radii and rotational inertia.
    ///
    /// Called by the simulation builder before the first step; violations are
    /// configuration errors, never clamped.
    pub fn validate(&self) -> CdResult<()> {
        for agent in self.active_ids() {
            let i = agent.index();
            if self.mass[i] <= 0.0 {
                return Err(CdError::Config(format!(
                    "agent {agent}: mass must be > 0, got {}",
                    self.mass[i]
                )));
            }
            if self.radius[i] <= 0.0 {
                return Err(CdError::Config(format!(
                    "agent {agent}: radius must be > 0, got {}",
                    self.radius[i]
                )));
            }
            if self.body == BodyModel::ThreeCircle {
                if self.radius_torso[i] <= 0.0
                    || self.radius_shoulder[i] <= 0.0
                    || self.torso_shoulder_distance[i] <= 0.0
                {
                    return Err(CdError::Config(format!(
                        "agent {agent}: three-circle radii must be > 0"
                    )));
                }
                if self.inertia_rot[i] <= 0.0 {
                    return Err(CdError::Config(format!(
                        "agent {agent}: rotational inertia must be > 0, got {}",
                        self.inertia_rot[i]
                    )));
                }
            }
        }
        Ok(())
    }

    /// Scan the dynamic state of active agents for NaN/Inf.
    ///
    /// Run by the orchestrator after integration; any hit is fatal for the
    /// step (upstream model/parameter bug — the simulation must not continue
    /// on corrupted state).
    pub fn check_finite(&self) -> CdResult<()> {
        for agent in self.active_ids() {
            let i = agent.index();
            if !self.position[i].is_finite() {
                return Err(CdError::NonFinite { agent, quantity: "position" });
            }
            if !self.velocity[i].is_finite() {
                return Err(CdError::NonFinite { agent, quantity: "velocity" });
            }
            if !self.force[i].is_finite() {
                return Err(CdError::NonFinite { agent, quantity: "force" });
            }
            if !self.orientation[i].is_finite() {
                return Err(CdError::NonFinite { agent, quantity: "orientation" });
            }
            if !self.angular_velocity[i].is_finite() {
                return Err(CdError::NonFinite { agent, quantity: "angular velocity" });
            }
            if !self.torque[i].is_finite() {
                return Err(CdError::NonFinite { agent, quantity: "torque" });
            }
        }
        Ok(())
    }

    // ── Between-step exports ──────────────────────────────────────────────

    /// Copy the externally visible kinematic state.  Cheap relative to a
    /// step; taken only at snapshot intervals.
    pub fn snapshot(&self) -> KinematicSnapshot {
        KinematicSnapshot {
            position:    self.position.clone(),
            velocity:    self.velocity.clone(),
            orientation: self.orientation.clone(),
            active:      self.active.clone(),
        }
    }

    // ── Package-private constructor used by AgentStoreBuilder ─────────────

    pub(crate) fn new(count: usize, body: BodyModel) -> Self {
        Self {
            count,
            body,
            active: vec![false; count],

            position:         vec![Vec2::ZERO; count],
            velocity:         vec![Vec2::ZERO; count],
            orientation:      vec![0.0; count],
            angular_velocity: vec![0.0; count],

            force:       vec![Vec2::ZERO; count],
            torque:      vec![0.0; count],
            force_prev:  vec![Vec2::ZERO; count],
            torque_prev: vec![0.0; count],

            mass:                    vec![0.0; count],
            radius:                  vec![0.0; count],
            inertia_rot:             vec![0.0; count],
            radius_torso:            vec![0.0; count],
            radius_shoulder:         vec![0.0; count],
            torso_shoulder_distance: vec![0.0; count],

            position_left_shoulder:  vec![Vec2::ZERO; count],
            position_right_shoulder: vec![Vec2::ZERO; count],
            front_direction:         vec![Vec2::ZERO; count],

            target_velocity:         vec![0.0; count],
            target_direction:        vec![Vec2::ZERO; count],
            target_angle:            vec![0.0; count],
            target_angular_velocity: vec![0.0; count],

            tau_adjust:       vec![0.0; count],
            tau_rotation:     vec![0.0; count],
            std_random_force: vec![0.0; count],
        }
    }
}
