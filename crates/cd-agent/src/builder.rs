//! Fluent builder for constructing `AgentStore` + `AgentRngs` in one step.
//!
//! # Usage
//!
//! ```rust
//! use cd_agent::{AgentStoreBuilder, Body, BodyModel};
//! use cd_core::Vec2;
//!
//! let (mut store, rngs) = AgentStoreBuilder::new(100, BodyModel::Circular, /*seed=*/ 42)
//!     .body(Body::adult())
//!     .build();
//!
//! assert_eq!(store.count, 100);
//! assert_eq!(rngs.len(),  100);
//!
//! // The placement collaborator writes positions/targets, then activates:
//! store.position[0] = Vec2::new(1.0, 2.0);
//! store.target_direction[0] = Vec2::new(1.0, 0.0);
//! store.active[0] = true;
//! ```

use cd_core::Vec2;

use crate::{AgentRngs, AgentStore, Body, BodyModel};

/// Fluent builder for [`AgentStore`] + [`AgentRngs`].
///
/// All arrays are pre-allocated at construction time and the parameter
/// columns filled from one [`Body`] table, so later per-agent writes (from
/// the placement collaborator) are simple indexed assignments, not pushes.
/// Per-agent variation — sampled radii, per-agent target speeds — is applied
/// by overwriting individual elements after `build()`.
pub struct AgentStoreBuilder {
    count: usize,
    model: BodyModel,
    seed:  u64,
    body:  Body,
}

impl AgentStoreBuilder {
    /// Create a builder for `count` agents of the given body variant, using
    /// `seed` as the global RNG seed.
    pub fn new(count: usize, model: BodyModel, seed: u64) -> Self {
        Self {
            count,
            model,
            seed,
            body: Body::adult(),
        }
    }

    /// Use `body` as the parameter table for every agent (default:
    /// [`Body::adult`]).
    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Construct `AgentStore` and `AgentRngs`.
    ///
    /// All agents start inactive at the origin with zero velocity; the
    /// parameter columns are uniform per the builder's [`Body`].  Positive
    /// mass/radius is checked later by [`AgentStore::validate`], after the
    /// placement collaborator has had a chance to overwrite per-agent values.
    pub fn build(self) -> (AgentStore, AgentRngs) {
        let mut store = AgentStore::new(self.count, self.model);
        let b = &self.body;

        store.mass.fill(b.mass);
        store.radius.fill(b.radius);
        store.inertia_rot.fill(b.inertia_rot);
        store.radius_torso.fill(b.radius_torso());
        store.radius_shoulder.fill(b.radius_shoulder());
        store.torso_shoulder_distance.fill(b.torso_shoulder_distance());

        store.target_velocity.fill(b.target_velocity);
        store.target_direction.fill(Vec2::new(1.0, 0.0));
        store.target_angular_velocity.fill(b.target_angular_velocity);

        store.tau_adjust.fill(b.tau_adjust);
        store.tau_rotation.fill(b.tau_rotation);
        store.std_random_force.fill(b.std_random_force);

        let rngs = AgentRngs::new(self.count, self.seed);
        (store, rngs)
    }
}
