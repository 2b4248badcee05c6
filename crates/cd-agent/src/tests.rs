//! Unit tests for cd-agent.

use cd_core::{AgentId, Vec2};

use crate::{AgentStoreBuilder, Body, BodyModel};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn circular_store(count: usize) -> crate::AgentStore {
    let (mut store, _) = AgentStoreBuilder::new(count, BodyModel::Circular, 1).build();
    for i in 0..count {
        store.position[i] = Vec2::new(i as f64, 0.0);
        store.active[i] = true;
    }
    store
}

fn three_circle_store(count: usize) -> crate::AgentStore {
    let (mut store, _) = AgentStoreBuilder::new(count, BodyModel::ThreeCircle, 1).build();
    for i in 0..count {
        store.position[i] = Vec2::new(i as f64, 0.0);
        store.active[i] = true;
    }
    store.update_all_shoulders();
    store
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;

    #[test]
    fn build_fills_body_parameters() {
        let (store, rngs) = AgentStoreBuilder::new(5, BodyModel::Circular, 42)
            .body(Body::adult())
            .build();
        assert_eq!(store.count, 5);
        assert_eq!(rngs.len(), 5);
        let b = Body::adult();
        for i in 0..5 {
            assert_eq!(store.mass[i], b.mass);
            assert_eq!(store.radius[i], b.radius);
            assert_eq!(store.target_velocity[i], b.target_velocity);
            assert!(!store.active[i], "agents start inactive");
        }
    }

    #[test]
    fn three_circle_radii_derived_from_ratios() {
        let b = Body::adult();
        let (store, _) = AgentStoreBuilder::new(1, BodyModel::ThreeCircle, 0)
            .body(b)
            .build();
        assert!((store.radius_torso[0] - b.ratio_torso * b.radius).abs() < 1e-12);
        assert!((store.radius_shoulder[0] - b.ratio_shoulder * b.radius).abs() < 1e-12);
    }
}

// ── Store invariants ──────────────────────────────────────────────────────────

#[cfg(test)]
mod store {
    use std::f64::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn active_ids_skips_inactive() {
        let mut store = circular_store(4);
        store.active[2] = false;
        let ids: Vec<_> = store.active_ids().collect();
        assert_eq!(ids, vec![AgentId(0), AgentId(1), AgentId(3)]);
        assert_eq!(store.active_count(), 3);
    }

    #[test]
    fn reset_forces_preserves_force_prev() {
        let mut store = circular_store(2);
        store.force[0] = Vec2::new(3.0, 4.0);
        store.force_prev[0] = Vec2::new(1.0, 1.0);
        store.torque[0] = 2.0;
        store.reset_forces();
        assert_eq!(store.force[0], Vec2::ZERO);
        assert_eq!(store.torque[0], 0.0);
        assert_eq!(store.force_prev[0], Vec2::new(1.0, 1.0));
    }

    #[test]
    fn shoulders_follow_orientation() {
        let mut store = three_circle_store(1);
        store.orientation[0] = 0.0;
        store.update_shoulders(AgentId(0));
        let d = store.torso_shoulder_distance[0];
        let pos = store.position[0];
        // Heading +x: left shoulder at +y, right at -y, front ahead on +x.
        assert!((store.position_left_shoulder[0].y - (pos.y + d)).abs() < 1e-12);
        assert!((store.position_right_shoulder[0].y - (pos.y - d)).abs() < 1e-12);
        assert!((store.front_direction[0].x - (pos.x + d)).abs() < 1e-12);

        store.orientation[0] = FRAC_PI_2;
        store.update_shoulders(AgentId(0));
        // Heading +y: left shoulder now at -x.
        assert!((store.position_left_shoulder[0].x - (pos.x - d)).abs() < 1e-12);
    }

    #[test]
    fn circular_store_shoulder_update_is_noop() {
        let mut store = circular_store(1);
        store.orientation[0] = 1.0;
        store.update_shoulders(AgentId(0));
        assert_eq!(store.position_left_shoulder[0], Vec2::ZERO);
    }

    #[test]
    fn max_speed_over_active_only() {
        let mut store = circular_store(3);
        store.velocity[0] = Vec2::new(1.0, 0.0);
        store.velocity[1] = Vec2::new(0.0, 5.0);
        store.velocity[2] = Vec2::new(9.0, 0.0);
        store.active[2] = false;
        assert_eq!(store.max_speed(), 5.0);
    }

    #[test]
    fn max_speed_empty_population_is_zero() {
        let mut store = circular_store(2);
        store.active.fill(false);
        assert_eq!(store.max_speed(), 0.0);
        assert_eq!(store.max_target_velocity(), 0.0);
    }

    #[test]
    fn snapshot_is_detached_copy() {
        let mut store = circular_store(2);
        let snap = store.snapshot();
        store.position[0] = Vec2::new(99.0, 99.0);
        assert_eq!(snap.position[0], Vec2::new(0.0, 0.0));
        assert_eq!(snap.active, vec![true, true]);
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod validation {
    use super::*;

    #[test]
    fn valid_store_passes() {
        assert!(circular_store(3).validate().is_ok());
        assert!(three_circle_store(3).validate().is_ok());
    }

    #[test]
    fn zero_mass_rejected() {
        let mut store = circular_store(2);
        store.mass[1] = 0.0;
        assert!(store.validate().is_err());
    }

    #[test]
    fn negative_radius_rejected() {
        let mut store = circular_store(1);
        store.radius[0] = -0.1;
        assert!(store.validate().is_err());
    }

    #[test]
    fn inactive_agents_not_validated() {
        let mut store = circular_store(2);
        store.mass[1] = 0.0;
        store.active[1] = false;
        assert!(store.validate().is_ok());
    }

    #[test]
    fn check_finite_flags_nan_position() {
        let mut store = circular_store(2);
        store.position[1] = Vec2::new(f64::NAN, 0.0);
        let err = store.check_finite().unwrap_err();
        assert!(err.to_string().contains("position"));
    }

    #[test]
    fn check_finite_flags_nan_angular_velocity() {
        // Caught in the same scan as the rest of the dynamic state, not one
        // step late through the orientation it would corrupt.
        let mut store = three_circle_store(1);
        store.angular_velocity[0] = f64::NAN;
        let err = store.check_finite().unwrap_err();
        assert!(err.to_string().contains("angular velocity"));
    }

    #[test]
    fn check_finite_flags_inf_velocity() {
        let mut store = circular_store(1);
        store.velocity[0] = Vec2::new(0.0, f64::INFINITY);
        assert!(store.check_finite().is_err());
    }

    #[test]
    fn check_finite_ignores_inactive() {
        let mut store = circular_store(2);
        store.position[1] = Vec2::new(f64::NAN, 0.0);
        store.active[1] = false;
        assert!(store.check_finite().is_ok());
    }
}
