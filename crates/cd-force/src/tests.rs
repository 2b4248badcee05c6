use cd_agent::{AgentRngs, AgentStore, AgentStoreBuilder, Body, BodyModel};
use cd_core::Vec2;
use cd_spatial::{CellGrid, Obstacles};

use crate::{
    ForceParams, agent_agent, agent_wall, force_adjust, force_fluctuation, torque_adjust,
    torque_fluctuation,
};

// ── Test helpers ──────────────────────────────────────────────────────────────

/// Two active circular agents at the given positions, at rest.
fn circular_pair(p0: Vec2, p1: Vec2) -> (AgentStore, AgentRngs) {
    let (mut store, rngs) = AgentStoreBuilder::new(2, BodyModel::Circular, 7).build();
    store.position[0] = p0;
    store.position[1] = p1;
    store.active[0] = true;
    store.active[1] = true;
    (store, rngs)
}

/// Two active three-circle agents facing along +x, shoulders updated.
fn three_circle_pair(p0: Vec2, p1: Vec2) -> (AgentStore, AgentRngs) {
    let (mut store, rngs) = AgentStoreBuilder::new(2, BodyModel::ThreeCircle, 7).build();
    store.position[0] = p0;
    store.position[1] = p1;
    store.active[0] = true;
    store.active[1] = true;
    store.update_all_shoulders();
    (store, rngs)
}

fn grid_for(store: &AgentStore, params: &ForceParams) -> CellGrid {
    let max_radius = store.radius.iter().copied().fold(0.0_f64, f64::max);
    CellGrid::build(&store.position, &store.active, params.interaction_radius(max_radius))
        .expect("valid cell size")
}

fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual} (tolerance {tol})"
    );
}

// ── Params ────────────────────────────────────────────────────────────────────

mod params {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(ForceParams::default().validate().is_ok());
    }

    #[test]
    fn non_positive_range_rejected() {
        let mut p = ForceParams::default();
        p.range_social = 0.0;
        assert!(p.validate().is_err());
        p.range_social = f64::NAN;
        assert!(p.validate().is_err());
    }

    #[test]
    fn negative_stiffness_rejected() {
        let mut p = ForceParams::default();
        p.mu = -1.0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn interaction_radius_covers_two_bodies() {
        let p = ForceParams::default();
        assert_close(p.interaction_radius(0.25), p.sight_social + 0.5, 1e-12);
    }
}

// ── Agent-agent ───────────────────────────────────────────────────────────────

mod agent_agent_pass {
    use super::*;

    #[test]
    fn social_force_matches_exponential_law() {
        let params = ForceParams::default();
        let (mut store, _) = circular_pair(Vec2::ZERO, Vec2::new(1.0, 0.0));
        let grid = grid_for(&store, &params);

        agent_agent(&mut store, &grid, &params);

        let gap = 1.0 - store.radius[0] - store.radius[1];
        let expected = params.strength_social * (-gap / params.range_social).exp();
        assert_close(store.force[0].x, -expected, 1e-9);
        assert_close(store.force[0].y, 0.0, 1e-12);
        assert_close(store.force[1].x, expected, 1e-9);
    }

    #[test]
    fn forces_are_equal_and_opposite() {
        let params = ForceParams::default();
        let (mut store, _) = circular_pair(Vec2::new(0.3, -0.2), Vec2::new(0.9, 0.5));
        store.velocity[0] = Vec2::new(1.0, 0.4);
        store.velocity[1] = Vec2::new(-0.5, 0.1);
        let grid = grid_for(&store, &params);

        agent_agent(&mut store, &grid, &params);

        let net = store.force[0] + store.force[1];
        assert_close(net.x, 0.0, 1e-9);
        assert_close(net.y, 0.0, 1e-9);
        assert!(store.force[0].length() > 0.0);
    }

    #[test]
    fn zero_force_beyond_sight_range() {
        let params = ForceParams::default();
        // Gap just past the sight cutoff.
        let d = params.sight_social + 2.0 * Body::adult().radius + 0.05;
        let (mut store, _) = circular_pair(Vec2::ZERO, Vec2::new(d, 0.0));
        let grid = grid_for(&store, &params);

        agent_agent(&mut store, &grid, &params);

        assert_eq!(store.force[0], Vec2::ZERO);
        assert_eq!(store.force[1], Vec2::ZERO);
    }

    #[test]
    fn static_force_is_continuous_at_contact() {
        let params = ForceParams::default();
        let r2 = 2.0 * Body::adult().radius;
        let eps = 1e-9;

        let (mut outside, _) = circular_pair(Vec2::ZERO, Vec2::new(r2 + eps, 0.0));
        let grid = grid_for(&outside, &params);
        agent_agent(&mut outside, &grid, &params);

        let (mut inside, _) = circular_pair(Vec2::ZERO, Vec2::new(r2 - eps, 0.0));
        let grid = grid_for(&inside, &params);
        agent_agent(&mut inside, &grid, &params);

        // At rest the contact terms vanish with the gap, so the force
        // magnitude approaches A from both sides.
        assert_close(outside.force[0].length(), params.strength_social, 1e-3);
        assert_close(inside.force[0].length(), params.strength_social, 1e-3);
    }

    #[test]
    fn penetration_adds_contact_repulsion() {
        let params = ForceParams::default();
        let r2 = 2.0 * Body::adult().radius;

        let (mut touching, _) = circular_pair(Vec2::ZERO, Vec2::new(r2, 0.0));
        let grid = grid_for(&touching, &params);
        agent_agent(&mut touching, &grid, &params);

        let (mut overlapping, _) = circular_pair(Vec2::ZERO, Vec2::new(r2 - 0.02, 0.0));
        let grid = grid_for(&overlapping, &params);
        agent_agent(&mut overlapping, &grid, &params);

        assert!(overlapping.force[0].length() > touching.force[0].length() + 1_000.0);
    }

    #[test]
    fn coincident_centers_stay_finite() {
        let params = ForceParams::default();
        let (mut store, _) = circular_pair(Vec2::new(2.0, 2.0), Vec2::new(2.0, 2.0));
        let grid = grid_for(&store, &params);

        agent_agent(&mut store, &grid, &params);

        assert!(store.force[0].is_finite());
        assert!(store.force[1].is_finite());
        // Fallback normal is +x, so the pair separates along the x axis.
        assert!(store.force[0].x.abs() > 0.0);
        assert_close(store.force[0].y, 0.0, 1e-9);
    }

    #[test]
    fn three_circle_pair_accumulates_torque_off_axis() {
        let params = ForceParams::default();
        // Rotate one body so the closest approach is shoulder-to-torso: the
        // contact arm is then off the torso center and torque is nonzero.
        let (mut store, _) = three_circle_pair(Vec2::ZERO, Vec2::new(0.35, 0.15));
        store.orientation[0] = std::f64::consts::FRAC_PI_2;
        store.update_all_shoulders();
        let grid = grid_for(&store, &params);

        agent_agent(&mut store, &grid, &params);

        let net = store.force[0] + store.force[1];
        assert_close(net.x, 0.0, 1e-9);
        assert_close(net.y, 0.0, 1e-9);
        assert!(store.torque[0].is_finite());
        assert!(store.torque[1].is_finite());
        assert!(store.torque[0].abs() > 0.0 || store.torque[1].abs() > 0.0);
    }

    #[test]
    fn circular_pass_leaves_torque_untouched() {
        let params = ForceParams::default();
        let (mut store, _) = circular_pair(Vec2::ZERO, Vec2::new(0.4, 0.0));
        let grid = grid_for(&store, &params);

        agent_agent(&mut store, &grid, &params);

        assert_eq!(store.torque[0], 0.0);
        assert_eq!(store.torque[1], 0.0);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_pass_matches_sequential() {
        let params = ForceParams::default();
        let (mut seq, _) = AgentStoreBuilder::new(40, BodyModel::Circular, 11).build();
        let mut rng = cd_core::SimRng::new(11);
        for i in 0..seq.count {
            seq.position[i] = Vec2::new(rng.gen_range(0.0..8.0), rng.gen_range(0.0..8.0));
            seq.velocity[i] = Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
            seq.active[i] = true;
        }
        let mut par = AgentStoreBuilder::new(40, BodyModel::Circular, 11).build().0;
        par.position.copy_from_slice(&seq.position);
        par.velocity.copy_from_slice(&seq.velocity);
        par.active.copy_from_slice(&seq.active);

        let grid = grid_for(&seq, &params);
        agent_agent(&mut seq, &grid, &params);
        crate::agent_agent_parallel(&mut par, &grid, &params);

        for i in 0..seq.count {
            assert_close(par.force[i].x, seq.force[i].x, 1e-6);
            assert_close(par.force[i].y, seq.force[i].y, 1e-6);
        }
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_pass_matches_sequential_three_circle() {
        let params = ForceParams::default();
        let (mut seq, _) = AgentStoreBuilder::new(20, BodyModel::ThreeCircle, 17).build();
        let mut rng = cd_core::SimRng::new(17);
        for i in 0..seq.count {
            seq.position[i] = Vec2::new(rng.gen_range(0.0..5.0), rng.gen_range(0.0..5.0));
            seq.orientation[i] = rng.gen_range(-3.0..3.0);
            seq.active[i] = true;
        }
        seq.update_all_shoulders();
        let mut par = AgentStoreBuilder::new(20, BodyModel::ThreeCircle, 17).build().0;
        par.position.copy_from_slice(&seq.position);
        par.orientation.copy_from_slice(&seq.orientation);
        par.active.copy_from_slice(&seq.active);
        par.update_all_shoulders();

        let grid = grid_for(&seq, &params);
        agent_agent(&mut seq, &grid, &params);
        crate::agent_agent_parallel(&mut par, &grid, &params);

        for i in 0..seq.count {
            assert_close(par.force[i].x, seq.force[i].x, 1e-6);
            assert_close(par.force[i].y, seq.force[i].y, 1e-6);
            assert_close(par.torque[i], seq.torque[i], 1e-6);
        }
    }
}

// ── Agent-wall ────────────────────────────────────────────────────────────────

mod agent_wall_pass {
    use super::*;

    fn floor_wall() -> Obstacles {
        let mut obstacles = Obstacles::new();
        obstacles.add_segment(Vec2::new(-5.0, 0.0), Vec2::new(5.0, 0.0));
        obstacles
    }

    #[test]
    fn wall_pushes_agent_away() {
        let params = ForceParams::default();
        let (mut store, _) = circular_pair(Vec2::new(0.0, 0.5), Vec2::new(100.0, 100.0));

        agent_wall(&mut store, &floor_wall(), &params);

        assert!(store.force[0].y > 0.0);
        assert_close(store.force[0].x, 0.0, 1e-9);
        // The far agent is out of sight of the wall.
        assert_eq!(store.force[1], Vec2::ZERO);
    }

    #[test]
    fn wall_force_is_one_sided() {
        let params = ForceParams::default();
        let (mut store, _) = circular_pair(Vec2::new(0.0, 0.5), Vec2::new(100.0, 100.0));

        let before = store.force[0];
        agent_wall(&mut store, &floor_wall(), &params);

        // Only the agent accumulator changes; there is nothing to react on.
        assert!(store.force[0] != before);
    }

    #[test]
    fn inactive_agents_are_skipped() {
        let params = ForceParams::default();
        let (mut store, _) = circular_pair(Vec2::new(0.0, 0.3), Vec2::new(0.0, 0.4));
        store.active[0] = false;

        agent_wall(&mut store, &floor_wall(), &params);

        assert_eq!(store.force[0], Vec2::ZERO);
        assert!(store.force[1].length() > 0.0);
    }

    #[test]
    fn no_obstacles_is_a_no_op() {
        let params = ForceParams::default();
        let (mut store, _) = circular_pair(Vec2::ZERO, Vec2::new(1.0, 0.0));

        agent_wall(&mut store, &Obstacles::new(), &params);

        assert_eq!(store.force[0], Vec2::ZERO);
    }

    #[test]
    fn three_circle_wall_contact_accumulates_torque() {
        let params = ForceParams::default();
        // Tilted heading, wall below: the near shoulder is closest and sits
        // off the vertical through the torso, so the contact arm has a
        // horizontal component and the wall force produces torque.
        let (mut store, _) = three_circle_pair(Vec2::new(0.0, 0.3), Vec2::new(100.0, 100.0));
        store.orientation[0] = 0.5;
        store.update_all_shoulders();

        agent_wall(&mut store, &floor_wall(), &params);

        assert!(store.force[0].y > 0.0);
        assert!(store.torque[0].abs() > 0.0);
    }
}

// ── Adjustment ────────────────────────────────────────────────────────────────

mod adjust {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn force_adjust_matches_relaxation_law() {
        let (mut store, _) = circular_pair(Vec2::ZERO, Vec2::new(10.0, 0.0));
        store.velocity[0] = Vec2::new(0.5, -0.25);
        store.target_direction[0] = Vec2::new(0.0, 1.0);
        store.target_velocity[0] = 1.5;

        force_adjust(&mut store);

        let scale = store.mass[0] / store.tau_adjust[0];
        assert_close(store.force[0].x, scale * -0.5, 1e-9);
        assert_close(store.force[0].y, scale * (1.5 + 0.25), 1e-9);
    }

    #[test]
    fn force_adjust_vanishes_at_target_velocity() {
        let (mut store, _) = circular_pair(Vec2::ZERO, Vec2::new(10.0, 0.0));
        store.velocity[0] = store.target_direction[0] * store.target_velocity[0];

        force_adjust(&mut store);

        assert_close(store.force[0].length(), 0.0, 1e-12);
    }

    #[test]
    fn torque_adjust_turns_toward_target_heading() {
        let (mut store, _) = three_circle_pair(Vec2::ZERO, Vec2::new(10.0, 0.0));
        store.orientation[0] = 0.0;
        store.target_angle[0] = FRAC_PI_2;
        store.angular_velocity[0] = 0.0;

        torque_adjust(&mut store);

        assert!(store.torque[0] > 0.0);
        // Half the heading error of a half-turn demands half the target rate.
        let expected = store.inertia_rot[0] / store.tau_rotation[0]
            * (0.5 * store.target_angular_velocity[0]);
        assert_close(store.torque[0], expected, 1e-9);
    }

    #[test]
    fn torque_adjust_is_noop_for_circular_bodies() {
        let (mut store, _) = circular_pair(Vec2::ZERO, Vec2::new(10.0, 0.0));
        store.target_angle[0] = FRAC_PI_2;

        torque_adjust(&mut store);

        assert_eq!(store.torque[0], 0.0);
    }

    #[test]
    fn torque_adjust_takes_the_short_way_around() {
        let (mut store, _) = three_circle_pair(Vec2::ZERO, Vec2::new(10.0, 0.0));
        store.orientation[0] = 3.0;
        store.target_angle[0] = -3.0;

        torque_adjust(&mut store);

        // The wrapped error is +0.28 rad, not -6 rad.
        assert!(store.torque[0] > 0.0);
    }
}

// ── Fluctuation ───────────────────────────────────────────────────────────────

mod fluctuation {
    use super::*;

    #[test]
    fn force_magnitude_stays_within_band() {
        let (mut store, mut rngs) = circular_pair(Vec2::ZERO, Vec2::new(10.0, 0.0));
        let bound = 3.0 * store.std_random_force[0] * store.mass[0] + 1e-9;

        for _ in 0..500 {
            store.reset_forces();
            force_fluctuation(&mut store, &mut rngs).unwrap();
            assert!(store.force[0].length() <= bound);
            assert!(store.force[0].length() >= 0.0);
        }
    }

    #[test]
    fn torque_stays_within_symmetric_band() {
        let (mut store, mut rngs) = three_circle_pair(Vec2::ZERO, Vec2::new(10.0, 0.0));
        let bound = 3.0 * store.std_random_force[0] * store.inertia_rot[0] + 1e-9;

        for _ in 0..500 {
            store.reset_forces();
            torque_fluctuation(&mut store, &mut rngs).unwrap();
            assert!(store.torque[0].abs() <= bound);
        }
    }

    #[test]
    fn zero_sigma_gives_zero_force() {
        let (mut store, mut rngs) = circular_pair(Vec2::ZERO, Vec2::new(10.0, 0.0));
        store.std_random_force.fill(0.0);

        force_fluctuation(&mut store, &mut rngs).unwrap();

        assert_eq!(store.force[0], Vec2::ZERO);
        assert_eq!(store.force[1], Vec2::ZERO);
    }

    #[test]
    fn inactive_agents_draw_nothing() {
        let (mut store, mut rngs) = circular_pair(Vec2::ZERO, Vec2::new(10.0, 0.0));
        store.active[1] = false;

        force_fluctuation(&mut store, &mut rngs).unwrap();

        assert_eq!(store.force[1], Vec2::ZERO);
    }

    #[test]
    fn same_seed_same_draws() {
        let (mut a, mut rngs_a) = circular_pair(Vec2::ZERO, Vec2::new(10.0, 0.0));
        let (mut b, mut rngs_b) = circular_pair(Vec2::ZERO, Vec2::new(10.0, 0.0));

        for _ in 0..10 {
            force_fluctuation(&mut a, &mut rngs_a).unwrap();
            force_fluctuation(&mut b, &mut rngs_b).unwrap();
        }

        assert_eq!(a.force[0], b.force[0]);
        assert_eq!(a.force[1], b.force[1]);
    }

    #[test]
    fn torque_fluctuation_is_noop_for_circular_bodies() {
        let (mut store, mut rngs) = circular_pair(Vec2::ZERO, Vec2::new(10.0, 0.0));

        torque_fluctuation(&mut store, &mut rngs).unwrap();

        assert_eq!(store.torque[0], 0.0);
    }
}
