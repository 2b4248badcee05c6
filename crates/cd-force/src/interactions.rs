//! Pairwise agent-agent and one-sided agent-wall interaction forces.
//!
//! # The repulsion/contact law
//!
//! Every interaction is parameterized by the skin-to-skin gap `h` (body
//! surface to body surface; negative means penetration) and the unit normal
//! `n` pointing from the other body toward this one:
//!
//! - `h < sight_social`: psychological repulsion `A·exp(-h/B)·n`.
//! - `h < 0` additionally: frictional contact
//!   `-h·μ·n + h·κ·(v_rel·t)·t + c_d·(v_rel·n)·n`
//!   with `t = n⊥` and `v_rel` the relative velocity of this body against
//!   the other (walls are immovable, so `v_rel` is the agent's velocity).
//! - `h ≥ sight_social`: exactly zero.  The neighbor grid over-approximates
//!   its candidate set, so out-of-range pairs are routine, never an error.
//!
//! Coincident centers give a zero separation vector; the normal falls back
//! to a fixed `(1, 0)` so the degenerate case stays finite.
//!
//! # Body-variant dispatch
//!
//! The store-wide [`BodyModel`] tag is matched once at the top of each pass.
//! Circular bodies use the full-body radius and accumulate no torque.
//! Three-circle bodies take the minimum gap over the 3×3 torso/shoulder
//! sub-circle combinations and accumulate torque `r × f` about the torso
//! center from the contact-point offset.

use cd_agent::{AgentStore, BodyModel};
use cd_core::Vec2;
use cd_spatial::{CellGrid, Obstacles, Wall};

use crate::ForceParams;

/// Stable fallback normal for coincident centers.
const DEGENERATE_NORMAL: Vec2 = Vec2 { x: 1.0, y: 0.0 };

// ── Core force law ────────────────────────────────────────────────────────────

/// Total interaction force for gap `h` along normal `n`, with `v_rel` the
/// relative velocity of the receiving body.  Zero at or beyond the social
/// sight range.
#[inline]
fn interaction_force(params: &ForceParams, h: f64, n: Vec2, v_rel: Vec2) -> Vec2 {
    if h >= params.sight_social {
        return Vec2::ZERO;
    }
    let mut f = n * (params.strength_social * (-h / params.range_social).exp());
    if h < 0.0 {
        let t = n.perp();
        f += n * (-h * params.mu);
        f += t * (h * params.kappa * v_rel.dot(t));
        f += n * (params.damping * v_rel.dot(n));
    }
    f
}

/// Gap and normal between two circles.  `n` points from circle `j` toward
/// circle `i`.
#[inline]
fn gap_circles(c_i: Vec2, r_i: f64, c_j: Vec2, r_j: f64) -> (f64, Vec2) {
    let delta = c_i - c_j;
    let dist = delta.length();
    let n = delta.normalized_or(DEGENERATE_NORMAL);
    (dist - r_i - r_j, n)
}

// ── Three-circle geometry ─────────────────────────────────────────────────────

/// Closest approach between two bodies, with torque arms.
#[derive(Copy, Clone, Debug)]
struct Gap {
    /// Skin-to-skin distance; negative means penetration.
    h: f64,
    /// Unit normal pointing from body `j` toward body `i`.
    n: Vec2,
    /// Contact-point offset from body `i`'s center of mass.
    arm_i: Vec2,
    /// Contact-point offset from body `j`'s center of mass.
    arm_j: Vec2,
}

/// Torso + both shoulders of agent `i` as `(center, radius)` circles.
#[inline]
fn sub_circles(store: &AgentStore, i: usize) -> [(Vec2, f64); 3] {
    [
        (store.position[i], store.radius_torso[i]),
        (store.position_left_shoulder[i], store.radius_shoulder[i]),
        (store.position_right_shoulder[i], store.radius_shoulder[i]),
    ]
}

/// Minimum gap over the 3×3 sub-circle combinations of two three-circle
/// bodies.
fn gap_three_circle(store: &AgentStore, i: usize, j: usize) -> Gap {
    let circles_i = sub_circles(store, i);
    let circles_j = sub_circles(store, j);

    let mut best = Gap { h: f64::INFINITY, n: DEGENERATE_NORMAL, arm_i: Vec2::ZERO, arm_j: Vec2::ZERO };
    for (c_i, r_i) in circles_i {
        for (c_j, r_j) in circles_j {
            let (h, n) = gap_circles(c_i, r_i, c_j, r_j);
            if h < best.h {
                best = Gap {
                    h,
                    n,
                    arm_i: c_i - n * r_i - store.position[i],
                    arm_j: c_j + n * r_j - store.position[j],
                };
            }
        }
    }
    best
}

// ── Agent-agent pass ──────────────────────────────────────────────────────────

/// Accumulate pairwise social + contact forces over the grid's candidate
/// pairs.  Forces are applied equal-and-opposite to both agents; three-circle
/// stores additionally accumulate torque.
///
/// The grid indexes active agents only, so inactive agents never appear here.
pub fn agent_agent(store: &mut AgentStore, grid: &CellGrid, params: &ForceParams) {
    match store.body {
        BodyModel::Circular => {
            grid.for_each_pair(|i, j| {
                let (i, j) = (i.index(), j.index());
                let (h, n) =
                    gap_circles(store.position[i], store.radius[i], store.position[j], store.radius[j]);
                if h >= params.sight_social {
                    return;
                }
                let v_rel = store.velocity[i] - store.velocity[j];
                let f = interaction_force(params, h, n, v_rel);
                store.force[i] += f;
                store.force[j] -= f;
            });
        }
        BodyModel::ThreeCircle => {
            grid.for_each_pair(|i, j| {
                let (i, j) = (i.index(), j.index());
                let gap = gap_three_circle(store, i, j);
                if gap.h >= params.sight_social {
                    return;
                }
                let v_rel = store.velocity[i] - store.velocity[j];
                let f = interaction_force(params, gap.h, gap.n, v_rel);
                store.force[i] += f;
                store.force[j] -= f;
                store.torque[i] += gap.arm_i.cross(f);
                store.torque[j] += gap.arm_j.cross(-f);
            });
        }
    }
}

/// Per-agent parallel variant of [`agent_agent`].
///
/// Each Rayon worker sums the forces on exactly one agent from the symmetric
/// 3×3 neighbor query, so no two workers ever write the same accumulator; the
/// sums are scattered into the store sequentially afterwards.  Every pair is
/// evaluated twice (once from each side) — the redundant arithmetic is the
/// price of lock-free accumulation, and pays off once the population is large
/// enough to saturate the pool.
#[cfg(feature = "parallel")]
pub fn agent_agent_parallel(store: &mut AgentStore, grid: &CellGrid, params: &ForceParams) {
    use rayon::prelude::*;

    let snapshot: &AgentStore = store;
    let sums: Vec<(Vec2, f64)> = match snapshot.body {
        BodyModel::Circular => (0..snapshot.count)
            .into_par_iter()
            .map(|i| {
                if !snapshot.active[i] {
                    return (Vec2::ZERO, 0.0);
                }
                let mut f_sum = Vec2::ZERO;
                grid.for_each_neighbor(snapshot.position[i], |j| {
                    let j = j.index();
                    if j == i {
                        return;
                    }
                    let (h, n) = gap_circles(
                        snapshot.position[i],
                        snapshot.radius[i],
                        snapshot.position[j],
                        snapshot.radius[j],
                    );
                    if h >= params.sight_social {
                        return;
                    }
                    let v_rel = snapshot.velocity[i] - snapshot.velocity[j];
                    f_sum += interaction_force(params, h, n, v_rel);
                });
                (f_sum, 0.0)
            })
            .collect(),
        BodyModel::ThreeCircle => (0..snapshot.count)
            .into_par_iter()
            .map(|i| {
                if !snapshot.active[i] {
                    return (Vec2::ZERO, 0.0);
                }
                let mut f_sum = Vec2::ZERO;
                let mut t_sum = 0.0;
                grid.for_each_neighbor(snapshot.position[i], |j| {
                    let j = j.index();
                    if j == i {
                        return;
                    }
                    let gap = gap_three_circle(snapshot, i, j);
                    if gap.h >= params.sight_social {
                        return;
                    }
                    let v_rel = snapshot.velocity[i] - snapshot.velocity[j];
                    let f = interaction_force(params, gap.h, gap.n, v_rel);
                    f_sum += f;
                    t_sum += gap.arm_i.cross(f);
                });
                (f_sum, t_sum)
            })
            .collect(),
    };

    for (i, (f, t)) in sums.into_iter().enumerate() {
        store.force[i] += f;
        store.torque[i] += t;
    }
}

// ── Agent-wall pass ───────────────────────────────────────────────────────────

/// Accumulate one-sided wall repulsion/contact forces for every active agent
/// against every wall.  Walls are immovable: there is no reaction force, and
/// `v_rel` is the agent's own velocity.
pub fn agent_wall(store: &mut AgentStore, obstacles: &Obstacles, params: &ForceParams) {
    if obstacles.is_empty() {
        return;
    }
    match store.body {
        BodyModel::Circular => {
            for i in 0..store.count {
                if !store.active[i] {
                    continue;
                }
                for (_, wall) in obstacles.iter() {
                    let surface = wall.closest_point(store.position[i]);
                    let (h, n) = gap_circles(store.position[i], store.radius[i], surface, 0.0);
                    if h >= params.sight_social {
                        continue;
                    }
                    store.force[i] += interaction_force(params, h, n, store.velocity[i]);
                }
            }
        }
        BodyModel::ThreeCircle => {
            for i in 0..store.count {
                if !store.active[i] {
                    continue;
                }
                for (_, wall) in obstacles.iter() {
                    let gap = wall_gap_three_circle(store, i, wall);
                    if gap.h >= params.sight_social {
                        continue;
                    }
                    let f = interaction_force(params, gap.h, gap.n, store.velocity[i]);
                    store.force[i] += f;
                    store.torque[i] += gap.arm_i.cross(f);
                }
            }
        }
    }
}

/// Minimum gap between a three-circle body and a wall: each sub-circle is
/// projected to its own closest wall point.
fn wall_gap_three_circle(store: &AgentStore, i: usize, wall: &Wall) -> Gap {
    let mut best = Gap { h: f64::INFINITY, n: DEGENERATE_NORMAL, arm_i: Vec2::ZERO, arm_j: Vec2::ZERO };
    for (c, r) in sub_circles(store, i) {
        let surface = wall.closest_point(c);
        let (h, n) = gap_circles(c, r, surface, 0.0);
        if h < best.h {
            best = Gap {
                h,
                n,
                arm_i: c - n * r - store.position[i],
                arm_j: Vec2::ZERO,
            };
        }
    }
    best
}
