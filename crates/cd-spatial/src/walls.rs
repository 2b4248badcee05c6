//! Wall geometry: line segments, circular arcs, and the obstacle collection.
//!
//! Walls are immutable once constructed and consumed read-only by the force
//! model: for each active agent it asks for the closest point on each wall
//! and applies the one-sided repulsion/contact law against it (walls are
//! immovable; there is no reaction force).

use cd_core::{Vec2, WallId, wrap_to_pi};

/// One wall primitive.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Wall {
    /// Straight segment from `start` to `end`.  A zero-length segment is
    /// degenerate but legal; its closest point is simply `start`.
    Segment { start: Vec2, end: Vec2 },
    /// Circular arc around `center`, swept counter-clockwise from
    /// `angle_start` to `angle_end` (radians, each in `(-π, π]`).
    Arc {
        center:      Vec2,
        radius:      f64,
        angle_start: f64,
        angle_end:   f64,
    },
}

impl Wall {
    /// The point on this wall closest to `p`.
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        match *self {
            Wall::Segment { start, end } => closest_on_segment(p, start, end),
            Wall::Arc { center, radius, angle_start, angle_end } => {
                closest_on_arc(p, center, radius, angle_start, angle_end)
            }
        }
    }

    /// Euclidean distance from `p` to the wall surface.
    #[inline]
    pub fn distance(&self, p: Vec2) -> f64 {
        (p - self.closest_point(p)).length()
    }
}

/// Project `p` onto the segment, clamping to the endpoints.
fn closest_on_segment(p: Vec2, start: Vec2, end: Vec2) -> Vec2 {
    let d = end - start;
    let len_sq = d.length_sq();
    if len_sq == 0.0 {
        // Zero-length segment: recovered locally, not an error.
        return start;
    }
    let t = ((p - start).dot(d) / len_sq).clamp(0.0, 1.0);
    start + d * t
}

fn closest_on_arc(p: Vec2, center: Vec2, radius: f64, angle_start: f64, angle_end: f64) -> Vec2 {
    let d = p - center;
    if d.length_sq() == 0.0 {
        // Query at the arc center: every arc point is equidistant; pick the
        // start endpoint as the stable answer.
        return center + Vec2::from_angle(angle_start) * radius;
    }
    let a = d.angle();
    if angle_contains(a, angle_start, angle_end) {
        return center + Vec2::from_angle(a) * radius;
    }
    // Outside the sweep: the closest point is one of the two endpoints.
    let p0 = center + Vec2::from_angle(angle_start) * radius;
    let p1 = center + Vec2::from_angle(angle_end) * radius;
    if (p - p0).length_sq() <= (p - p1).length_sq() { p0 } else { p1 }
}

/// Whether angle `a` lies in the counter-clockwise sweep from `start` to
/// `end`, all normalized to `(-π, π]`.
fn angle_contains(a: f64, start: f64, end: f64) -> bool {
    let (a, start, end) = (wrap_to_pi(a), wrap_to_pi(start), wrap_to_pi(end));
    if start <= end {
        (start..=end).contains(&a)
    } else {
        // Sweep crosses the ±π seam.
        a >= start || a <= end
    }
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

/// The full wall set for a scenario.  Built once by the configuration
/// collaborator; read-only thereafter.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacles {
    walls: Vec<Wall>,
}

impl Obstacles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a straight wall segment.
    pub fn add_segment(&mut self, start: Vec2, end: Vec2) -> WallId {
        self.push(Wall::Segment { start, end })
    }

    /// Add a circular arc wall.
    pub fn add_arc(&mut self, center: Vec2, radius: f64, angle_start: f64, angle_end: f64) -> WallId {
        self.push(Wall::Arc { center, radius, angle_start, angle_end })
    }

    /// Add an ordered sequence of segments through `points` (a linear wall).
    /// Fewer than two points adds nothing.
    pub fn add_polyline(&mut self, points: &[Vec2]) {
        for pair in points.windows(2) {
            self.add_segment(pair[0], pair[1]);
        }
    }

    fn push(&mut self, wall: Wall) -> WallId {
        let id = WallId(self.walls.len() as u32);
        self.walls.push(wall);
        id
    }

    #[inline]
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Iterate walls with their IDs.
    pub fn iter(&self) -> impl Iterator<Item = (WallId, &Wall)> + '_ {
        self.walls
            .iter()
            .enumerate()
            .map(|(i, w)| (WallId(i as u32), w))
    }
}
