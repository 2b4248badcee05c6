//! Uniform-grid neighbor index (the "block list").
//!
//! # Data layout
//!
//! Agents are bucketed by integer cell coordinate `(floor(x/s), floor(y/s))`
//! where `s` is the cell side, chosen ≥ the interaction cutoff radius so any
//! pair within range lies in the same or an adjacent cell.  The cell map is
//! an `FxHashMap<(i32, i32), Vec<u32>>` — integer keys, hot path, so FxHash
//! instead of SipHash.
//!
//! # Pair enumeration
//!
//! [`CellGrid::for_each_pair`] walks each occupied cell and pairs its members
//! with (a) every later member of the same cell and (b) every member of the
//! four forward-adjacent cells `(+1,0) (0,+1) (+1,+1) (+1,-1)`.  The half
//! stencil visits each unordered cell pair exactly once, so every candidate
//! pair is produced exactly once.  Candidates may be farther apart than the
//! cutoff (cell-diagonal slack); the force model re-checks exact distance and
//! treats out-of-range pairs as zero force.
//!
//! The grid is rebuilt from scratch every step — positions change each tick,
//! and the O(n) rebuild is cheap next to the force pass.

use rustc_hash::FxHashMap;

use cd_core::{AgentId, Vec2};

use crate::{SpatialError, SpatialResult};

/// Forward half-stencil: each unordered pair of adjacent cells is visited
/// from exactly one side.
const HALF_STENCIL: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Uniform spatial grid over active agent positions.
pub struct CellGrid {
    cell_size: f64,
    cells:     FxHashMap<(i32, i32), Vec<u32>>,
}

impl CellGrid {
    /// Bucket every active agent into a cell of side `cell_size`.
    ///
    /// `cell_size` must be ≥ the interaction cutoff for the adjacency
    /// guarantee to hold; the caller (the orchestrator) derives it from the
    /// force model's sight range plus the largest body radius.
    pub fn build(positions: &[Vec2], active: &[bool], cell_size: f64) -> SpatialResult<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(SpatialError::InvalidCellSize(cell_size));
        }
        if positions.len() != active.len() {
            return Err(SpatialError::LengthMismatch {
                positions: positions.len(),
                active:    active.len(),
            });
        }

        let mut cells: FxHashMap<(i32, i32), Vec<u32>> = FxHashMap::default();
        for (i, pos) in positions.iter().enumerate() {
            if !active[i] {
                continue;
            }
            cells
                .entry(cell_of(*pos, cell_size))
                .or_default()
                .push(i as u32);
        }

        Ok(Self { cell_size, cells })
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of indexed (active) agents.
    pub fn agent_count(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    /// Visit every candidate pair exactly once.
    ///
    /// Pair order within a call is deterministic per cell but depends on hash
    /// map iteration order across cells; force accumulation is additive and
    /// order-independent, so this does not affect results.
    pub fn for_each_pair(&self, mut f: impl FnMut(AgentId, AgentId)) {
        for (&(cx, cy), members) in &self.cells {
            // Pairs within the cell.
            for (k, &i) in members.iter().enumerate() {
                for &j in &members[k + 1..] {
                    f(AgentId(i), AgentId(j));
                }
            }
            // Pairs against the four forward-adjacent cells.
            for (dx, dy) in HALF_STENCIL {
                if let Some(neighbors) = self.cells.get(&(cx + dx, cy + dy)) {
                    for &i in members {
                        for &j in neighbors {
                            f(AgentId(i), AgentId(j));
                        }
                    }
                }
            }
        }
    }

    /// Collect the candidate pair set.  Convenience over
    /// [`for_each_pair`](Self::for_each_pair) for tests and one-shot callers.
    pub fn candidate_pairs(&self) -> Vec<(AgentId, AgentId)> {
        let mut pairs = Vec::new();
        self.for_each_pair(|i, j| pairs.push((i, j)));
        pairs
    }

    /// Visit every indexed agent in the full 3×3 stencil around `position`,
    /// including the querying agent itself if it is indexed.
    ///
    /// This is the symmetric query used by the per-agent parallel force path:
    /// each worker sums forces on its own agent only, so candidates must be
    /// visible from both sides of a pair.
    pub fn for_each_neighbor(&self, position: Vec2, mut f: impl FnMut(AgentId)) {
        let (cx, cy) = cell_of(position, self.cell_size);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(members) = self.cells.get(&(cx + dx, cy + dy)) {
                    for &j in members {
                        f(AgentId(j));
                    }
                }
            }
        }
    }
}

#[inline]
fn cell_of(pos: Vec2, cell_size: f64) -> (i32, i32) {
    (
        (pos.x / cell_size).floor() as i32,
        (pos.y / cell_size).floor() as i32,
    )
}
