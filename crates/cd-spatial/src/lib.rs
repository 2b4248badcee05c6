//! `cd-spatial` — neighbor indexing and obstacle geometry.
//!
//! # Two concerns
//!
//! [`CellGrid`] is the block list: a uniform spatial grid rebuilt every step
//! from current agent positions, producing candidate interaction pairs in
//! O(n) amortized instead of the O(n²) all-pairs distance check.
//!
//! [`Obstacles`] holds the immutable wall geometry (line segments and
//! circular arcs) that the force model tests agents against, via
//! closest-point projection.

pub mod error;
pub mod grid;
pub mod walls;


pub use error::{SpatialError, SpatialResult};
pub use grid::CellGrid;
pub use walls::{Obstacles, Wall};
