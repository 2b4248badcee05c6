//! `cd-core` — foundational types for the `rust_cd` crowd simulation framework.
//!
//! This crate is a dependency of every other `cd-*` crate.  It intentionally
//! has no `cd-*` dependencies and minimal external ones (only `rand`,
//! `rand_distr`, and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`ids`]      | `AgentId`, `WallId`                                   |
//! | [`vec2`]     | `Vec2` f64 vector ops, `wrap_to_pi`                   |
//! | [`time`]     | `SimClock`, `SimConfig` (adaptive-timestep clock)     |
//! | [`rng`]      | `AgentRng` (per-agent), `SimRng`, `TruncNormal`       |
//! | [`error`]    | `CdError`, `CdResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;
pub mod vec2;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CdError, CdResult};
pub use ids::{AgentId, WallId};
pub use rng::{AgentRng, SimRng, TruncNormal};
pub use time::{SimClock, SimConfig};
pub use vec2::{Vec2, wrap_to_pi};
