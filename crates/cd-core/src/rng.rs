//! Deterministic per-agent and simulation-level RNG wrappers, plus the
//! truncated normal distribution used by the fluctuation model.
//!
//! # Determinism strategy
//!
//! Each agent gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive agent IDs uniformly across the seed space.
//! This means:
//!
//! - Agents never share RNG state (no contention, no ordering dependency).
//! - Deactivating agents does not disturb the random streams of the agents
//!   that remain active — runs stay reproducible as the population thins out.
//! - All RNG calls are local to the owning thread; no synchronisation needed.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::{AgentId, CdError, CdResult};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG.
///
/// Create one per agent at simulation init; store in a parallel `Vec<AgentRng>`
/// alongside the other SoA arrays.  The type is `!Sync` to prevent accidental
/// sharing across threads.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for global operations (initial placement jitter,
/// exogenous events, etc.).
///
/// Used only in single-threaded or explicitly synchronised contexts.  If you
/// need parallel randomness, give each worker thread its own `SimRng` seeded
/// from this one.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset — useful for
    /// seeding per-thread RNGs deterministically from the root seed.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}

// ── TruncNormal ───────────────────────────────────────────────────────────────

/// Zero-mean normal distribution truncated to `[lo_sigmas·σ, hi_sigmas·σ]`.
///
/// The fluctuation model draws force magnitudes from the one-sided band
/// `[0, 3σ]` and torques from the symmetric band `[-3σ, 3σ]`.  Sampling uses
/// rejection against the untruncated normal; with a 3σ band the acceptance
/// rate never drops below ~49 %, so the loop terminates quickly.
#[derive(Copy, Clone, Debug)]
pub struct TruncNormal {
    normal: Normal<f64>,
    lo:     f64,
    hi:     f64,
}

impl TruncNormal {
    /// Build a truncated normal with standard deviation `scale`.
    ///
    /// `scale` must be finite and non-negative, and `lo_sigmas < hi_sigmas`.
    /// A zero `scale` degenerates to a constant 0.0 sample, which the
    /// fluctuation model uses for agents with `std_random_force == 0`.
    pub fn new(scale: f64, lo_sigmas: f64, hi_sigmas: f64) -> CdResult<Self> {
        if !scale.is_finite() || scale < 0.0 {
            return Err(CdError::Config(format!(
                "truncated normal scale must be finite and >= 0, got {scale}"
            )));
        }
        if !(lo_sigmas < hi_sigmas) {
            return Err(CdError::Config(format!(
                "truncated normal bounds must satisfy lo < hi, got [{lo_sigmas}, {hi_sigmas}]"
            )));
        }
        let normal = Normal::new(0.0, scale)
            .map_err(|e| CdError::Config(format!("normal distribution: {e}")))?;
        Ok(Self {
            normal,
            lo: lo_sigmas * scale,
            hi: hi_sigmas * scale,
        })
    }

    /// Draw one sample.  Always within `[lo, hi]`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.hi == self.lo {
            return self.lo;
        }
        loop {
            let x = self.normal.sample(rng);
            if x >= self.lo && x <= self.hi {
                return x;
            }
        }
    }
}
