//! Material and social-force constants.

use crate::{ForceError, ForceResult};

/// Constants of the repulsion/contact law, shared by the agent-agent and
/// agent-wall passes.
///
/// Defaults are the Helbing panic-model constants scaled for an average
/// adult; scenario configuration may override any of them.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForceParams {
    /// Social repulsion strength `A` in newtons — the force magnitude at
    /// zero skin-to-skin gap.
    pub strength_social: f64,

    /// Social repulsion decay length `B` in metres.
    pub range_social: f64,

    /// Gap beyond which the social force is treated as exactly zero, in
    /// metres.  Also bounds the neighbor-search cutoff.
    pub sight_social: f64,

    /// Body compression constant `μ` in kg/s² — normal contact stiffness.
    pub mu: f64,

    /// Sliding friction constant `κ` in kg/(m·s).
    pub kappa: f64,

    /// Velocity-normal damping constant in kg/s.
    pub damping: f64,
}

impl ForceParams {
    /// Check that every constant is finite and in its legal range.
    pub fn validate(&self) -> ForceResult<()> {
        let positive: [(&'static str, f64); 2] = [
            ("range_social", self.range_social),
            ("sight_social", self.sight_social),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ForceError::InvalidParam {
                    name,
                    requirement: "finite and > 0",
                    value,
                });
            }
        }
        let non_negative: [(&'static str, f64); 4] = [
            ("strength_social", self.strength_social),
            ("mu", self.mu),
            ("kappa", self.kappa),
            ("damping", self.damping),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ForceError::InvalidParam {
                    name,
                    requirement: "finite and >= 0",
                    value,
                });
            }
        }
        Ok(())
    }

    /// Center-to-center cutoff distance for the neighbor grid: two bodies of
    /// the largest radius interact only while their centers are closer than
    /// this.  The orchestrator uses it as the grid cell side.
    #[inline]
    pub fn interaction_radius(&self, max_body_radius: f64) -> f64 {
        self.sight_social + 2.0 * max_body_radius
    }
}

impl Default for ForceParams {
    fn default() -> Self {
        Self {
            strength_social: 2_000.0,
            range_social:    0.3,
            sight_social:    3.0,
            mu:              1.2e5,
            kappa:           4.0e4,
            damping:         500.0,
        }
    }
}
