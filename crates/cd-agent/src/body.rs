//! Body variant tag and tabular body parameters.

/// Which geometric body approximation the whole population uses.
///
/// The variant is homogeneous across the store: per-agent body *size* varies,
/// but every agent shares one distance function and one integration scheme.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BodyModel {
    /// Single circle of `radius` around the center of mass.
    Circular,
    /// Torso circle plus two shoulder circles, capturing shoulder rotation
    /// during turns.  Adds orientation/torque dynamics.
    ThreeCircle,
}

impl BodyModel {
    /// Whether this body variant carries rotational state that the integrator
    /// must advance (orientation, angular velocity, shoulder geometry).
    #[inline]
    pub fn is_orientable(self) -> bool {
        matches!(self, BodyModel::ThreeCircle)
    }
}

/// Per-body-type physical parameters, used by [`AgentStoreBuilder`] to fill
/// the parameter arrays.
///
/// The three-circle radii are expressed as ratios of the full body `radius`,
/// following the anthropometric tables the placement collaborator works from.
///
/// [`AgentStoreBuilder`]: crate::AgentStoreBuilder
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Body {
    /// Mass in kilograms.
    pub mass: f64,
    /// Full body radius in metres.
    pub radius: f64,
    /// Torso radius as a fraction of `radius`.
    pub ratio_torso: f64,
    /// Shoulder radius as a fraction of `radius`.
    pub ratio_shoulder: f64,
    /// Center-to-shoulder distance as a fraction of `radius`.
    pub ratio_torso_shoulder: f64,
    /// Rotational moment of inertia in kg·m².
    pub inertia_rot: f64,
    /// Preferred walking speed in m/s.
    pub target_velocity: f64,
    /// Preferred turning rate in rad/s.
    pub target_angular_velocity: f64,
    /// Translational relaxation time in seconds.
    pub tau_adjust: f64,
    /// Rotational relaxation time in seconds.
    pub tau_rotation: f64,
    /// Standard deviation of the random fluctuation force, in N/kg.
    pub std_random_force: f64,
}

impl Body {
    /// Average adult pedestrian.
    pub fn adult() -> Self {
        Self {
            mass:                    73.5,
            radius:                  0.255,
            ratio_torso:             0.5882,
            ratio_shoulder:          0.3725,
            ratio_torso_shoulder:    0.6353,
            inertia_rot:             4.0,
            target_velocity:         1.25,
            target_angular_velocity: 4.0 * std::f64::consts::PI,
            tau_adjust:              0.5,
            tau_rotation:            0.2,
            std_random_force:        0.1,
        }
    }

    #[inline]
    pub fn radius_torso(&self) -> f64 {
        self.ratio_torso * self.radius
    }

    #[inline]
    pub fn radius_shoulder(&self) -> f64 {
        self.ratio_shoulder * self.radius
    }

    #[inline]
    pub fn torso_shoulder_distance(&self) -> f64 {
        self.ratio_torso_shoulder * self.radius
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::adult()
    }
}
