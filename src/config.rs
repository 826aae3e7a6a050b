//! Physical constants and solver limits for a cloth simulation.

use crate::error::ClothError;
use crate::float::Float;

/// Configuration for a cloth simulation.
///
/// # Builder Pattern
/// ```
/// use drape::config::ClothConfig;
///
/// let config: ClothConfig<f32> = ClothConfig::new()
///     .with_particle_mass(0.2)
///     .with_spring_constant(150.0)
///     .with_ground_height(-3.0)
///     .with_max_sub_step(1.0 / 240.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClothConfig<F: Float> {
    /// Mass of every particle. Default: 0.1.
    pub particle_mass: F,
    /// Extent of the whole sheet along x and y; particles are spaced
    /// `spacing / grid size` apart. Default: (1.0, 1.0).
    pub spacing: (F, F),
    /// Spring constant of stride-1 springs. A stride-`s` spring gets
    /// `spring_constant / s³`. Default: 100.0.
    pub spring_constant: F,
    /// Damping factor of stride-1 springs, scaled like `spring_constant`.
    /// Default: 0.21.
    pub damping_factor: F,
    /// Aerodynamic drag coefficient of every triangle. Default: 1.0.
    pub drag_coefficient: F,
    /// Air density used by the drag law. Default: 1.0.
    pub air_density: F,
    /// Magnitude of gravitational acceleration along -Y. Default: 9.8.
    pub gravity: F,
    /// Largest sub-step the integrator will take. Default: 1/120 s.
    pub max_sub_step: F,
    /// Safety clamp on particle speed; also shrinks sub-steps. Default: 30.0.
    pub speed_limit: F,
    /// Sub-step cap per update; exceeding it is a fatal instability. Default: 1000.
    pub max_iterations: usize,
    /// Optional cap on the frame delta. Time past the cap is dropped, so only
    /// set this for hosts that prefer slow motion over long catch-up frames.
    /// Default: `None` (every frame is simulated in full).
    pub max_frame_delta: Option<F>,
    /// Height of the ground plane. Default: -2.0.
    pub ground_height: F,
    /// Fraction of vertical speed kept (and inverted) on ground contact. Default: 0.5.
    pub elasticity: F,
    /// Fraction of horizontal speed lost on ground contact. Default: 0.3.
    pub friction: F,
    /// Relative swing of fancy wind around its base magnitude. Default: 0.5.
    pub fancy_amplitude: F,
    /// Angular frequency of the fancy wind oscillation in rad/s. Default: 0.5.
    pub fancy_frequency: F,
}

impl<F: Float> ClothConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        ClothConfig {
            particle_mass: F::from_f32(0.1),
            spacing: (F::one(), F::one()),
            spring_constant: F::from_f32(100.0),
            damping_factor: F::from_f32(0.21),
            drag_coefficient: F::one(),
            air_density: F::one(),
            gravity: F::from_f32(9.8),
            max_sub_step: F::from_f32(1.0 / 120.0),
            speed_limit: F::from_f32(30.0),
            max_iterations: 1000,
            max_frame_delta: None,
            ground_height: F::from_f32(-2.0),
            elasticity: F::half(),
            friction: F::from_f32(0.3),
            fancy_amplitude: F::half(),
            fancy_frequency: F::half(),
        }
    }

    pub fn with_particle_mass(mut self, mass: F) -> Self {
        self.particle_mass = mass;
        self
    }

    pub fn with_spacing(mut self, x: F, y: F) -> Self {
        self.spacing = (x, y);
        self
    }

    pub fn with_spring_constant(mut self, k: F) -> Self {
        self.spring_constant = k;
        self
    }

    pub fn with_damping_factor(mut self, c: F) -> Self {
        self.damping_factor = c;
        self
    }

    pub fn with_drag(mut self, drag_coefficient: F, air_density: F) -> Self {
        self.drag_coefficient = drag_coefficient;
        self.air_density = air_density;
        self
    }

    pub fn with_gravity(mut self, gravity: F) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_max_sub_step(mut self, dt: F) -> Self {
        self.max_sub_step = dt;
        self
    }

    pub fn with_speed_limit(mut self, limit: F) -> Self {
        self.speed_limit = limit;
        self
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Cap each update's delta at `dt`, dropping the rest.
    pub fn with_max_frame_delta(mut self, dt: F) -> Self {
        self.max_frame_delta = Some(dt);
        self
    }

    pub fn with_ground_height(mut self, height: F) -> Self {
        self.ground_height = height;
        self
    }

    /// Set the ground contact response.
    pub fn with_contact(mut self, elasticity: F, friction: F) -> Self {
        self.elasticity = elasticity;
        self.friction = friction;
        self
    }

    pub fn with_fancy_wind(mut self, amplitude: F, frequency: F) -> Self {
        self.fancy_amplitude = amplitude;
        self.fancy_frequency = frequency;
        self
    }

    /// Reject values the solver cannot work with.
    pub fn validate(&self) -> Result<(), ClothError> {
        let positive = |v: F| v.is_finite() && v > F::zero();
        let unit = |v: F| v.is_finite() && v >= F::zero() && v <= F::one();

        if !positive(self.particle_mass) {
            return Err(ClothError::InvalidConfig("particle mass must be positive and finite"));
        }
        if !positive(self.spacing.0) || !positive(self.spacing.1) {
            return Err(ClothError::InvalidConfig("spacing must be positive"));
        }
        if !positive(self.max_sub_step) || !self.max_frame_delta.map_or(true, positive) {
            return Err(ClothError::InvalidConfig("time steps must be positive"));
        }
        if !positive(self.speed_limit) {
            return Err(ClothError::InvalidConfig("speed limit must be positive"));
        }
        if self.max_iterations == 0 {
            return Err(ClothError::InvalidConfig("iteration cap must be at least 1"));
        }
        if !unit(self.elasticity) || !unit(self.friction) {
            return Err(ClothError::InvalidConfig("elasticity and friction must be in [0, 1]"));
        }
        Ok(())
    }
}

impl<F: Float> Default for ClothConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(ClothConfig::<f32>::default().validate(), Ok(()));
        assert_eq!(ClothConfig::<f64>::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_mass() {
        let config = ClothConfig::<f32>::new().with_particle_mass(0.0);
        assert!(matches!(config.validate(), Err(ClothError::InvalidConfig(_))));
    }

    #[test]
    fn frame_delta_cap_is_opt_in() {
        assert_eq!(ClothConfig::<f32>::new().max_frame_delta, None);
        let capped = ClothConfig::<f32>::new().with_max_frame_delta(0.25);
        assert_eq!(capped.max_frame_delta, Some(0.25));
        assert_eq!(capped.validate(), Ok(()));
        let zero = ClothConfig::<f32>::new().with_max_frame_delta(0.0);
        assert!(matches!(zero.validate(), Err(ClothError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_friction_above_one() {
        let config = ClothConfig::<f32>::new().with_contact(0.5, 1.5);
        assert!(config.validate().is_err());
    }
}
