//! Ambient wind state consumed by the drag law.

use crate::float::Float;
use crate::vec::{Vec, Vec3};

/// Ambient wind: a direction, a base magnitude and an optional slow gust.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wind<F: Float> {
    pub direction: Vec3<F>,
    pub magnitude: F,
    /// Oscillate the magnitude over time instead of holding it constant.
    pub fancy: bool,
}

impl<F: Float> Wind<F> {
    /// Still air.
    pub fn calm() -> Self {
        Wind { direction: Vec3::zero(), magnitude: F::zero(), fancy: false }
    }

    pub fn new(direction: Vec3<F>, magnitude: F, fancy: bool) -> Self {
        Wind { direction, magnitude, fancy }
    }

    pub fn is_calm(&self) -> bool {
        self.magnitude == F::zero() || self.direction.length_sq() == F::zero()
    }

    /// Toggle semantics: asking for exactly the wind that is already blowing
    /// turns it off; anything else replaces it.
    pub fn toggle(&mut self, direction: Vec3<F>, magnitude: F, fancy: bool) {
        let requested = Wind::new(direction, magnitude, fancy);
        if !self.is_calm() && *self == requested {
            *self = Wind::calm();
        } else {
            *self = requested;
        }
    }

    /// Air velocity at simulated time `t`.
    ///
    /// Fancy wind scales the magnitude by `1 + amplitude * sin(frequency * t)`.
    pub fn velocity_at(&self, t: F, amplitude: F, frequency: F) -> Vec3<F> {
        if self.is_calm() {
            return Vec3::zero();
        }
        let mut magnitude = self.magnitude;
        if self.fancy {
            magnitude = magnitude * (F::one() + amplitude * (frequency * t).sin());
        }
        self.direction.normalize().scale(magnitude)
    }
}

impl<F: Float> Default for Wind<F> {
    fn default() -> Self {
        Self::calm()
    }
}
