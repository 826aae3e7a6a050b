//! Scalar abstraction so the solver runs in either `f32` or `f64`.

use core::cmp::PartialOrd;
use core::ops::{Add, Div, Mul, Neg, Sub};

/// Floating-point operations the cloth solver relies on.
///
/// Implemented for `f32` and `f64` on top of `libm`, so it works without
/// `std`. Render output is always `f32`; see [`Float::to_f32`].
pub trait Float:
    Copy
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Default
    + core::fmt::Debug
{
    fn zero() -> Self;
    fn one() -> Self;
    fn half() -> Self;
    /// Weight of the current acceleration in the two-step integrator.
    fn three() -> Self;

    fn sqrt(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn abs(self) -> Self;
    fn min(self, other: Self) -> Self;
    fn max(self, other: Self) -> Self;

    /// Widen a configuration constant.
    fn from_f32(v: f32) -> Self;
    /// Narrow for vertex output.
    fn to_f32(self) -> f32;
    /// False for NaN and both infinities.
    fn is_finite(self) -> bool;

    /// Grid coordinates and counts.
    fn from_usize(v: usize) -> Self {
        Self::from_f32(v as f32)
    }

    fn is_near_zero(self, epsilon: Self) -> bool {
        self.abs() < epsilon
    }
}

macro_rules! impl_float {
    ($t:ty, $sqrt:path, $sin:path, $cos:path, $abs:path) => {
        impl Float for $t {
            fn zero() -> Self { 0.0 }
            fn one() -> Self { 1.0 }
            fn half() -> Self { 0.5 }
            fn three() -> Self { 3.0 }
            fn sqrt(self) -> Self { $sqrt(self) }
            fn sin(self) -> Self { $sin(self) }
            fn cos(self) -> Self { $cos(self) }
            fn abs(self) -> Self { $abs(self) }
            fn min(self, other: Self) -> Self { if self < other { self } else { other } }
            fn max(self, other: Self) -> Self { if self > other { self } else { other } }
            fn from_f32(v: f32) -> Self { v as $t }
            fn to_f32(self) -> f32 { self as f32 }
            fn is_finite(self) -> bool { <$t>::is_finite(self) }
            fn from_usize(v: usize) -> Self { v as $t }
        }
    };
}

impl_float!(f32, libm::sqrtf, libm::sinf, libm::cosf, libm::fabsf);
impl_float!(f64, libm::sqrt, libm::sin, libm::cos, libm::fabs);
