//! Colour-space helpers for `Vec3` values used as linear RGB.

use crate::Vec3;
use std::ops::{Add, Mul, Sub};

/// Exponent used to move between sRGB and linear light.
const GAMMA: f32 = 2.2;

/// Gamma transforms for vectors holding a colour.
///
/// Rendering maths runs in linear light. Source colours authored in sRGB are
/// linearised before use, and the final radiance is gamma corrected just
/// before it is quantised to bytes.
pub trait ColorSpace {
    /// Convert an sRGB colour to linear light (`c^2.2` per component).
    fn srgb_to_linear(self) -> Self;

    /// Gamma correct a linear colour for display (`c^(1/2.2)` per component).
    fn linear_to_srgb(self) -> Self;
}

impl ColorSpace for Vec3 {
    #[inline]
    fn srgb_to_linear(self) -> Self {
        self.powf(GAMMA)
    }

    #[inline]
    fn linear_to_srgb(self) -> Self {
        self.powf(1.0 / GAMMA)
    }
}

/// Linearly interpolate between `a` and `b`: `a + (b - a) * t`.
#[inline]
pub fn lerp<T>(a: T, b: T, t: f32) -> T
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T>,
{
    a + (b - a) * t
}
