//! Surface and environment shading terms.

use glint_math::{lerp, ColorSpace, Vec3};
use std::f32::consts::PI;

/// Color type alias (linear RGB)
pub type Color = Vec3;

/// Lambertian (diffuse) material: a constant BRDF of `albedo / pi`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given linear albedo.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    /// Create a material from an sRGB albedo.
    pub fn from_srgb(albedo: Color) -> Self {
        Self::new(albedo.srgb_to_linear())
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    /// Reflected fraction of light per steradian, independent of direction.
    #[inline]
    pub fn brdf(&self) -> Color {
        self.albedo / PI
    }
}

impl Default for Lambertian {
    /// Light grey, sRGB `(0.75, 0.75, 0.75)`.
    fn default() -> Self {
        Self::from_srgb(Color::splat(0.75))
    }
}

/// Vertical gradient returned for rays that leave the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyGradient {
    /// Linear color seen looking straight down
    pub horizon: Color,
    /// Linear color seen looking straight up
    pub zenith: Color,
}

impl SkyGradient {
    /// Create a gradient from sRGB endpoint colors.
    pub fn from_srgb(horizon: Color, zenith: Color) -> Self {
        Self {
            horizon: horizon.srgb_to_linear(),
            zenith: zenith.srgb_to_linear(),
        }
    }

    /// Radiance arriving from `direction`, keyed on `0.5 * (y + 1)`.
    #[inline]
    pub fn color(&self, direction: Vec3) -> Color {
        let a = 0.5 * (direction.y + 1.0);
        lerp(self.horizon, self.zenith, a)
    }
}

impl Default for SkyGradient {
    /// White horizon fading to light blue.
    fn default() -> Self {
        Self::from_srgb(Color::new(1.0, 1.0, 1.0), Color::new(0.5, 0.7, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lambertian_brdf() {
        let material = Lambertian::new(Color::new(0.5, 0.25, 1.0));
        let brdf = material.brdf();
        assert!((brdf * PI - material.albedo()).length() < 1e-6);
    }

    #[test]
    fn test_default_albedo_is_linearized() {
        let material = Lambertian::default();
        let expected = 0.75_f32.powf(2.2);
        assert!((material.albedo() - Color::splat(expected)).length() < 1e-6);
    }

    #[test]
    fn test_sky_gradient_endpoints() {
        let sky = SkyGradient::default();

        let up = sky.color(Vec3::Y);
        assert!((up - sky.zenith).length() < 1e-6);

        let down = sky.color(-Vec3::Y);
        assert!((down - sky.horizon).length() < 1e-6);

        // Ray pointing up should be more blue (less red) than looking down
        assert!(up.x < down.x);
    }

    #[test]
    fn test_sky_gradient_midpoint() {
        let sky = SkyGradient {
            horizon: Color::ZERO,
            zenith: Color::ONE,
        };
        let mid = sky.color(Vec3::new(1.0, 0.0, 0.0));
        assert!((mid - Color::new(0.5, 0.5, 0.5)).length() < 1e-6);
    }
}
