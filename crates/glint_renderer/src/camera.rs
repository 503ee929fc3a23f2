//! Camera for ray generation.

use crate::Ray;
use glint_math::Vec3;

/// Pinhole camera at the world origin looking down -Z.
///
/// The view plane sits at `z = -1` and spans `[-aspect, aspect]` horizontally
/// and `[-1, 1]` vertically. Position, orientation and field of view are
/// fixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    aspect: f32,
    origin: Vec3,
    lower_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
}

impl Camera {
    /// Create a camera with the given width / height aspect ratio.
    pub fn new(aspect: f32) -> Self {
        Self {
            aspect,
            origin: Vec3::ZERO,
            lower_left: Vec3::new(-aspect, -1.0, -1.0),
            horizontal: Vec3::new(2.0 * aspect, 0.0, 0.0),
            vertical: Vec3::new(0.0, 2.0, 0.0),
        }
    }

    /// Create a camera matching an image's aspect ratio.
    pub fn for_image(width: u32, height: u32) -> Self {
        Self::new(width as f32 / height as f32)
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Generate the primary ray through image-plane coordinates `(u, v)`.
    ///
    /// `(0, 0)` is the lower-left corner and `(1, 1)` the upper-right one.
    /// The returned direction is normalized.
    pub fn get_ray(&self, u: f32, v: f32) -> Ray {
        let target = self.lower_left + u * self.horizontal + v * self.vertical;
        let direction = target - self.origin;
        debug_assert!(direction.length_squared() > 0.0);

        Ray::new(self.origin, direction.normalize())
    }
}
