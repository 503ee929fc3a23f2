use crate::{Interval, Vec3};

/// A ray in 3D space with an origin, a direction and a valid parameter range.
///
/// Distances along the ray are multiples of the direction length, so they are
/// only world-space distances when the direction is normalized. The range is
/// not checked here; intersection tests reject hits outside of it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub range: Interval,
}

impl Ray {
    /// Create a new ray valid over `[0, +inf)`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self::with_range(origin, direction, 0.0, f32::INFINITY)
    }

    /// Create a ray valid over `[t_min, t_max]`.
    pub fn with_range(origin: Vec3, direction: Vec3, t_min: f32, t_max: f32) -> Self {
        Self {
            origin,
            direction,
            range: Interval::new(t_min, t_max),
        }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Smallest parameter accepted by intersection tests.
    #[inline]
    pub fn t_min(&self) -> f32 {
        self.range.min
    }

    /// Largest parameter accepted by intersection tests.
    #[inline]
    pub fn t_max(&self) -> f32 {
        self.range.max
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + direction * t
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
