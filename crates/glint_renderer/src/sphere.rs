//! Sphere primitive for ray tracing.

use crate::{
    hittable::{HitRecord, Hittable},
    Ray,
};
use glint_math::Vec3;

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
}

impl Sphere {
    /// Create a new sphere. The radius keeps its sign: a negative radius
    /// turns the normals inward.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, rec: &mut HitRecord) -> bool {
        // A point has no surface normal
        if self.radius == 0.0 {
            return false;
        }

        // Solve |origin + t * dir - center|^2 = r^2 for t
        let delta = ray.origin() - self.center;
        let a = ray.direction().dot(ray.direction());
        let b = 2.0 * ray.direction().dot(delta);
        let c = delta.dot(delta) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Near root first. Past t_max means the whole sphere is out of range;
        // before t_min (e.g. the eye is inside) falls back to the far root.
        let mut t = (-b - sqrtd) / (2.0 * a);
        if t > ray.t_max() {
            return false;
        }
        if t < ray.t_min() {
            t = (-b + sqrtd) / (2.0 * a);
            if !ray.range.contains(t) {
                return false;
            }
        }

        rec.t = t;
        rec.position = ray.at(t);
        rec.normal = (rec.position - self.center) / self.radius;

        true
    }
}
