//! Hittable trait, HitRecord, and the Scene aggregate.

use crate::{Ray, Sphere};
use glint_math::Vec3;

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HitRecord {
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Point of intersection
    pub position: Vec3,
    /// Unit outward surface normal at the intersection
    pub normal: Vec3,
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object within the ray's `[t_min, t_max]`.
    ///
    /// Returns true if hit, and fills in the hit record. A miss is not an
    /// error and leaves the record in an unspecified state.
    fn hit(&self, ray: &Ray, rec: &mut HitRecord) -> bool;
}

/// A flat, insertion-ordered collection of owned objects.
///
/// The scene is immutable while rendering and is shared read-only across
/// worker threads.
pub struct Scene {
    objects: Vec<Box<dyn Hittable>>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the scene.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Add a sphere, builder style.
    pub fn with_sphere(mut self, center: Vec3, radius: f32) -> Self {
        self.add(Box::new(Sphere::new(center, radius)));
        self
    }

    /// Clear all objects from the scene.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for Scene {
    /// Find the closest hit among all objects.
    ///
    /// Every object sees the full ray; a hit only replaces the current one
    /// when it is strictly closer.
    fn hit(&self, ray: &Ray, rec: &mut HitRecord) -> bool {
        let mut hit_anything = false;
        let mut closest = HitRecord {
            t: ray.t_max(),
            ..HitRecord::default()
        };

        for object in &self.objects {
            let mut candidate = HitRecord::default();
            if object.hit(ray, &mut candidate) && candidate.t < closest.t {
                hit_anything = true;
                closest = candidate;
            }
        }

        if hit_anything {
            debug_assert!(closest.t <= ray.t_max());
            *rec = closest;
        }

        hit_anything
    }
}
