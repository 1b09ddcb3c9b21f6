// Copyright @yucwang 2023

use crate::core::interaction::SurfaceIntersection;
use crate::math::aabb::AABB;
use crate::math::ray::Ray3f;

pub trait Shape: Send + Sync {
    fn bounding_box(&self) -> AABB;

    /// Nearest hit with `ray.min_t < t < ray.max_t`.
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection>;

    /// Any hit inside the ray interval.
    fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        self.ray_intersection(ray).is_some()
    }

    fn describe(&self) -> String {
        String::from("Shape")
    }
}
