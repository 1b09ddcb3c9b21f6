// Copyright @yucwang 2026

use crate::core::interaction::SurfaceIntersection;
use crate::core::shape::Shape;
use crate::math::aabb::AABB;
use crate::math::constants::{ Float, Vector3f };
use crate::math::ray::Ray3f;

pub struct Sphere {
    center: Vector3f,
    radius: Float,
    material_id: usize,
}

impl Sphere {
    pub fn new(center: Vector3f, radius: Float, material_id: usize) -> Self {
        Self { center, radius, material_id }
    }

    pub fn center(&self) -> Vector3f {
        self.center
    }

    pub fn radius(&self) -> Float {
        self.radius
    }

    fn hit_distance(&self, ray: &Ray3f) -> Option<Float> {
        let o = ray.origin() - self.center;
        let d = ray.dir();

        // Doubles keep B ~ sqrt(disc) from cancelling into a t that slips
        // under the ray epsilon.
        let a = d.dot(&d) as f64;
        let b = 2.0 * d.dot(&o) as f64;
        let c = o.dot(&o) as f64 - (self.radius as f64) * (self.radius as f64);

        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 || a == 0.0 {
            return None;
        }

        let disc_sqrt = disc.sqrt();
        let q = if b < 0.0 { (-b - disc_sqrt) / 2.0 } else { (-b + disc_sqrt) / 2.0 };
        if q == 0.0 {
            return None;
        }

        let mut t0 = q / a;
        let mut t1 = c / q;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        if ray.in_range(t0 as Float) {
            Some(t0 as Float)
        } else if ray.in_range(t1 as Float) {
            Some(t1 as Float)
        } else {
            None
        }
    }
}

impl Shape for Sphere {
    fn bounding_box(&self) -> AABB {
        let r = Vector3f::new(self.radius, self.radius, self.radius);
        AABB::new(self.center - r, self.center + r)
    }

    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        let t = self.hit_distance(ray)?;
        let p = ray.at(t);
        let normal = (p - self.center).normalize();
        Some(SurfaceIntersection::new(p, normal, t, self.material_id, None))
    }

    fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        self.hit_distance(ray).is_some()
    }

    fn describe(&self) -> String {
        format!("Sphere center {:?} radius {}", self.center, self.radius)
    }
}
