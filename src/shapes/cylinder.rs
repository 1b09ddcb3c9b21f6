// Copyright @yucwang 2026

use crate::core::interaction::SurfaceIntersection;
use crate::core::shape::Shape;
use crate::math::aabb::AABB;
use crate::math::constants::{ Float, Vector3f };
use crate::math::frame::Frame;
use crate::math::ray::Ray3f;

/// Open tube between two axis end points with an outer and an inner wall.
/// The inner wall reports an inverted normal. End caps are not intersected.
pub struct Cylinder {
    bottom: Vector3f,
    top: Vector3f,
    outer_radius: Float,
    inner_radius: Float,
    frame: Frame,
    height: Float,
    material_id: usize,
}

impl Cylinder {
    pub fn new(bottom: Vector3f, top: Vector3f, outer_radius: Float,
               inner_radius: Float, material_id: usize) -> Self {
        let axis = top - bottom;
        Self {
            bottom,
            top,
            outer_radius,
            inner_radius,
            frame: Frame::from_z(&axis),
            height: axis.norm(),
            material_id,
        }
    }

    // Nearest hit on the wall of the given radius inside the ray window,
    // as (t, local radial normal).
    fn wall_hit(&self, radius: Float, o: &Vector3f, d: &Vector3f, ray: &Ray3f) -> Option<(Float, Vector3f)> {
        let a = (d.x * d.x + d.y * d.y) as f64;
        let b = 2.0 * (d.x * o.x + d.y * o.y) as f64;
        let c = (o.x * o.x + o.y * o.y) as f64 - (radius as f64) * (radius as f64);

        // Parallel to the axis.
        if a == 0.0 {
            return None;
        }
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
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

        for t in [t0, t1].iter() {
            let t = *t as Float;
            let z = o.z + t * d.z;
            if z >= 0.0 && z <= self.height && ray.in_range(t) {
                let n = Vector3f::new(o.x + t * d.x, o.y + t * d.y, 0.0);
                return Some((t, n.normalize()));
            }
        }
        None
    }

    fn nearest_hit(&self, ray: &Ray3f) -> Option<(Float, Vector3f)> {
        let o = self.frame.to_local(&(ray.origin() - self.bottom));
        let d = self.frame.to_local(&ray.dir());

        let mut window = *ray;
        let mut best: Option<(Float, Vector3f)> = None;
        if let Some((t, n)) = self.wall_hit(self.outer_radius, &o, &d, &window) {
            window.update(t);
            best = Some((t, self.frame.to_world(&n)));
        }
        if self.inner_radius > 0.0 {
            if let Some((t, n)) = self.wall_hit(self.inner_radius, &o, &d, &window) {
                best = Some((t, -self.frame.to_world(&n)));
            }
        }
        best
    }
}

impl Shape for Cylinder {
    fn bounding_box(&self) -> AABB {
        let r = Vector3f::new(self.outer_radius, self.outer_radius, self.outer_radius);
        let mut bound = AABB::new(self.bottom - r, self.bottom + r);
        bound.expand_by_aabb(&AABB::new(self.top - r, self.top + r));
        bound
    }

    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        let (t, normal) = self.nearest_hit(ray)?;
        Some(SurfaceIntersection::new(ray.at(t), normal, t, self.material_id, None))
    }

    fn describe(&self) -> String {
        format!("Cylinder {:?} -> {:?} radii {} / {}", self.bottom, self.top,
                self.outer_radius, self.inner_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tube() -> Cylinder {
        Cylinder::new(Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(0.0, 0.0, 2.0), 1.0, 0.5, 4)
    }

    #[test]
    fn test_outer_wall_hit() {
        let ray = Ray3f::new(Vector3f::new(-3.0, 0.0, 1.0), Vector3f::new(1.0, 0.0, 0.0), Some(1e-4), None);
        let hit = tube().ray_intersection(&ray).expect("expected hit");
        assert!((hit.t() - 2.0).abs() < 1e-5);
        assert!((hit.geo_normal() - Vector3f::new(-1.0, 0.0, 0.0)).norm() < 1e-5);
        assert_eq!(hit.material_id(), 4);
    }

    #[test]
    fn test_inner_wall_has_inverted_normal() {
        let ray = Ray3f::new(Vector3f::new(-3.0, 0.0, 1.0), Vector3f::new(1.0, 0.0, 0.0), Some(2.1), None);
        let hit = tube().ray_intersection(&ray).expect("expected hit");
        assert!((hit.t() - 2.5).abs() < 1e-5);
        assert!((hit.geo_normal() - Vector3f::new(1.0, 0.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_height_limits_and_axis_parallel() {
        let above = Ray3f::new(Vector3f::new(-3.0, 0.0, 3.0), Vector3f::new(1.0, 0.0, 0.0), None, None);
        assert!(!tube().ray_intersection_t(&above));

        // Caps are open: a ray down the bore misses.
        let down = Ray3f::new(Vector3f::new(0.0, 0.0, 5.0), Vector3f::new(0.0, 0.0, -1.0), None, None);
        assert!(tube().ray_intersection(&down).is_none());

        // Slanted ray entering through the open top hits the inner wall.
        let slanted = Ray3f::new(Vector3f::new(0.0, 0.0, 3.0), Vector3f::new(0.5, 0.0, -1.0), Some(1e-4), None);
        let hit = tube().ray_intersection(&slanted).expect("expected hit");
        assert!((hit.p().x - 0.5).abs() < 1e-4);
        assert!(hit.geo_normal().x < -0.99);
    }

    #[test]
    fn test_tilted_axis() {
        let cylinder = Cylinder::new(Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(2.0, 0.0, 0.0), 1.0, 0.0, 0);
        let ray = Ray3f::new(Vector3f::new(1.0, 5.0, 0.0), Vector3f::new(0.0, -1.0, 0.0), Some(1e-4), None);
        let hit = cylinder.ray_intersection(&ray).expect("expected hit");
        assert!((hit.t() - 4.0).abs() < 1e-5);
        assert!((hit.geo_normal() - Vector3f::new(0.0, 1.0, 0.0)).norm() < 1e-5);
    }
}
