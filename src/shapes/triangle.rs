// Copyright @yucwang 2023

use crate::core::interaction::SurfaceIntersection;
use crate::core::shape::Shape;
use crate::math::aabb::AABB;
use crate::math::constants::{ Float, Vector3f };
use crate::math::ray::Ray3f;

/// One-sided triangle: only rays arriving against the geometric normal
/// (counter-clockwise winding seen from the front) hit it.
pub struct Triangle {
    p0: Vector3f,
    p1: Vector3f,
    p2: Vector3f,
    normal: Vector3f,
    material_id: usize,
    light_id: Option<usize>,
}

impl Shape for Triangle {
    fn bounding_box(&self) -> AABB {
        let mut bound = AABB::new(self.p0, self.p1);
        bound.expand_by_point(&self.p2);

        bound
    }

    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        let t = self.hit_distance(ray)?;
        Some(SurfaceIntersection::new(ray.at(t), self.normal, t, self.material_id, self.light_id))
    }

    fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        self.hit_distance(ray).is_some()
    }

    fn describe(&self) -> String {
        format!("Triangle {:?} {:?} {:?}", self.p0, self.p1, self.p2)
    }
}

impl Triangle {
    pub fn new(new_p0: Vector3f, new_p1: Vector3f, new_p2: Vector3f, material_id: usize) -> Self {
        let normal = (new_p1 - new_p0).cross(&(new_p2 - new_p0)).normalize();
        Triangle {
            p0: new_p0, 
            p1: new_p1,
            p2: new_p2,
            normal,
            material_id,
            light_id: None,
        }
    }

    pub fn with_light(mut self, light_id: usize) -> Self {
        self.light_id = Some(light_id);
        self
    }

    fn hit_distance(&self, ray: &Ray3f) -> Option<Float> {
        let dir = ray.dir();
        let n_dot_dir = self.normal.dot(&dir);
        // Back faces and rays parallel to the plane.
        if !(n_dot_dir < 0.0) {
            return None;
        }

        let ao = self.p0 - ray.origin();
        let bo = self.p1 - ray.origin();
        let co = self.p2 - ray.origin();

        let v0d = co.cross(&bo).dot(&dir);
        let v1d = bo.cross(&ao).dot(&dir);
        let v2d = ao.cross(&co).dot(&dir);

        let inside = (v0d < 0.0 && v1d < 0.0 && v2d < 0.0) ||
                     (v0d >= 0.0 && v1d >= 0.0 && v2d >= 0.0);
        if !inside {
            return None;
        }

        let t = self.normal.dot(&ao) / n_dot_dir;
        if ray.in_range(t) {
            Some(t)
        } else {
            None
        }
    }
}
