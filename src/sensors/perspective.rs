// Copyright @yucwang 2026

use crate::core::sensor::Sensor;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

pub struct PerspectiveCamera {
    origin: Vector3f,
    forward: Vector3f,
    right: Vector3f,
    up: Vector3f,
    tan_half_fov_y: Float,
    aspect: Float,
    width: usize,
    height: usize,
}

impl PerspectiveCamera {
    pub fn new(origin: Vector3f,
               target: Vector3f,
               up: Vector3f,
               fov_y_radians: Float,
               width: usize,
               height: usize) -> Self {
        let forward = (target - origin).normalize();
        let right = forward.cross(&up).normalize();
        let up = right.cross(&forward).normalize();

        Self {
            origin,
            forward,
            right,
            up,
            tan_half_fov_y: (0.5 * fov_y_radians).tan(),
            aspect: width as Float / height.max(1) as Float,
            width,
            height,
        }
    }
}

impl Sensor for PerspectiveCamera {
    fn sample_ray(&self, raster: &Vector2f) -> Ray3f {
        let u = raster.x / self.width as Float;
        let v = raster.y / self.height as Float;
        let px = (2.0 * u - 1.0) * self.aspect * self.tan_half_fov_y;
        let py = (1.0 - 2.0 * v) * self.tan_half_fov_y;

        let dir = self.right * px + self.up * py + self.forward;
        Ray3f::new(self.origin, dir, Some(0.0), None)
    }

    fn world_to_raster(&self, p: &Vector3f) -> Option<Vector2f> {
        let local = p - self.origin;
        let z = local.dot(&self.forward);
        if z <= 0.0 {
            return None;
        }
        let px = local.dot(&self.right) / z;
        let py = local.dot(&self.up) / z;

        let u = 0.5 * (px / (self.aspect * self.tan_half_fov_y) + 1.0);
        let v = 0.5 * (1.0 - py / self.tan_half_fov_y);
        let raster = Vector2f::new(u * self.width as Float, v * self.height as Float);
        if raster.x < 0.0 || raster.y < 0.0 ||
           raster.x >= self.width as Float || raster.y >= self.height as Float {
            return None;
        }
        Some(raster)
    }

    fn position(&self) -> Vector3f {
        self.origin
    }

    fn forward(&self) -> Vector3f {
        self.forward
    }

    fn resolution(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn image_plane_area(&self) -> Float {
        let side = 2.0 * self.tan_half_fov_y;
        side * side * self.aspect
    }

    fn describe(&self) -> String {
        format!("PerspectiveCamera {}x{} at {:?} looking {:?}",
                self.width, self.height, self.origin, self.forward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        let origin = Vector3f::new(0.0, 0.0, 0.0);
        let target = Vector3f::new(0.0, 0.0, -1.0);
        let up = Vector3f::new(0.0, 1.0, 0.0);
        PerspectiveCamera::new(origin, target, up, std::f32::consts::FRAC_PI_2, 8, 4)
    }

    #[test]
    fn test_perspective_camera_center_ray() {
        let cam = camera();
        let ray = cam.sample_ray(&Vector2f::new(4.0, 2.0));
        let dir = ray.dir();

        assert!((dir.x - 0.0).abs() < 1e-6);
        assert!((dir.y - 0.0).abs() < 1e-6);
        assert!((dir.z + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_corner_rays() {
        let cam = camera();
        // Top left corner: x = -aspect * tan, y = +tan.
        let dir = cam.sample_ray(&Vector2f::new(0.0, 0.0)).dir();
        let expected = Vector3f::new(-2.0, 1.0, -1.0).normalize();
        assert!((dir - expected).norm() < 1e-5);
        assert!((cam.image_plane_area() - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_projection_round_trip() {
        let cam = camera();
        for &(x, y) in [(0.5, 0.5), (3.25, 1.75), (7.9, 3.9), (6.0, 0.1)].iter() {
            let raster = Vector2f::new(x, y);
            let ray = cam.sample_ray(&raster);
            let p = ray.at(3.7);
            let back = cam.world_to_raster(&p).expect("visible");
            assert!((back - raster).norm() < 1e-3, "{:?} vs {:?}", back, raster);
        }
    }

    #[test]
    fn test_projection_rejects_hidden_points() {
        let cam = camera();
        assert!(cam.world_to_raster(&Vector3f::new(0.0, 0.0, 1.0)).is_none());
        assert!(cam.world_to_raster(&Vector3f::new(10.0, 0.0, -1.0)).is_none());
        assert_eq!(cam.resolution(), (8, 4));
    }
}
