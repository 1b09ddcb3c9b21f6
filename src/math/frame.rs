// Copyright @yucwang 2023

use super::constants::Vector3f;

/// Orthonormal shading basis. In local coordinates the z-axis is the normal,
/// so the z component of a local direction is its cosine to the normal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    pub x: Vector3f,
    pub y: Vector3f,
    pub z: Vector3f
}

impl Default for Frame {
    fn default() -> Self {
        Frame {
            x: Vector3f::new(1.0, 0.0, 0.0),
            y: Vector3f::new(0.0, 1.0, 0.0),
            z: Vector3f::new(0.0, 0.0, 1.0)
        }
    }
}

impl Frame {
    pub fn new(new_x: Vector3f, new_y: Vector3f, new_z: Vector3f) -> Frame {
        Frame {
            x: new_x,
            y: new_y,
            z: new_z
        }
    }

    pub fn from_z(z: &Vector3f) -> Frame {
        let z = z.normalize();
        let helper = if z.x.abs() > 0.99 {
            Vector3f::new(0.0, 1.0, 0.0)
        } else {
            Vector3f::new(1.0, 0.0, 0.0)
        };
        let y = z.cross(&helper).normalize();
        let x = y.cross(&z);

        Frame { x, y, z }
    }

    pub fn normal(&self) -> Vector3f {
        self.z
    }

    pub fn to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.x), v.dot(&self.y), v.dot(&self.z))
    }

    pub fn to_world(&self, v: &Vector3f) -> Vector3f {
        self.x * v.x + self.y * v.y + self.z * v.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::LcgRng;
    use crate::math::warp::sample_uniform_sphere;

    #[test]
    fn test_frame_is_orthonormal() {
        let frame = Frame::from_z(&Vector3f::new(0.3, -2.0, 0.7));
        assert!((frame.x.norm() - 1.0).abs() < 1e-5);
        assert!((frame.y.norm() - 1.0).abs() < 1e-5);
        assert!((frame.z.norm() - 1.0).abs() < 1e-5);
        assert!(frame.x.dot(&frame.y).abs() < 1e-5);
        assert!(frame.y.dot(&frame.z).abs() < 1e-5);
        assert!(frame.z.dot(&frame.x).abs() < 1e-5);
        // right handed
        assert!((frame.x.cross(&frame.y) - frame.z).norm() < 1e-5);
    }

    #[test]
    fn test_local_z_is_cosine() {
        let n = Vector3f::new(0.0, 1.0, 0.0);
        let frame = Frame::from_z(&n);
        let v = Vector3f::new(1.0, 1.0, 0.0).normalize();
        assert!((frame.to_local(&v).z - v.dot(&n)).abs() < 1e-6);
    }

    #[test]
    fn test_frame_round_trip() {
        let mut rng = LcgRng::new(7);
        for _ in 0..1000 {
            let n = sample_uniform_sphere(&rng.next_vec2());
            let frame = Frame::from_z(&n);
            for _ in 0..1000 {
                let v = sample_uniform_sphere(&rng.next_vec2()) * (4.0 * rng.next_f32());
                let back = frame.to_world(&frame.to_local(&v));
                assert!((back - v).norm() < 1e-5, "{:?} != {:?}", back, v);
            }
        }
    }

    #[test]
    fn test_axis_aligned_normals() {
        for n in [Vector3f::new(1.0, 0.0, 0.0), Vector3f::new(-1.0, 0.0, 0.0),
                  Vector3f::new(0.0, 0.0, -1.0)].iter() {
            let frame = Frame::from_z(n);
            assert!(frame.x.iter().all(|c| c.is_finite()));
            assert!((frame.to_local(n).z - 1.0).abs() < 1e-6);
        }
    }
}
