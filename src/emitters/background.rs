// Copyright @yucwang 2026

use crate::core::emitter::{ EmissionSample, Emitter, IlluminationSample };
use crate::core::rng::LcgRng;
use crate::math::aabb::AABB;
use crate::math::constants::{ Float, Vector3f, INV_FOUR_PI, PI };
use crate::math::frame::Frame;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::{ sample_uniform_disk_concentric, sample_uniform_sphere, sample_uniform_sphere_pdf };

/// Radius of the sphere the background is modeled on, centered on each
/// receiver.
pub const BACKGROUND_RADIUS: Float = 1e4;

/// Constant radiance arriving from every direction.
pub struct BackgroundEmitter {
    radiance: RGBSpectrum,
    scene_center: Vector3f,
    scene_radius: Float,
}

impl BackgroundEmitter {
    pub fn new(radiance: RGBSpectrum) -> Self {
        Self { radiance, scene_center: Vector3f::zeros(), scene_radius: 0.0 }
    }

    pub fn scene_radius(&self) -> Float {
        self.scene_radius
    }

    // Uniform direction by rejection in the unit ball.
    fn sample_direction(rng: &mut LcgRng) -> Vector3f {
        loop {
            let v = Vector3f::new(2.0 * rng.next_f32() - 1.0,
                                  2.0 * rng.next_f32() - 1.0,
                                  2.0 * rng.next_f32() - 1.0);
            let len_sqr = v.norm_squared();
            if len_sqr <= 1.0 && len_sqr > 1e-6 {
                return v / len_sqr.sqrt();
            }
        }
    }
}

impl Emitter for BackgroundEmitter {
    fn sample_illumination(&self, _receiver: &Vector3f, rng: &mut LcgRng) -> Option<IlluminationSample> {
        Some(IlluminationSample {
            radiance: self.radiance,
            direction: Self::sample_direction(rng),
            distance: BACKGROUND_RADIUS,
            pdf_w: INV_FOUR_PI,
            pdf_a: INV_FOUR_PI / (BACKGROUND_RADIUS * BACKGROUND_RADIUS),
            cos_at_light: 1.0,
            is_delta: false,
        })
    }

    fn pdf_emission_area(&self, _point: &Vector3f) -> Float {
        INV_FOUR_PI / (BACKGROUND_RADIUS * BACKGROUND_RADIUS)
    }

    // Parallel rays entering the scene bounding sphere through the disk
    // perpendicular to the travel direction.
    fn sample_emission(&self, rng: &mut LcgRng) -> Option<EmissionSample> {
        if self.scene_radius <= 0.0 {
            return None;
        }
        let dir = sample_uniform_sphere(&rng.next_vec2());
        let disk = sample_uniform_disk_concentric(&rng.next_vec2()) * self.scene_radius;
        let frame = Frame::from_z(&dir);
        let origin = self.scene_center - dir * self.scene_radius
            + frame.to_world(&Vector3f::new(disk.x, disk.y, 0.0));

        Some(EmissionSample {
            ray: Ray3f::new(origin, dir, Some(0.0), None),
            pdf_a: 1.0 / (PI * self.scene_radius * self.scene_radius),
            pdf_w: sample_uniform_sphere_pdf(),
            radiance: self.radiance,
            cos_at_light: 1.0,
        })
    }

    fn radiance(&self, _direction: &Vector3f) -> RGBSpectrum {
        self.radiance
    }

    fn is_background(&self) -> bool {
        true
    }

    fn set_scene_bounds(&mut self, bounds: &AABB) {
        let (center, radius) = bounds.bounding_sphere();
        self.scene_center = center;
        self.scene_radius = radius;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::spectrum::Spectrum;

    #[test]
    fn test_illumination_is_uniform() {
        let light = BackgroundEmitter::new(RGBSpectrum::gray(1.0));
        let mut rng = LcgRng::new(11);
        let n = 50_000;
        let mut mean = Vector3f::zeros();
        let mut upper = 0;
        for _ in 0..n {
            let s = light.sample_illumination(&Vector3f::zeros(), &mut rng).expect("sample");
            assert!((s.direction.norm() - 1.0).abs() < 1e-5);
            assert_eq!(s.distance, BACKGROUND_RADIUS);
            mean += s.direction;
            if s.direction.z > 0.0 {
                upper += 1;
            }
        }
        assert!((mean / n as Float).norm() < 0.02);
        assert!((upper as Float / n as Float - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_emission_needs_scene_bounds() {
        let mut light = BackgroundEmitter::new(RGBSpectrum::gray(1.0));
        let mut rng = LcgRng::new(3);
        assert!(light.sample_emission(&mut rng).is_none());

        light.set_scene_bounds(&AABB::new(Vector3f::new(-1.0, -1.0, -1.0), Vector3f::new(1.0, 1.0, 1.0)));
        let radius = light.scene_radius();
        assert!((radius - (3.0 as Float).sqrt()).abs() < 1e-5);
        for _ in 0..100 {
            let s = light.sample_emission(&mut rng).expect("sample");
            // Starts on the entry disk, one radius back from the center.
            assert!((s.ray.origin().dot(&s.ray.dir()) + radius).abs() < 1e-3);
            assert!(s.ray.origin().norm() <= radius * (2.0 as Float).sqrt() + 1e-3);
            assert!((s.pdf_a - 1.0 / (PI * radius * radius)).abs() < 1e-6);
        }
        assert!(light.is_background());
    }
}
