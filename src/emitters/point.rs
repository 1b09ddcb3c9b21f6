// Copyright @yucwang 2026

use crate::core::emitter::{ EmissionSample, Emitter, IlluminationSample };
use crate::core::rng::LcgRng;
use crate::math::constants::{ Float, Vector3f };
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::{ sample_uniform_sphere, sample_uniform_sphere_pdf };

/// Isotropic point light of the given intensity.
pub struct PointEmitter {
    position: Vector3f,
    intensity: RGBSpectrum,
}

impl PointEmitter {
    pub fn new(position: Vector3f, intensity: RGBSpectrum) -> Self {
        Self { position, intensity }
    }

    pub fn position(&self) -> Vector3f {
        self.position
    }
}

impl Emitter for PointEmitter {
    fn sample_illumination(&self, receiver: &Vector3f, _rng: &mut LcgRng) -> Option<IlluminationSample> {
        let to_light = self.position - receiver;
        let dist_sqr = to_light.norm_squared();
        if dist_sqr <= 0.0 {
            return None;
        }
        let distance = dist_sqr.sqrt();

        Some(IlluminationSample {
            radiance: self.intensity / dist_sqr,
            direction: to_light / distance,
            distance,
            pdf_w: 1.0,
            pdf_a: 1.0,
            cos_at_light: 1.0,
            is_delta: true,
        })
    }

    // Cannot be hit by a ray.
    fn pdf_emission_area(&self, _point: &Vector3f) -> Float {
        0.0
    }

    fn sample_emission(&self, rng: &mut LcgRng) -> Option<EmissionSample> {
        let dir = sample_uniform_sphere(&rng.next_vec2());
        Some(EmissionSample {
            ray: Ray3f::new(self.position, dir, Some(0.0), None),
            pdf_a: 1.0,
            pdf_w: sample_uniform_sphere_pdf(),
            radiance: self.intensity,
            cos_at_light: 1.0,
        })
    }

    fn radiance(&self, _direction: &Vector3f) -> RGBSpectrum {
        self.intensity
    }

    fn is_delta(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::spectrum::Spectrum;

    #[test]
    fn test_inverse_square() {
        let light = PointEmitter::new(Vector3f::new(0.0, 2.0, 0.0), RGBSpectrum::gray(8.0));
        let mut rng = LcgRng::new(1);
        let s = light.sample_illumination(&Vector3f::zeros(), &mut rng).expect("sample");
        assert!((s.radiance - RGBSpectrum::gray(2.0)).norm() < 1e-6);
        assert!((s.direction - Vector3f::new(0.0, 1.0, 0.0)).norm() < 1e-6);
        assert!((s.distance - 2.0).abs() < 1e-6);
        assert!(s.is_delta);
        assert_eq!(s.pdf_w, 1.0);
    }

    #[test]
    fn test_emission_is_uniform_sphere() {
        let light = PointEmitter::new(Vector3f::zeros(), RGBSpectrum::gray(1.0));
        let mut rng = LcgRng::new(2);
        let mut mean = Vector3f::zeros();
        let n = 20_000;
        for _ in 0..n {
            let s = light.sample_emission(&mut rng).expect("sample");
            assert_eq!(s.ray.origin(), Vector3f::zeros());
            assert!((s.pdf_w - crate::math::constants::INV_FOUR_PI).abs() < 1e-6);
            mean += s.ray.dir();
        }
        assert!((mean / n as Float).norm() < 0.03);
    }
}
