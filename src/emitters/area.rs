// Copyright @yucwang 2026

use crate::core::emitter::{ EmissionSample, Emitter, IlluminationSample };
use crate::core::rng::LcgRng;
use crate::math::constants::{ Float, Vector3f, EPS_COSINE };
use crate::math::frame::Frame;
use crate::math::ray::Ray3f;
use crate::math::spectrum::{ RGBSpectrum, Spectrum };
use crate::math::warp::{ sample_power_cos_hemisphere, sample_power_cos_hemisphere_pdf };

/// Triangle emitting constant radiance from its front side.
pub struct AreaEmitter {
    p0: Vector3f,
    e1: Vector3f,
    e2: Vector3f,
    frame: Frame,
    inv_area: Float,
    radiance: RGBSpectrum,
    emission_exponent: Float,
}

impl AreaEmitter {
    pub fn new(p0: Vector3f, p1: Vector3f, p2: Vector3f, radiance: RGBSpectrum) -> Self {
        let e1 = p1 - p0;
        let e2 = p2 - p0;
        let cross = e1.cross(&e2);
        let area = 0.5 * cross.norm();
        Self {
            p0,
            e1,
            e2,
            frame: Frame::from_z(&cross.normalize()),
            inv_area: if area > 0.0 { 1.0 / area } else { 0.0 },
            radiance,
            emission_exponent: 1.0,
        }
    }

    pub fn normal(&self) -> Vector3f {
        self.frame.normal()
    }

    // Uniform point by rejection of the unit square onto the lower triangle.
    fn sample_point(&self, rng: &mut LcgRng) -> Vector3f {
        loop {
            let u = rng.next_vec2();
            if u.x + u.y <= 1.0 {
                return self.p0 + self.e1 * u.x + self.e2 * u.y;
            }
        }
    }
}

impl Emitter for AreaEmitter {
    fn sample_illumination(&self, receiver: &Vector3f, rng: &mut LcgRng) -> Option<IlluminationSample> {
        if self.inv_area <= 0.0 {
            return None;
        }
        let point = self.sample_point(rng);
        let to_light = point - receiver;
        let dist_sqr = to_light.norm_squared();
        if dist_sqr <= 0.0 {
            return None;
        }
        let distance = dist_sqr.sqrt();
        let direction = to_light / distance;

        let cos_at_light = self.normal().dot(&-direction);
        if cos_at_light <= EPS_COSINE {
            return None;
        }

        Some(IlluminationSample {
            radiance: self.radiance,
            direction,
            distance,
            pdf_w: dist_sqr * self.inv_area / cos_at_light,
            pdf_a: self.inv_area,
            cos_at_light,
            is_delta: false,
        })
    }

    fn pdf_emission_area(&self, _point: &Vector3f) -> Float {
        self.inv_area
    }

    fn sample_emission(&self, rng: &mut LcgRng) -> Option<EmissionSample> {
        if self.inv_area <= 0.0 {
            return None;
        }
        let point = self.sample_point(rng);
        let local = sample_power_cos_hemisphere(&rng.next_vec2(), self.emission_exponent);
        let pdf_w = sample_power_cos_hemisphere_pdf(local.z, self.emission_exponent);
        if local.z <= EPS_COSINE || pdf_w <= 0.0 {
            return None;
        }

        Some(EmissionSample {
            ray: Ray3f::spawn(point, self.frame.to_world(&local)),
            pdf_a: self.inv_area,
            pdf_w,
            radiance: self.radiance,
            cos_at_light: local.z,
        })
    }

    fn radiance(&self, direction: &Vector3f) -> RGBSpectrum {
        if self.cos_gamma(direction) > 0.0 {
            self.radiance
        } else {
            RGBSpectrum::black()
        }
    }

    fn cos_gamma(&self, direction: &Vector3f) -> Float {
        self.normal().dot(direction)
    }
}
