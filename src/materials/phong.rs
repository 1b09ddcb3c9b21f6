// Copyright @yucwang 2026

use crate::core::bsdf::{ BSDFSample, BSDFValue, BSDF };
use crate::math::constants::{ Float, Vector2f, Vector3f, INV_PI, INV_TWO_PI };
use crate::math::frame::Frame;
use crate::math::spectrum::{ RGBSpectrum, Spectrum };
use crate::math::warp::{ reflect_local, sample_cosine_hemisphere, sample_power_cos_hemisphere };

/// Lambertian diffuse lobe plus a normalised Phong glossy lobe.
pub struct PhongBSDF {
    diffuse: RGBSpectrum,
    glossy: RGBSpectrum,
    exponent: Float,
    prob_diffuse: Float,
    prob_glossy: Float,
    continuation: Float,
}

impl PhongBSDF {
    pub fn new(diffuse: RGBSpectrum, glossy: RGBSpectrum, exponent: Float) -> Self {
        let max_diffuse = diffuse.max_value().max(0.0);
        let max_glossy = glossy.max_value().max(0.0);
        let total = max_diffuse + max_glossy;
        let (prob_diffuse, prob_glossy) = if total > 0.0 {
            (max_diffuse / total, max_glossy / total)
        } else {
            (0.0, 0.0)
        };

        Self {
            diffuse,
            glossy,
            exponent: exponent.max(0.0),
            prob_diffuse,
            prob_glossy,
            continuation: total.min(1.0),
        }
    }

    pub fn diffuse(&self) -> RGBSpectrum {
        self.diffuse
    }

    pub fn glossy(&self) -> RGBSpectrum {
        self.glossy
    }

    pub fn exponent(&self) -> Float {
        self.exponent
    }

    // Mixture density without the horizon test on `wi`.
    fn lobe_pdf(&self, wi: &Vector3f, wo: &Vector3f) -> Float {
        let mut pdf = 0.0;
        if self.prob_diffuse > 0.0 {
            pdf += self.prob_diffuse * wi.z.max(0.0) * INV_PI;
        }
        if self.prob_glossy > 0.0 {
            let cos_lobe = reflect_local(wo).dot(wi).max(0.0);
            pdf += self.prob_glossy * (self.exponent + 1.0) * cos_lobe.powf(self.exponent) * INV_TWO_PI;
        }
        pdf
    }
}

impl BSDF for PhongBSDF {
    fn eval(&self, wi: &Vector3f, wo: &Vector3f) -> BSDFValue {
        if wi.z <= 0.0 || wo.z <= 0.0 {
            return BSDFValue::black();
        }

        let mut value = self.diffuse * INV_PI;
        if self.prob_glossy > 0.0 {
            let cos_lobe = wo.dot(&reflect_local(wi)).max(0.0);
            value += self.glossy * ((self.exponent + 2.0) * INV_TWO_PI * cos_lobe.powf(self.exponent));
        }
        value
    }

    fn sample(&self, u: &Vector2f, wo: &Vector3f) -> BSDFSample {
        if wo.z <= 0.0 || self.prob_diffuse + self.prob_glossy <= 0.0 {
            return BSDFSample::default();
        }

        let choose_diffuse = u.x < self.prob_diffuse;
        let mut remapped = *u;
        if self.prob_diffuse > 0.0 && self.prob_diffuse < 1.0 {
            if choose_diffuse {
                remapped.x = u.x / self.prob_diffuse;
            } else {
                remapped.x = (u.x - self.prob_diffuse) / self.prob_glossy;
            }
        }
        remapped.x = remapped.x.min(1.0 - Float::EPSILON);

        let wi = if choose_diffuse {
            sample_cosine_hemisphere(&remapped)
        } else {
            let lobe_frame = Frame::from_z(&reflect_local(wo));
            lobe_frame.to_world(&sample_power_cos_hemisphere(&remapped, self.exponent))
        };

        let pdf = self.lobe_pdf(&wi, wo);
        BSDFSample::new(wi, pdf, self.eval(&wi, wo), false)
    }

    fn pdf(&self, wi: &Vector3f, wo: &Vector3f) -> Float {
        if wi.z <= 0.0 || wo.z <= 0.0 {
            return 0.0;
        }
        self.lobe_pdf(wi, wo)
    }

    fn continuation_probability(&self) -> Float {
        self.continuation
    }
}
