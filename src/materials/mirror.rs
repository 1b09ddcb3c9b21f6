// Copyright @yucwang 2026

use crate::core::bsdf::{ BSDFSample, BSDFValue, BSDF };
use crate::math::constants::{ Float, Vector2f, Vector3f, EPS_COSINE };
use crate::math::spectrum::{ RGBSpectrum, Spectrum };
use crate::math::warp::reflect_local;

/// Perfect specular reflector.
pub struct MirrorBSDF {
    reflectance: RGBSpectrum,
}

impl MirrorBSDF {
    pub fn new(reflectance: RGBSpectrum) -> Self {
        Self { reflectance }
    }

    pub fn reflectance(&self) -> RGBSpectrum {
        self.reflectance
    }
}

impl BSDF for MirrorBSDF {
    fn eval(&self, _wi: &Vector3f, _wo: &Vector3f) -> BSDFValue {
        BSDFValue::black()
    }

    // The value carries 1/cos so that value * cos / pdf is the reflectance.
    fn sample(&self, _u: &Vector2f, wo: &Vector3f) -> BSDFSample {
        if wo.z <= EPS_COSINE {
            return BSDFSample::default();
        }
        let wi = reflect_local(wo);
        BSDFSample::new(wi, 1.0, self.reflectance / wi.z, true)
    }

    fn pdf(&self, _wi: &Vector3f, _wo: &Vector3f) -> Float {
        0.0
    }

    fn continuation_probability(&self) -> Float {
        self.reflectance.max_value().max(0.0).min(1.0)
    }

    fn is_delta(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_sample() {
        let mirror = MirrorBSDF::new(RGBSpectrum::new(0.9, 0.8, 0.7));
        let wo = Vector3f::new(0.6, 0.0, 0.8);
        let s = mirror.sample(&Vector2f::new(0.1, 0.9), &wo);

        assert!(s.is_delta);
        assert_eq!(s.pdf, 1.0);
        assert!((s.wi - Vector3f::new(-0.6, 0.0, 0.8)).norm() < 1e-6);
        let weight = s.value * s.wi.z / s.pdf;
        assert!((weight - mirror.reflectance()).norm() < 1e-5);
    }

    #[test]
    fn test_mirror_has_no_density() {
        let mirror = MirrorBSDF::new(RGBSpectrum::gray(1.0));
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        assert_eq!(mirror.pdf(&wo, &wo), 0.0);
        assert!(mirror.eval(&wo, &wo).is_black());
        assert!(!mirror.sample(&Vector2f::new(0.5, 0.5), &Vector3f::new(0.0, 1.0, 0.0)).is_valid());
    }
}
