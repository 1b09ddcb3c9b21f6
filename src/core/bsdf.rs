// Copyright @yucwang 2023

use crate::materials::mirror::MirrorBSDF;
use crate::materials::phong::PhongBSDF;
use crate::math::constants::{ Float, Vector2f, Vector3f };
use crate::math::spectrum::{ RGBSpectrum, Spectrum };

// Definitions of types used in BSDF sampling and eval
// processes. All directions live in the local shading frame (+z normal),
// `wo` points back along the path, `wi` is the scattered direction.
pub type BSDFValue = RGBSpectrum;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BSDFSample {
    pub wi: Vector3f,
    pub pdf: Float,
    pub value: BSDFValue,
    pub is_delta: bool,
}

impl Default for BSDFSample {
    fn default() -> Self {
        Self {
            wi: Vector3f::zeros(),
            pdf: 0.0,
            value: BSDFValue::black(),
            is_delta: false,
        }
    }
}

impl BSDFSample {
    pub fn new(wi: Vector3f, pdf: Float, value: BSDFValue, is_delta: bool) -> Self {
        Self { wi, pdf, value, is_delta }
    }

    pub fn is_valid(&self) -> bool {
        self.pdf > 0.0 && self.pdf.is_finite()
    }
}

pub trait BSDF: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn eval(&self, wi: &Vector3f, wo: &Vector3f) -> BSDFValue;

    /// Importance-samples `wi`. The returned pdf is in solid angle and
    /// matches `pdf(wi, wo)` for non-delta materials.
    fn sample(&self, u: &Vector2f, wo: &Vector3f) -> BSDFSample;

    fn pdf(&self, wi: &Vector3f, wo: &Vector3f) -> Float;

    /// Russian roulette survival probability, in `[0, 1]`.
    fn continuation_probability(&self) -> Float;

    fn is_delta(&self) -> bool {
        false
    }
}

/// Closed set of surface materials known to the renderer.
pub enum Material {
    Phong(PhongBSDF),
    Mirror(MirrorBSDF),
}

impl Material {
    fn inner(&self) -> &dyn BSDF {
        match self {
            Material::Phong(bsdf) => bsdf,
            Material::Mirror(bsdf) => bsdf,
        }
    }
}

impl BSDF for Material {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn eval(&self, wi: &Vector3f, wo: &Vector3f) -> BSDFValue {
        self.inner().eval(wi, wo)
    }

    fn sample(&self, u: &Vector2f, wo: &Vector3f) -> BSDFSample {
        self.inner().sample(u, wo)
    }

    fn pdf(&self, wi: &Vector3f, wo: &Vector3f) -> Float {
        self.inner().pdf(wi, wo)
    }

    fn continuation_probability(&self) -> Float {
        self.inner().continuation_probability()
    }

    fn is_delta(&self) -> bool {
        self.inner().is_delta()
    }
}

impl From<PhongBSDF> for Material {
    fn from(bsdf: PhongBSDF) -> Self {
        Material::Phong(bsdf)
    }
}

impl From<MirrorBSDF> for Material {
    fn from(bsdf: MirrorBSDF) -> Self {
        Material::Mirror(bsdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_dispatch() {
        let diffuse: Material = PhongBSDF::new(RGBSpectrum::gray(0.5), RGBSpectrum::black(), 1.0).into();
        let mirror: Material = MirrorBSDF::new(RGBSpectrum::gray(0.9)).into();

        assert!(!diffuse.is_delta());
        assert!(mirror.is_delta());
        assert!((diffuse.continuation_probability() - 0.5).abs() < 1e-6);
        assert!((mirror.continuation_probability() - 0.9).abs() < 1e-6);

        let up = Vector3f::new(0.0, 0.0, 1.0);
        assert!((diffuse.eval(&up, &up).x - 0.5 / crate::math::constants::PI).abs() < 1e-6);
        assert_eq!(mirror.eval(&up, &up), RGBSpectrum::black());
    }
}
