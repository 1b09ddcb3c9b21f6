// Copyright @yucwang 2026

use crate::core::rng::LcgRng;
use crate::emitters::area::AreaEmitter;
use crate::emitters::background::BackgroundEmitter;
use crate::emitters::point::PointEmitter;
use crate::math::aabb::AABB;
use crate::math::constants::{ Float, Vector3f };
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Light sample as seen from a receiving point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IlluminationSample {
    /// Radiance arriving at the receiver (`I / d²` for point lights).
    pub radiance: RGBSpectrum,
    /// Unit direction from the receiver towards the light.
    pub direction: Vector3f,
    pub distance: Float,
    /// Solid angle density at the receiver.
    pub pdf_w: Float,
    /// Area density of the sampled point on the light.
    pub pdf_a: Float,
    pub cos_at_light: Float,
    pub is_delta: bool,
}

/// Ray leaving a light, used to seed light paths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmissionSample {
    pub ray: Ray3f,
    pub pdf_a: Float,
    pub pdf_w: Float,
    pub radiance: RGBSpectrum,
    pub cos_at_light: Float,
}

/// Directions passed to `radiance`, `cos_gamma` and `transform_pdf_to_light`
/// point away from the light.
pub trait Emitter: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn sample_illumination(&self, receiver: &Vector3f, rng: &mut LcgRng) -> Option<IlluminationSample>;

    /// Area density with which `sample_illumination` would have produced
    /// `point`, a point on the light reached by a ray.
    fn pdf_emission_area(&self, point: &Vector3f) -> Float;

    fn sample_emission(&self, rng: &mut LcgRng) -> Option<EmissionSample>;

    fn radiance(&self, direction: &Vector3f) -> RGBSpectrum;

    fn cos_gamma(&self, _direction: &Vector3f) -> Float {
        1.0
    }

    fn is_background(&self) -> bool {
        false
    }

    fn is_delta(&self) -> bool {
        false
    }

    fn set_scene_bounds(&mut self, _bounds: &AABB) {}

    /// Solid angle density at a receiver `distance` away to area density on
    /// the light.
    fn transform_pdf_to_light(&self, pdf_w: Float, direction: &Vector3f, distance: Float) -> Float {
        if distance <= 0.0 {
            return 0.0;
        }
        pdf_w * self.cos_gamma(direction).max(0.0) / (distance * distance)
    }
}

pub enum Light {
    Area(AreaEmitter),
    Point(PointEmitter),
    Background(BackgroundEmitter),
}

impl Light {
    fn inner(&self) -> &dyn Emitter {
        match self {
            Light::Area(light) => light,
            Light::Point(light) => light,
            Light::Background(light) => light,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Emitter {
        match self {
            Light::Area(light) => light,
            Light::Point(light) => light,
            Light::Background(light) => light,
        }
    }
}

impl Emitter for Light {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn sample_illumination(&self, receiver: &Vector3f, rng: &mut LcgRng) -> Option<IlluminationSample> {
        self.inner().sample_illumination(receiver, rng)
    }

    fn pdf_emission_area(&self, point: &Vector3f) -> Float {
        self.inner().pdf_emission_area(point)
    }

    fn sample_emission(&self, rng: &mut LcgRng) -> Option<EmissionSample> {
        self.inner().sample_emission(rng)
    }

    fn radiance(&self, direction: &Vector3f) -> RGBSpectrum {
        self.inner().radiance(direction)
    }

    fn cos_gamma(&self, direction: &Vector3f) -> Float {
        self.inner().cos_gamma(direction)
    }

    fn is_background(&self) -> bool {
        self.inner().is_background()
    }

    fn is_delta(&self) -> bool {
        self.inner().is_delta()
    }

    fn set_scene_bounds(&mut self, bounds: &AABB) {
        self.inner_mut().set_scene_bounds(bounds)
    }

    fn transform_pdf_to_light(&self, pdf_w: Float, direction: &Vector3f, distance: Float) -> Float {
        self.inner().transform_pdf_to_light(pdf_w, direction, distance)
    }
}

impl From<AreaEmitter> for Light {
    fn from(light: AreaEmitter) -> Self {
        Light::Area(light)
    }
}

impl From<PointEmitter> for Light {
    fn from(light: PointEmitter) -> Self {
        Light::Point(light)
    }
}

impl From<BackgroundEmitter> for Light {
    fn from(light: BackgroundEmitter) -> Self {
        Light::Background(light)
    }
}
