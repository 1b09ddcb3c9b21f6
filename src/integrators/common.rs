// Copyright @yucwang 2026

use crate::core::bsdf::{ Material, BSDF };
use crate::core::emitter::{ Emitter, Light };
use crate::core::path::PathNode;
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::math::constants::{ Float, Vector2f, Vector3f };
use crate::math::frame::Frame;
use crate::math::spectrum::{ RGBSpectrum, Spectrum };

/// Working record for one non-emissive path vertex.
pub struct HitState<'a> {
    pub position: Vector3f,
    pub frame: Frame,
    pub wo: Vector3f,
    pub material: &'a Material,
}

impl<'a> HitState<'a> {
    pub fn from_node(scene: &'a Scene, node: &PathNode) -> Self {
        Self {
            position: node.position,
            frame: node.frame,
            wo: node.wo,
            material: scene.material(node.material_id),
        }
    }
}

/// Clamps estimates that are negative or not finite. These indicate a bug,
/// so debug builds stop on them.
pub fn sanitize(value: RGBSpectrum) -> RGBSpectrum {
    debug_assert!(value.is_valid(), "invalid estimate {:?}", value);
    if value.is_valid() {
        value
    } else {
        RGBSpectrum::black()
    }
}

/// Jittered raster position inside pixel `(x, y)`.
pub fn jittered_raster(pixel: (usize, usize), rng: &mut LcgRng) -> Vector2f {
    let u = rng.next_vec2();
    Vector2f::new(pixel.0 as Float + u.x, pixel.1 as Float + u.y)
}

pub fn light_pick_probability(scene: &Scene) -> Float {
    match scene.light_count() {
        0 => 0.0,
        n => 1.0 / n as Float,
    }
}

/// Uniformly picks one light.
pub fn pick_light<'a>(scene: &'a Scene, rng: &mut LcgRng) -> Option<(usize, &'a Light)> {
    let count = scene.light_count();
    if count == 0 {
        return None;
    }
    let id = ((rng.next_f32() * count as Float) as usize).min(count - 1);
    Some((id, scene.light(id)))
}

/// Unoccluded light sample at a vertex.
pub struct LightConnection {
    /// `Le * f * cos / (pdf_w * pick)`, without any MIS weight.
    pub contribution: RGBSpectrum,
    /// Density of the light strategy in the light's area measure.
    pub pdf_light: Float,
    /// Density the BSDF walk would have had of reaching the same point,
    /// in the same measure and with roulette included.
    pub pdf_bsdf: Float,
    pub is_delta: bool,
}

impl LightConnection {
    /// Balance heuristic weight of the light strategy.
    pub fn mis_weight(&self) -> Float {
        if self.is_delta {
            return 1.0;
        }
        let sum = self.pdf_light + self.pdf_bsdf;
        if sum > 0.0 { self.pdf_light / sum } else { 0.0 }
    }
}

/// Next-event estimation: one uniformly picked light, sampled from the
/// vertex and tested for visibility.
pub fn sample_direct(scene: &Scene, state: &HitState, rng: &mut LcgRng) -> Option<LightConnection> {
    let (_, light) = pick_light(scene, rng)?;
    let pick = light_pick_probability(scene);

    let sample = light.sample_illumination(&state.position, rng)?;
    if !(sample.pdf_w > 0.0) {
        return None;
    }
    let wi = state.frame.to_local(&sample.direction);
    if wi.z <= 0.0 {
        return None;
    }
    let f = state.material.eval(&wi, &state.wo);
    if f.is_black() || sample.radiance.is_black() {
        return None;
    }
    if scene.occluded(&state.position, &sample.direction, sample.distance) {
        return None;
    }

    let bsdf_pdf_w = state.material.pdf(&wi, &state.wo) * state.material.continuation_probability();
    Some(LightConnection {
        contribution: sample.radiance.component_mul(&f) * (wi.z / (sample.pdf_w * pick)),
        pdf_light: pick * sample.pdf_a,
        pdf_bsdf: light.transform_pdf_to_light(bsdf_pdf_w, &-sample.direction, sample.distance),
        is_delta: sample.is_delta,
    })
}

/// Balance heuristic weight of a BSDF-sampled segment that reached `light`
/// with solid angle density `pdf_w` over `distance`, leaving the light along
/// `leaving`. `light_pdf_a` is the light's own area density of the point.
pub fn bsdf_hit_weight(scene: &Scene, light: &Light, pdf_w: Float, leaving: &Vector3f,
                       distance: Float, light_pdf_a: Float) -> Float {
    let pdf_bsdf = light.transform_pdf_to_light(pdf_w, leaving, distance);
    let pdf_light = light_pick_probability(scene) * light_pdf_a;
    let sum = pdf_bsdf + pdf_light;
    if sum > 0.0 { pdf_bsdf / sum } else { 0.0 }
}
