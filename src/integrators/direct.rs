// Copyright @yucwang 2026

use crate::core::emitter::Emitter;
use crate::core::integrator::Integrator;
use crate::core::path::{ Path, PathEnd, PathSeed };
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::integrators::common::{ jittered_raster, sample_direct, sanitize, HitState };
use crate::math::bitmap::Bitmap;
use crate::math::spectrum::{ RGBSpectrum, Spectrum };

/// Next-event estimation along a BSDF-sampled camera path. Emission is
/// only picked up where light sampling cannot reach it: at the first hit
/// and after delta bounces.
pub struct DirectLightingIntegrator {
    max_path_length: usize,
}

impl DirectLightingIntegrator {
    pub fn new(max_path_length: usize) -> Self {
        Self { max_path_length }
    }
}

impl Integrator for DirectLightingIntegrator {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn render_pixel(&self, scene: &Scene, pixel: (usize, usize), rng: &mut LcgRng, film: &mut Bitmap) {
        let raster = jittered_raster(pixel, rng);
        let ray = scene.sensor().sample_ray(&raster);
        let path = Path::trace(scene, PathSeed::camera(ray), self.max_path_length, rng);

        let mut radiance = RGBSpectrum::black();
        for (i, node) in path.nodes().iter().enumerate() {
            if let Some(light_id) = node.light_id {
                if i == 0 || node.arrived_by_delta {
                    let le = scene.light(light_id).radiance(&node.wo_world());
                    radiance += node.throughput.component_mul(&le);
                }
                continue;
            }

            let state = HitState::from_node(scene, node);
            if let Some(connection) = sample_direct(scene, &state, rng) {
                radiance += node.throughput.component_mul(&connection.contribution);
            }
        }

        if let PathEnd::Escaped { ray, throughput, is_delta, .. } = path.end() {
            if path.is_empty() || *is_delta {
                for (_, background) in scene.background_lights() {
                    radiance += throughput.component_mul(&background.radiance(&-ray.dir()));
                }
            }
        }

        film.add_color(&raster, &sanitize(radiance));
    }
}
