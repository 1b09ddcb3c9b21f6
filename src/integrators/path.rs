// Copyright @yucwang 2026

use crate::core::emitter::Emitter;
use crate::core::integrator::Integrator;
use crate::core::path::{ Path, PathEnd, PathSeed };
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::integrators::common::{ jittered_raster, sanitize };
use crate::math::bitmap::Bitmap;
use crate::math::spectrum::{ RGBSpectrum, Spectrum };

/// Pure BSDF random walk: radiance is only collected when the walk hits a
/// light or escapes to the background.
pub struct PathIntegrator {
    max_path_length: usize,
}

impl PathIntegrator {
    pub fn new(max_path_length: usize) -> Self {
        Self { max_path_length }
    }
}

impl Integrator for PathIntegrator {
    fn name(&self) -> &'static str {
        "path"
    }

    fn render_pixel(&self, scene: &Scene, pixel: (usize, usize), rng: &mut LcgRng, film: &mut Bitmap) {
        let raster = jittered_raster(pixel, rng);
        let ray = scene.sensor().sample_ray(&raster);
        let path = Path::trace(scene, PathSeed::camera(ray), self.max_path_length, rng);

        let mut radiance = RGBSpectrum::black();
        for node in path.nodes() {
            if let Some(light_id) = node.light_id {
                let le = scene.light(light_id).radiance(&node.wo_world());
                radiance += node.throughput.component_mul(&le);
            }
        }

        if let PathEnd::Escaped { ray, throughput, .. } = path.end() {
            for (_, background) in scene.background_lights() {
                radiance += throughput.component_mul(&background.radiance(&-ray.dir()));
            }
        }

        film.add_color(&raster, &sanitize(radiance));
    }
}
