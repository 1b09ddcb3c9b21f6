// Copyright @yucwang 2026

use crate::core::emitter::Emitter;
use crate::core::integrator::Integrator;
use crate::core::path::{ Path, PathEnd, PathSeed };
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::emitters::background::BACKGROUND_RADIUS;
use crate::integrators::common::{ bsdf_hit_weight, jittered_raster, sample_direct, sanitize, HitState };
use crate::math::bitmap::Bitmap;
use crate::math::spectrum::{ RGBSpectrum, Spectrum };

/// Next-event estimation and BSDF sampling combined with the balance
/// heuristic in the light's area measure.
pub struct MisIntegrator {
    max_path_length: usize,
}

impl MisIntegrator {
    pub fn new(max_path_length: usize) -> Self {
        Self { max_path_length }
    }
}

impl Integrator for MisIntegrator {
    fn name(&self) -> &'static str {
        "mis"
    }

    fn render_pixel(&self, scene: &Scene, pixel: (usize, usize), rng: &mut LcgRng, film: &mut Bitmap) {
        let raster = jittered_raster(pixel, rng);
        let ray = scene.sensor().sample_ray(&raster);
        let path = Path::trace(scene, PathSeed::camera(ray), self.max_path_length, rng);

        // The last node of a path cut by the length limit never samples a
        // continuation, so light sampling is the only strategy there.
        let capped = *path.end() == PathEnd::MaxLength;
        let last = path.len().saturating_sub(1);

        let mut radiance = RGBSpectrum::black();
        for (i, node) in path.nodes().iter().enumerate() {
            if let Some(light_id) = node.light_id {
                let light = scene.light(light_id);
                let leaving = node.wo_world();
                let weight = if i == 0 || node.arrived_by_delta {
                    1.0
                } else {
                    bsdf_hit_weight(scene, light, node.arrival_pdf_w, &leaving, node.dist_prev,
                                    light.pdf_emission_area(&node.position))
                };
                radiance += node.throughput.component_mul(&light.radiance(&leaving)) * weight;
                continue;
            }

            let state = HitState::from_node(scene, node);
            if let Some(connection) = sample_direct(scene, &state, rng) {
                let weight = if capped && i == last { 1.0 } else { connection.mis_weight() };
                radiance += node.throughput.component_mul(&connection.contribution) * weight;
            }
        }

        if let PathEnd::Escaped { ray, throughput, pdf_w, is_delta } = path.end() {
            for (_, background) in scene.background_lights() {
                let leaving = -ray.dir();
                let weight = if path.is_empty() || *is_delta {
                    1.0
                } else {
                    let far_point = ray.origin() + ray.dir() * BACKGROUND_RADIUS;
                    bsdf_hit_weight(scene, background, *pdf_w, &leaving, BACKGROUND_RADIUS,
                                    background.pdf_emission_area(&far_point))
                };
                radiance += throughput.component_mul(&background.radiance(&leaving)) * weight;
            }
        }

        film.add_color(&raster, &sanitize(radiance));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bsdf::Material;
    use crate::core::integrator::IntegratorKind;
    use crate::materials::mirror::MirrorBSDF;
    use crate::materials::phong::PhongBSDF;
    use crate::math::constants::{ Float, Vector3f };
    use crate::sensors::perspective::PerspectiveCamera;
    use crate::shapes::triangle::Triangle;

    // Single-pixel camera just above a floor, looking straight down, with a
    // square light facing the floor from y = 1.
    fn floor_under_light(floor: Material, light_half_size: Float) -> Scene {
        let camera = PerspectiveCamera::new(Vector3f::new(0.0, 0.4, 0.0), Vector3f::zeros(),
                                            Vector3f::new(0.0, 0.0, -1.0), 0.2, 1, 1);
        let mut scene = Scene::new(Box::new(camera));
        let m = scene.add_material(floor);
        let s = 10.0;
        scene.add_shape(Box::new(Triangle::new(Vector3f::new(-s, 0.0, -s), Vector3f::new(-s, 0.0, s),
                                               Vector3f::new(s, 0.0, s), m)));
        scene.add_shape(Box::new(Triangle::new(Vector3f::new(-s, 0.0, -s), Vector3f::new(s, 0.0, s),
                                               Vector3f::new(s, 0.0, -s), m)));
        let a = light_half_size;
        scene.add_area_light(Vector3f::new(-a, 1.0, -a), Vector3f::new(a, 1.0, -a),
                             Vector3f::new(a, 1.0, a), RGBSpectrum::gray(1.0));
        scene.add_area_light(Vector3f::new(-a, 1.0, -a), Vector3f::new(a, 1.0, a),
                             Vector3f::new(-a, 1.0, a), RGBSpectrum::gray(1.0));
        scene
    }

    fn average(scene: &Scene, kind: IntegratorKind, max_path_length: usize, samples: usize) -> RGBSpectrum {
        let integrator = kind.build(max_path_length);
        let mut film = Bitmap::new(1, 1);
        for iteration in 0..samples {
            let mut rng = LcgRng::for_task(17, iteration as u64, 0);
            integrator.render_pixel(scene, (0, 0), &mut rng, &mut film);
        }
        film.sum() / samples as Float
    }

    #[test]
    fn test_single_vertex_paths_keep_full_light_sampling() {
        let scene = floor_under_light(PhongBSDF::new(RGBSpectrum::gray(0.9), RGBSpectrum::black(), 1.0).into(), 1.0);

        // With one vertex no continuation is drawn, so both estimators consume
        // the same random numbers and must agree sample by sample.
        let direct = IntegratorKind::Direct.build(1);
        let mis = MisIntegrator::new(1);
        for iteration in 0..256u64 {
            let mut direct_film = Bitmap::new(1, 1);
            let mut mis_film = Bitmap::new(1, 1);
            let mut rng = LcgRng::for_task(3, iteration, 0);
            direct.render_pixel(&scene, (0, 0), &mut rng, &mut direct_film);
            let mut rng = LcgRng::for_task(3, iteration, 0);
            mis.render_pixel(&scene, (0, 0), &mut rng, &mut mis_film);
            assert_eq!(direct_film[(0, 0)], mis_film[(0, 0)], "iteration {}", iteration);
        }

        let value = average(&scene, IntegratorKind::Mis, 1, 4096);
        assert!(value.x > 0.3 && value.x < 0.9, "{:?}", value);
    }

    #[test]
    fn test_short_paths_match_direct_lighting() {
        let scene = floor_under_light(PhongBSDF::new(RGBSpectrum::gray(0.9), RGBSpectrum::black(), 1.0).into(), 1.0);
        let samples = 40_000;
        for &length in [1usize, 2].iter() {
            let direct = average(&scene, IntegratorKind::Direct, length, samples);
            let mis = average(&scene, IntegratorKind::Mis, length, samples);
            assert!((mis.x - direct.x).abs() < 0.03 * direct.x,
                    "length {}: mis {:?} vs direct {:?}", length, mis, direct);
        }
    }

    #[test]
    fn test_mirror_vertex_matches_bsdf_walk() {
        let scene = floor_under_light(MirrorBSDF::new(RGBSpectrum::gray(1.0)).into(), 2.0);
        let path = IntegratorKind::Path.build(10);
        let mis = MisIntegrator::new(10);
        for iteration in 0..64u64 {
            let mut path_film = Bitmap::new(1, 1);
            let mut mis_film = Bitmap::new(1, 1);
            let mut rng = LcgRng::for_task(8, iteration, 0);
            path.render_pixel(&scene, (0, 0), &mut rng, &mut path_film);
            let mut rng = LcgRng::for_task(8, iteration, 0);
            mis.render_pixel(&scene, (0, 0), &mut rng, &mut mis_film);

            // The light seen in the mirror is reached by a delta bounce only.
            assert!((mis_film[(0, 0)] - path_film[(0, 0)]).norm() < 1e-5);
            assert!((mis_film[(0, 0)] - RGBSpectrum::gray(1.0)).norm() < 1e-4, "{:?}", mis_film[(0, 0)]);
        }
    }
}
