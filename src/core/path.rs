// Copyright @yucwang 2026

use crate::core::bsdf::BSDF;
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::math::constants::{ Float, Vector3f };
use crate::math::frame::Frame;
use crate::math::ray::Ray3f;
use crate::math::spectrum::{ RGBSpectrum, Spectrum };
use crate::math::warp::pdf_w_to_a;

pub const DEFAULT_MAX_PATH_LENGTH: usize = 10;

/// One scattering event. Directions are in the node's local frame; `wo`
/// points back towards the previous vertex and `wi` along the continuation.
#[derive(Debug, Clone, Copy)]
pub struct PathNode {
    pub position: Vector3f,
    pub frame: Frame,
    pub wo: Vector3f,
    pub wi: Vector3f,
    /// Sampled BSDF value for the continuation.
    pub bsdf_value: RGBSpectrum,
    /// Solid angle density of the continuation, roulette survival included.
    pub pdf_w: Float,
    /// Solid angle density with which this node was reached.
    pub arrival_pdf_w: Float,
    /// Area density of arriving at this node.
    pub pdf_a: Float,
    pub dist_prev: Float,
    /// Throughput of the path up to and including the arrival at this node.
    pub throughput: RGBSpectrum,
    pub material_id: usize,
    pub light_id: Option<usize>,
    /// The arrival segment came from a delta sample.
    pub arrived_by_delta: bool,
    pub is_delta: bool,
}

impl PathNode {
    pub fn wo_world(&self) -> Vector3f {
        self.frame.to_world(&self.wo)
    }

    pub fn is_emissive(&self) -> bool {
        self.light_id.is_some()
    }
}

/// Why path construction stopped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathEnd {
    /// Left the scene; carries the last ray and its continuation data.
    Escaped { ray: Ray3f, throughput: RGBSpectrum, pdf_w: Float, is_delta: bool },
    Absorbed,
    LightHit,
    MaxLength,
}

/// Starting ray of a path with its initial throughput and density.
#[derive(Debug, Clone, Copy)]
pub struct PathSeed {
    pub ray: Ray3f,
    pub throughput: RGBSpectrum,
    pub pdf_w: Float,
}

impl PathSeed {
    pub fn camera(ray: Ray3f) -> Self {
        Self { ray, throughput: RGBSpectrum::gray(1.0), pdf_w: 1.0 }
    }
}

pub fn survives_roulette(q: Float, rng: &mut LcgRng) -> bool {
    rng.next_f32() < q
}

pub struct Path {
    nodes: Vec<PathNode>,
    end: PathEnd,
}

impl Path {
    /// Extends `seed` through the scene until it escapes, hits a light, is
    /// absorbed or reaches `max_length` nodes.
    pub fn trace(scene: &Scene, seed: PathSeed, max_length: usize, rng: &mut LcgRng) -> Path {
        let mut nodes: Vec<PathNode> = Vec::with_capacity(max_length.min(16));
        let mut ray = seed.ray;
        let mut throughput = seed.throughput;
        let mut pdf_w = seed.pdf_w;
        let mut arrived_by_delta = false;

        let end = loop {
            if nodes.len() >= max_length {
                break PathEnd::MaxLength;
            }

            let hit = match scene.ray_intersection(&ray) {
                Some(hit) => hit,
                None => break PathEnd::Escaped { ray, throughput, pdf_w, is_delta: arrived_by_delta },
            };

            let frame = Frame::from_z(&hit.geo_normal());
            let wo = frame.to_local(&-ray.dir());
            let dist = hit.t();
            nodes.push(PathNode {
                position: hit.p(),
                frame,
                wo,
                wi: Vector3f::zeros(),
                bsdf_value: RGBSpectrum::black(),
                pdf_w: 0.0,
                arrival_pdf_w: pdf_w,
                pdf_a: pdf_w_to_a(pdf_w, dist, wo.z),
                dist_prev: dist,
                throughput,
                material_id: hit.material_id(),
                light_id: hit.light_id(),
                arrived_by_delta,
                is_delta: false,
            });

            if hit.is_emissive() {
                break PathEnd::LightHit;
            }
            if nodes.len() >= max_length {
                break PathEnd::MaxLength;
            }

            let material = scene.material(hit.material_id());
            let q = material.continuation_probability();
            if !survives_roulette(q, rng) {
                break PathEnd::Absorbed;
            }

            let sample = material.sample(&rng.next_vec2(), &wo);
            let continuation_pdf = sample.pdf * q;
            if !(continuation_pdf > 0.0) {
                break PathEnd::Absorbed;
            }

            let cos_out = sample.wi.z.abs();
            if let Some(node) = nodes.last_mut() {
                node.wi = sample.wi;
                node.bsdf_value = sample.value;
                node.pdf_w = continuation_pdf;
                node.is_delta = sample.is_delta;
            }

            throughput = throughput.component_mul(&sample.value) * (cos_out / continuation_pdf);
            ray = Ray3f::spawn(hit.p(), frame.to_world(&sample.wi));
            pdf_w = continuation_pdf;
            arrived_by_delta = sample.is_delta;
        };

        Path { nodes, end }
    }

    pub fn nodes(&self) -> &[PathNode] {
        &self.nodes
    }

    pub fn end(&self) -> &PathEnd {
        &self.end
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::phong::PhongBSDF;
    use crate::sensors::perspective::PerspectiveCamera;
    use crate::shapes::triangle::Triangle;

    // Large white floor at y = 0 facing up, camera looking down at it.
    fn floor_scene(albedo: Float) -> Scene {
        let camera = PerspectiveCamera::new(Vector3f::new(0.0, 2.0, 0.0), Vector3f::zeros(),
                                            Vector3f::new(0.0, 0.0, -1.0), 0.5, 4, 4);
        let mut scene = Scene::new(Box::new(camera));
        let m = scene.add_material(PhongBSDF::new(RGBSpectrum::gray(albedo), RGBSpectrum::black(), 1.0).into());
        let s = 100.0;
        scene.add_shape(Box::new(Triangle::new(Vector3f::new(-s, 0.0, -s), Vector3f::new(-s, 0.0, s),
                                               Vector3f::new(s, 0.0, s), m)));
        scene.add_shape(Box::new(Triangle::new(Vector3f::new(-s, 0.0, -s), Vector3f::new(s, 0.0, s),
                                               Vector3f::new(s, 0.0, -s), m)));
        scene
    }

    fn down_ray() -> Ray3f {
        Ray3f::new(Vector3f::new(0.1, 2.0, 0.3), Vector3f::new(0.0, -1.0, 0.0), None, None)
    }

    #[test]
    fn test_white_floor_keeps_unit_throughput() {
        let scene = floor_scene(1.0);
        let mut rng = LcgRng::new(9);
        let path = Path::trace(&scene, PathSeed::camera(down_ray()), 10, &mut rng);

        assert_eq!(path.len(), 1);
        let node = &path.nodes()[0];
        assert!((node.position.y).abs() < 1e-4);
        assert!((node.wo.z - 1.0).abs() < 1e-5);
        assert!((node.dist_prev - 2.0).abs() < 1e-4);
        assert!((node.pdf_a - 0.25).abs() < 1e-5);
        match path.end() {
            PathEnd::Escaped { throughput, pdf_w, .. } => {
                assert!((throughput - RGBSpectrum::gray(1.0)).norm() < 1e-3);
                assert!((pdf_w - node.pdf_w).abs() < 1e-6);
            }
            other => panic!("unexpected end {:?}", other),
        }
    }

    #[test]
    fn test_ceiling_and_miss() {
        let scene = floor_scene(1.0);
        let mut rng = LcgRng::new(9);
        let path = Path::trace(&scene, PathSeed::camera(down_ray()), 1, &mut rng);
        assert_eq!(path.len(), 1);
        assert_eq!(*path.end(), PathEnd::MaxLength);

        let up = Ray3f::new(Vector3f::new(0.0, 2.0, 0.0), Vector3f::new(0.0, 1.0, 0.0), None, None);
        let path = Path::trace(&scene, PathSeed::camera(up), 10, &mut rng);
        assert!(path.is_empty());
        match path.end() {
            PathEnd::Escaped { throughput, pdf_w, is_delta, .. } => {
                assert_eq!(*throughput, RGBSpectrum::gray(1.0));
                assert_eq!(*pdf_w, 1.0);
                assert!(!is_delta);
            }
            other => panic!("unexpected end {:?}", other),
        }
    }

    #[test]
    fn test_black_surface_absorbs() {
        let scene = floor_scene(0.0);
        let mut rng = LcgRng::new(9);
        let path = Path::trace(&scene, PathSeed::camera(down_ray()), 10, &mut rng);
        assert_eq!(path.len(), 1);
        assert_eq!(*path.end(), PathEnd::Absorbed);
    }

    #[test]
    fn test_light_hit_stops_path() {
        let mut scene = floor_scene(1.0);
        scene.add_area_light(Vector3f::new(-1.0, 1.0, -1.0), Vector3f::new(1.0, 1.0, -1.0),
                             Vector3f::new(0.0, 1.0, 1.0), RGBSpectrum::gray(1.0));
        let mut rng = LcgRng::new(9);
        let path = Path::trace(&scene, PathSeed::camera(down_ray()), 10, &mut rng);
        // The light faces down, so the downward ray passes through its back.
        assert!(!path.nodes()[0].is_emissive());

        let up = Ray3f::new(Vector3f::new(0.0, 0.5, 0.0), Vector3f::new(0.0, 1.0, 0.0), None, None);
        let path = Path::trace(&scene, PathSeed::camera(up), 10, &mut rng);
        assert_eq!(path.len(), 1);
        assert!(path.nodes()[0].is_emissive());
        assert_eq!(*path.end(), PathEnd::LightHit);
    }

    #[test]
    fn test_roulette_is_unbiased() {
        let mut rng = LcgRng::new(77);
        let c = 3.5;
        for &q in [0.1, 0.5, 0.9, 1.0].iter() {
            let n = 200_000;
            let mut sum = 0.0f64;
            for _ in 0..n {
                if survives_roulette(q, &mut rng) {
                    sum += (c / q) as f64;
                }
            }
            let mean = sum / n as f64;
            assert!((mean - c as f64).abs() < 0.03 * c as f64, "q = {}: {}", q, mean);
        }
    }
}
