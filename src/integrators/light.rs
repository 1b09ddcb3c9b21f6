// Copyright @yucwang 2026

use crate::core::bsdf::BSDF;
use crate::core::emitter::Emitter;
use crate::core::integrator::Integrator;
use crate::core::path::{ Path, PathSeed };
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::integrators::common::{ sanitize, HitState };
use crate::math::bitmap::Bitmap;
use crate::math::constants::{ Float, Vector2f, Vector3f };
use crate::math::spectrum::Spectrum;

/// Traces one path from every light per pixel task and connects each vertex
/// to the pinhole. Splats land wherever the vertices project.
pub struct LightTracingIntegrator {
    max_path_length: usize,
}

struct CameraConnection {
    raster: Vector2f,
    /// Unit direction from the vertex towards the camera.
    direction: Vector3f,
    /// Pinhole importance times the camera side of the geometry term.
    importance: Float,
}

impl LightTracingIntegrator {
    pub fn new(max_path_length: usize) -> Self {
        Self { max_path_length }
    }

    // The pinhole importance over the unit-distance image plane of area A is
    // 1 / (A cos⁴), and the camera cosine cancels one of them. A is
    // `(2 tan(fov/2))² · aspect`, so for a square image this is the
    // `(2 tan(fov/2))² cos⁴` normalization with the camera cosine folded in.
    fn connect_to_camera(scene: &Scene, point: &Vector3f) -> Option<CameraConnection> {
        let sensor = scene.sensor();
        let raster = sensor.world_to_raster(point)?;

        let to_camera = sensor.position() - point;
        let distance = to_camera.norm();
        if distance <= 0.0 {
            return None;
        }
        let direction = to_camera / distance;
        let cos_camera = sensor.forward().dot(&-direction);
        if cos_camera <= 0.0 {
            return None;
        }
        if scene.occluded(point, &direction, distance) {
            return None;
        }

        let importance = 1.0 / (distance * distance * sensor.image_plane_area()
                                * cos_camera * cos_camera * cos_camera);
        Some(CameraConnection { raster, direction, importance })
    }
}

impl Integrator for LightTracingIntegrator {
    fn name(&self) -> &'static str {
        "light"
    }

    fn render_pixel(&self, scene: &Scene, _pixel: (usize, usize), rng: &mut LcgRng, film: &mut Bitmap) {
        for light in scene.lights() {
            let emission = match light.sample_emission(rng) {
                Some(emission) => emission,
                None => continue,
            };
            if !(emission.pdf_a > 0.0 && emission.pdf_w > 0.0) {
                continue;
            }

            // The background has no vertex of its own to connect.
            if !light.is_background() {
                let origin = emission.ray.origin();
                if let Some(connection) = Self::connect_to_camera(scene, &origin) {
                    let cos_light = light.cos_gamma(&connection.direction);
                    if cos_light > 0.0 {
                        let le = light.radiance(&connection.direction);
                        let value = le * (cos_light / emission.pdf_a * connection.importance);
                        film.add_color(&connection.raster, &sanitize(value));
                    }
                }
            }

            let seed = PathSeed {
                ray: emission.ray,
                throughput: emission.radiance * (emission.cos_at_light / (emission.pdf_a * emission.pdf_w)),
                pdf_w: emission.pdf_w,
            };
            let path = Path::trace(scene, seed, self.max_path_length, rng);

            for node in path.nodes() {
                if node.is_emissive() || node.throughput.is_black() {
                    continue;
                }
                let connection = match Self::connect_to_camera(scene, &node.position) {
                    Some(connection) => connection,
                    None => continue,
                };
                let state = HitState::from_node(scene, node);
                let wi = state.frame.to_local(&connection.direction);
                if wi.z <= 0.0 {
                    continue;
                }
                let f = state.material.eval(&wi, &state.wo);
                if f.is_black() {
                    continue;
                }
                let value = node.throughput.component_mul(&f) * (wi.z * connection.importance);
                film.add_color(&connection.raster, &sanitize(value));
            }
        }
    }
}
