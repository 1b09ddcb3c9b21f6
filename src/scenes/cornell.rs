// Copyright @yucwang 2026

use crate::core::scene::Scene;
use crate::emitters::background::BackgroundEmitter;
use crate::emitters::point::PointEmitter;
use crate::materials::mirror::MirrorBSDF;
use crate::materials::phong::PhongBSDF;
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::{RGBSpectrum, Spectrum};
use crate::sensors::perspective::PerspectiveCamera;
use crate::shapes::sphere::Sphere;
use crate::shapes::triangle::Triangle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightSetup {
    CeilingArea,
    Point,
    Background,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SphereFinish {
    Diffuse,
    Glossy,
    Mirror,
}

#[derive(Debug, Clone, Copy)]
pub struct CornellOptions {
    pub width: usize,
    pub height: usize,
    pub lights: LightSetup,
    pub left_sphere: SphereFinish,
    pub right_sphere: SphereFinish,
}

impl Default for CornellOptions {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            lights: LightSetup::CeilingArea,
            left_sphere: SphereFinish::Mirror,
            right_sphere: SphereFinish::Glossy,
        }
    }
}

// Two triangles; the winding is chosen so the front faces `facing`.
fn quad_triangles(p: [Vector3f; 4], facing: &Vector3f) -> [[Vector3f; 3]; 2] {
    let n = (p[1] - p[0]).cross(&(p[2] - p[0]));
    if n.dot(facing) >= 0.0 {
        [[p[0], p[1], p[2]], [p[0], p[2], p[3]]]
    } else {
        [[p[0], p[2], p[1]], [p[0], p[3], p[2]]]
    }
}

// Walls get a black outer side so that one-sided triangles still close the
// box for rays coming from outside.
fn add_wall(scene: &mut Scene, p: [Vector3f; 4], facing: Vector3f, material_id: usize, outside_id: usize) {
    for t in quad_triangles(p, &facing).iter() {
        scene.add_shape(Box::new(Triangle::new(t[0], t[1], t[2], material_id)));
    }
    for t in quad_triangles(p, &-facing).iter() {
        scene.add_shape(Box::new(Triangle::new(t[0], t[1], t[2], outside_id)));
    }
}

fn finish_material(scene: &mut Scene, finish: SphereFinish) -> usize {
    match finish {
        SphereFinish::Diffuse => scene.add_material(
            PhongBSDF::new(RGBSpectrum::new(0.7, 0.7, 0.7), RGBSpectrum::black(), 1.0).into()),
        SphereFinish::Glossy => scene.add_material(
            PhongBSDF::new(RGBSpectrum::new(0.1, 0.1, 0.4), RGBSpectrum::gray(0.6), 60.0).into()),
        SphereFinish::Mirror => scene.add_material(MirrorBSDF::new(RGBSpectrum::gray(0.95)).into()),
    }
}

/// Closed box of side 2 centered on the origin, open towards the camera,
/// with a red left wall, a green right wall and two spheres.
pub fn cornell_box(options: &CornellOptions) -> Scene {
    let camera = PerspectiveCamera::new(Vector3f::new(0.0, 0.0, 3.4), Vector3f::zeros(),
                                        Vector3f::new(0.0, 1.0, 0.0), (40.0 as Float).to_radians(),
                                        options.width, options.height);
    let mut scene = Scene::new(Box::new(camera));

    let white = scene.add_material(PhongBSDF::new(RGBSpectrum::gray(0.76), RGBSpectrum::black(), 1.0).into());
    let red = scene.add_material(PhongBSDF::new(RGBSpectrum::new(0.8, 0.1, 0.1), RGBSpectrum::black(), 1.0).into());
    let green = scene.add_material(PhongBSDF::new(RGBSpectrum::new(0.1, 0.6, 0.1), RGBSpectrum::black(), 1.0).into());
    let outside = scene.add_material(PhongBSDF::new(RGBSpectrum::black(), RGBSpectrum::black(), 1.0).into());

    let v = |x: Float, y: Float, z: Float| Vector3f::new(x, y, z);
    // Floor, ceiling, back, left, right.
    add_wall(&mut scene, [v(-1.0, -1.0, -1.0), v(1.0, -1.0, -1.0), v(1.0, -1.0, 1.0), v(-1.0, -1.0, 1.0)],
             v(0.0, 1.0, 0.0), white, outside);
    add_wall(&mut scene, [v(-1.0, 1.0, -1.0), v(1.0, 1.0, -1.0), v(1.0, 1.0, 1.0), v(-1.0, 1.0, 1.0)],
             v(0.0, -1.0, 0.0), white, outside);
    add_wall(&mut scene, [v(-1.0, -1.0, -1.0), v(1.0, -1.0, -1.0), v(1.0, 1.0, -1.0), v(-1.0, 1.0, -1.0)],
             v(0.0, 0.0, 1.0), white, outside);
    add_wall(&mut scene, [v(-1.0, -1.0, -1.0), v(-1.0, 1.0, -1.0), v(-1.0, 1.0, 1.0), v(-1.0, -1.0, 1.0)],
             v(1.0, 0.0, 0.0), red, outside);
    add_wall(&mut scene, [v(1.0, -1.0, -1.0), v(1.0, 1.0, -1.0), v(1.0, 1.0, 1.0), v(1.0, -1.0, 1.0)],
             v(-1.0, 0.0, 0.0), green, outside);

    let left = finish_material(&mut scene, options.left_sphere);
    let right = finish_material(&mut scene, options.right_sphere);
    scene.add_shape(Box::new(Sphere::new(v(-0.45, -0.6, -0.3), 0.4, left)));
    scene.add_shape(Box::new(Sphere::new(v(0.45, -0.6, 0.3), 0.4, right)));

    let ceiling_light = options.lights == LightSetup::CeilingArea || options.lights == LightSetup::All;
    let point_light = options.lights == LightSetup::Point || options.lights == LightSetup::All;
    let background = options.lights == LightSetup::Background || options.lights == LightSetup::All;

    if ceiling_light {
        let s = 0.25;
        let y = 0.995;
        let le = RGBSpectrum::new(17.0, 12.0, 4.0);
        let corners = [v(-s, y, -s), v(s, y, -s), v(s, y, s), v(-s, y, s)];
        for t in quad_triangles(corners, &v(0.0, -1.0, 0.0)).iter() {
            scene.add_area_light(t[0], t[1], t[2], le);
        }
    }
    if point_light {
        scene.add_light(PointEmitter::new(v(0.0, 0.7, 0.0), RGBSpectrum::gray(2.0)).into());
    }
    if background {
        scene.add_light(BackgroundEmitter::new(RGBSpectrum::new(0.4, 0.5, 0.7)).into());
    }

    log::debug!("Cornell box: {} shapes, {} lights.", scene.shape_count(), scene.light_count());
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::integrator::IntegratorKind;
    use crate::core::rng::LcgRng;
    use crate::math::bitmap::Bitmap;
    use crate::math::ray::Ray3f;

    #[test]
    fn test_walls_face_inward() {
        let scene = cornell_box(&CornellOptions { width: 8, height: 8, ..CornellOptions::default() });
        // Ten wall triangles on each side, two spheres, two light triangles.
        assert_eq!(scene.shape_count(), 24);
        assert_eq!(scene.light_count(), 2);

        let inside = Vector3f::new(0.1, 0.2, 0.3);
        let directions = [Vector3f::new(0.0, -1.0, 0.0), Vector3f::new(0.0, 0.0, -1.0),
                          Vector3f::new(-1.0, 0.0, 0.0), Vector3f::new(1.0, 0.0, 0.0)];
        for dir in directions.iter() {
            let ray = Ray3f::new(inside, *dir, None, None);
            let hit = scene.ray_intersection(&ray).expect("wall hit");
            assert!(hit.geo_normal().dot(dir) < 0.0);
        }

        // The open front lets rays leave.
        let out = Ray3f::new(inside, Vector3f::new(0.0, 0.0, 1.0), None, None);
        assert!(scene.ray_intersection(&out).is_none());
    }

    #[test]
    fn test_light_setups() {
        let all = cornell_box(&CornellOptions { lights: LightSetup::All, ..CornellOptions::default() });
        assert_eq!(all.light_count(), 4);
        assert!(all.has_background());

        let point = cornell_box(&CornellOptions { lights: LightSetup::Point, ..CornellOptions::default() });
        assert_eq!(point.light_count(), 1);
        assert!(!point.has_background());
    }

    #[test]
    fn test_renders_finite_light() {
        let scene = cornell_box(&CornellOptions {
            width: 8,
            height: 8,
            lights: LightSetup::All,
            left_sphere: SphereFinish::Mirror,
            right_sphere: SphereFinish::Glossy,
        });
        for kind in [IntegratorKind::Direct, IntegratorKind::Path, IntegratorKind::Mis, IntegratorKind::Light].iter() {
            let integrator = kind.build(8);
            let mut film = Bitmap::new(8, 8);
            for y in 0..8 {
                for x in 0..8 {
                    let mut rng = LcgRng::for_task(3, 0, (x + 8 * y) as u64);
                    integrator.render_pixel(&scene, (x, y), &mut rng, &mut film);
                }
            }
            let sum = film.sum();
            assert!(sum.is_valid(), "{} produced {:?}", kind, sum);
            assert!(sum.max_value() > 0.0, "{} produced a black image", kind);
        }
    }
}
