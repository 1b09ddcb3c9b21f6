// Copyright @yucwang 2026

use crate::core::bsdf::Material;
use crate::core::emitter::{ Emitter, Light };
use crate::core::interaction::SurfaceIntersection;
use crate::core::sensor::Sensor;
use crate::core::shape::Shape;
use crate::emitters::area::AreaEmitter;
use crate::materials::phong::PhongBSDF;
use crate::math::aabb::AABB;
use crate::math::constants::{ Float, Vector3f, EPS_RAY };
use crate::math::ray::Ray3f;
use crate::math::spectrum::{ RGBSpectrum, Spectrum };
use crate::shapes::triangle::Triangle;

/// Flat list of primitives plus the materials and lights they refer to.
/// Immutable while rendering and shared by reference between workers.
pub struct Scene {
    shapes: Vec<Box<dyn Shape>>,
    materials: Vec<Material>,
    lights: Vec<Light>,
    sensor: Box<dyn Sensor>,
    backgrounds: Vec<usize>,
    emitter_material: Option<usize>,
    scene_bounds: AABB,
}

impl Scene {
    pub fn new(sensor: Box<dyn Sensor>) -> Self {
        Self {
            shapes: Vec::new(),
            materials: Vec::new(),
            lights: Vec::new(),
            sensor,
            backgrounds: Vec::new(),
            emitter_material: None,
            scene_bounds: AABB::default(),
        }
    }

    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn add_shape(&mut self, shape: Box<dyn Shape>) {
        self.scene_bounds.expand_by_aabb(&shape.bounding_box());
        self.shapes.push(shape);
        for light in &mut self.lights {
            light.set_scene_bounds(&self.scene_bounds);
        }
    }

    /// Registers a light and returns its id. Backgrounds are additive: an
    /// escaping ray collects every one of them.
    pub fn add_light(&mut self, light: Light) -> usize {
        let id = self.lights.len();
        if light.is_background() {
            self.backgrounds.push(id);
        }
        self.lights.push(light);
        self.lights[id].set_scene_bounds(&self.scene_bounds);
        id
    }

    /// Adds an emitting triangle: the light itself and the geometry that
    /// lets rays hit it.
    pub fn add_area_light(&mut self, p0: Vector3f, p1: Vector3f, p2: Vector3f,
                          radiance: RGBSpectrum) -> usize {
        let material_id = match self.emitter_material {
            Some(id) => id,
            None => {
                let id = self.add_material(PhongBSDF::new(RGBSpectrum::black(), RGBSpectrum::black(), 1.0).into());
                self.emitter_material = Some(id);
                id
            }
        };
        let light_id = self.add_light(AreaEmitter::new(p0, p1, p2, radiance).into());
        self.add_shape(Box::new(Triangle::new(p0, p1, p2, material_id).with_light(light_id)));
        light_id
    }

    /// Nearest hit, narrowing `max_t` after every accepted primitive.
    pub fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceIntersection> {
        let mut ray = *ray;
        let mut nearest = None;
        for shape in &self.shapes {
            if let Some(hit) = shape.ray_intersection(&ray) {
                ray.max_t = hit.t();
                nearest = Some(hit);
            }
        }
        nearest
    }

    pub fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        self.shapes.iter().any(|shape| shape.ray_intersection_t(ray))
    }

    /// Shadow query between `point` and the point `max_distance` along
    /// `direction`, with both ends pulled in by `EPS_RAY`.
    pub fn occluded(&self, point: &Vector3f, direction: &Vector3f, max_distance: Float) -> bool {
        let max_t = max_distance - 2.0 * EPS_RAY;
        if max_t <= 0.0 {
            return false;
        }
        let ray = Ray3f::new(point + direction * EPS_RAY, *direction, Some(0.0), Some(max_t));
        self.ray_intersection_t(&ray)
    }

    pub fn material(&self, id: usize) -> &Material {
        &self.materials[id]
    }

    pub fn light(&self, id: usize) -> &Light {
        &self.lights[id]
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    pub fn background_lights(&self) -> impl Iterator<Item = (usize, &Light)> + '_ {
        self.backgrounds.iter().map(move |&id| (id, &self.lights[id]))
    }

    pub fn has_background(&self) -> bool {
        !self.backgrounds.is_empty()
    }

    pub fn sensor(&self) -> &dyn Sensor {
        self.sensor.as_ref()
    }

    pub fn scene_bounds(&self) -> &AABB {
        &self.scene_bounds
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }
}
