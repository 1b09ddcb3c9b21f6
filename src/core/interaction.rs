// Copyright @yucwang 2023

use crate::math::constants::{ Float, Vector3f };

/// Nearest-hit record returned by the intersection service.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceIntersection {
    p: Vector3f,
    geo_normal: Vector3f,
    t: Float,
    material_id: usize,
    light_id: Option<usize>,
}

impl SurfaceIntersection {
    pub fn new(new_p: Vector3f, 
               new_geo_normal: Vector3f, 
               new_t: Float,
               new_material_id: usize,
               new_light_id: Option<usize>) -> Self {
        Self { p: new_p, geo_normal: new_geo_normal, t: new_t,
               material_id: new_material_id, light_id: new_light_id }
    }

    pub fn t(&self) -> Float {
        self.t
    }

    pub fn p(&self) -> Vector3f {
        self.p
    }

    pub fn geo_normal(&self) -> Vector3f {
        self.geo_normal
    }

    pub fn material_id(&self) -> usize {
        self.material_id
    }

    pub fn light_id(&self) -> Option<usize> {
        self.light_id
    }

    pub fn is_emissive(&self) -> bool {
        self.light_id.is_some()
    }
}
