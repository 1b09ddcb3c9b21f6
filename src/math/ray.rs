// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f, EPS_RAY};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray3f {
    origin: Vector3f,
    dir: Vector3f,
    pub min_t: Float,
    pub max_t: Float
}

impl Ray3f {
    pub fn new(o: Vector3f, d: Vector3f, 
               min_t: Option<Float>, max_t: Option<Float>) -> Self {
        Self { origin: o, dir: d.normalize(), 
               min_t: min_t.unwrap_or(0.0),
               max_t: max_t.unwrap_or(std::f32::MAX)}
    }

    /// Ray leaving a surface point, offset by `EPS_RAY` along its own direction.
    pub fn spawn(o: Vector3f, d: Vector3f) -> Self {
        Self::new(o, d, Some(EPS_RAY), None)
    }

    pub fn origin(&self) -> Vector3f {
        self.origin
    }

    pub fn dir(&self) -> Vector3f {
        self.dir
    }

    pub fn at(&self, t: Float) -> Vector3f {
        self.origin + self.dir * t
    }

    pub fn update(&mut self, t: Float) -> bool {
        if t < self.min_t || t > self.max_t {
            false
        } else {
            self.max_t = t;
            true
        }
    }

    /// Open interval test used by every primitive: `min_t < t < max_t`.
    pub fn in_range(&self, t: Float) -> bool {
        t > self.min_t && t < self.max_t
    }
}

/* Tests for Ray */
