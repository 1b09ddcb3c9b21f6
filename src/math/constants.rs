/* Copyright 2020 @Yuchen Wong */

use nalgebra as na;

pub type Float = f32;
pub type Int = i32;
pub type UInt = u32;

pub type Vector2f = na::Vector2<Float>;
pub type Vector3f = na::Vector3<Float>;

pub const EPSILON: Float = 1e-4;
pub const PI: Float = 3.14159265359;
pub const INV_PI: Float = 0.31830988618;
pub const INV_TWO_PI: Float = 0.15915494309;
pub const INV_FOUR_PI: Float = 0.07957747154;

pub const FLOAT_MAX: Float = std::f32::MAX;
pub const FLOAT_MIN: Float = std::f32::MIN;

// Offset applied to secondary rays so they do not re-hit their origin surface.
pub const EPS_RAY: Float = 1e-3;
// Cosines at or below this value count as "below the horizon".
pub const EPS_COSINE: Float = 1e-6;
// Densities at or below this value are treated as degenerate samples.
pub const EPS_PDF: Float = 1e-12;
