// Copyright @yucwang 2026

use crate::math::constants::{ Float, Vector2f, Vector3f };
use crate::math::ray::Ray3f;

/// Raster coordinates are in pixels, `[0, width) x [0, height)`, with the
/// origin at the top left.
pub trait Sensor: Send + Sync {
    fn sample_ray(&self, raster: &Vector2f) -> Ray3f;

    /// Projects a world point onto the film, `None` when it lies behind the
    /// camera or outside the image.
    fn world_to_raster(&self, p: &Vector3f) -> Option<Vector2f>;

    fn position(&self) -> Vector3f;

    fn forward(&self) -> Vector3f;

    fn resolution(&self) -> (usize, usize);

    /// Area of the image plane at unit distance from the pinhole.
    fn image_plane_area(&self) -> Float;

    fn describe(&self) -> String {
        String::from("Sensor")
    }
}
