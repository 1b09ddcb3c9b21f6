// Copyright @yucwang 2021

use crate::core::scene::Scene;
use crate::math::bitmap::Bitmap;

pub trait Renderer {
    /// Renders the scene and returns the averaged image.
    fn render(&self, scene: &Scene) -> Bitmap;
}
