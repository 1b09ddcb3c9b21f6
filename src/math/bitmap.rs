// Copyright 2020 @TwoCookingMice

use super::constants::{ Float, Vector2f, Vector3f };

use std::ops;
use std::vec::Vec;

/// Additive RGB film. Splats are plain sums, so merging per-worker films in
/// any order gives the same image.
#[derive(Debug, Clone)]
pub struct Bitmap {
    data: Vec<Vector3f>,
    height: usize,
    width: usize
}

impl ops::Index<(usize, usize)> for Bitmap {
    type Output = Vector3f;

    fn index(&self, index: (usize, usize)) -> &Vector3f {
        assert!(index.0 < self.width && index.1 < self.height);
        &self.data[index.0 + self.width * index.1]
    }
}

impl ops::IndexMut<(usize, usize)> for Bitmap {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Vector3f {
        assert!(index.0 < self.width && index.1 < self.height);
        &mut self.data[index.0 + self.width * index.1]
    }
}

impl Bitmap {
    pub fn new(width: usize, height: usize) -> Self {
        let pixel_number = width * height;
        Self { data: vec!(Vector3f::new(0.0, 0.0, 0.0); 
                          pixel_number),
               width: width,
               height: height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Adds `color` to the cell containing the raster position. Samples that
    /// fall outside the film are dropped.
    pub fn add_color(&mut self, raster: &Vector2f, color: &Vector3f) {
        if !(raster.x >= 0.0 && raster.y >= 0.0) {
            return;
        }
        let x = raster.x as usize;
        let y = raster.y as usize;
        if x >= self.width || y >= self.height {
            return;
        }
        self.data[x + self.width * y] += color;
    }

    pub fn merge(&mut self, other: &Bitmap) {
        assert_eq!((self.width, self.height), (other.width, other.height));
        for (dst, src) in self.data.iter_mut().zip(other.data.iter()) {
            *dst += src;
        }
    }

    pub fn scaled(&self, factor: Float) -> Bitmap {
        Bitmap {
            data: self.data.iter().map(|c| c * factor).collect(),
            width: self.width,
            height: self.height,
        }
    }

    pub fn sum(&self) -> Vector3f {
        self.data.iter().fold(Vector3f::zeros(), |acc, c| acc + c)
    }

    pub fn raw_copy(&self) -> Vec<(Float, Float, Float)> {
        self.data.iter().map(|c| (c.x, c.y, c.z)).collect()
    }
}

/* Test for Bitmap */
