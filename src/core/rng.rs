// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f};

/// Per-task pseudo-random stream. Never shared between concurrent tasks.
#[derive(Debug, Clone)]
pub struct LcgRng {
    state: u64,
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

impl LcgRng {
    pub fn new(seed: u64) -> Self {
        Self { state: splitmix64(seed) }
    }

    /// Independent stream for one unit of work, deterministic in
    /// `(seed, iteration, task)`.
    pub fn for_task(seed: u64, iteration: u64, task: u64) -> Self {
        let mixed = splitmix64(seed ^ splitmix64(iteration ^ splitmix64(task)));
        Self { state: mixed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.state >> 32) as u32
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f32(&mut self) -> Float {
        (self.next_u32() >> 8) as Float * (1.0 / 16777216.0)
    }

    pub fn next_vec2(&mut self) -> Vector2f {
        let x = self.next_f32();
        let y = self.next_f32();
        Vector2f::new(x, y)
    }
}
