// Copyright @yucwang 2026

use std::fmt;
use std::str::FromStr;

use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::integrators::direct::DirectLightingIntegrator;
use crate::integrators::light::LightTracingIntegrator;
use crate::integrators::mis::MisIntegrator;
use crate::integrators::path::PathIntegrator;
use crate::math::bitmap::Bitmap;

/// One estimator. `render_pixel` runs a single sample task for the pixel
/// at `(x, y)` and splats whatever it produces into `film`; the light
/// tracer may write to other cells than its own.
pub trait Integrator: Sync {
    fn name(&self) -> &'static str;

    fn render_pixel(&self, scene: &Scene, pixel: (usize, usize), rng: &mut LcgRng, film: &mut Bitmap);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegratorKind {
    Direct,
    Path,
    Mis,
    Light,
}

impl IntegratorKind {
    pub fn build(self, max_path_length: usize) -> Box<dyn Integrator> {
        match self {
            IntegratorKind::Direct => Box::new(DirectLightingIntegrator::new(max_path_length)),
            IntegratorKind::Path => Box::new(PathIntegrator::new(max_path_length)),
            IntegratorKind::Mis => Box::new(MisIntegrator::new(max_path_length)),
            IntegratorKind::Light => Box::new(LightTracingIntegrator::new(max_path_length)),
        }
    }
}

impl FromStr for IntegratorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" | "nee" => Ok(IntegratorKind::Direct),
            "path" | "bsdf" => Ok(IntegratorKind::Path),
            "mis" => Ok(IntegratorKind::Mis),
            "light" | "lt" => Ok(IntegratorKind::Light),
            other => Err(format!("unknown integrator '{}'", other)),
        }
    }
}

impl fmt::Display for IntegratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntegratorKind::Direct => "direct",
            IntegratorKind::Path => "path",
            IntegratorKind::Mis => "mis",
            IntegratorKind::Light => "light",
        };
        write!(f, "{}", name)
    }
}
