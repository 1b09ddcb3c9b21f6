// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};

/// Linear RGB radiance or reflectance triple.
pub type RGBSpectrum = Vector3f;

pub trait Spectrum {
    fn black() -> Self;
    fn gray(v: Float) -> Self;
    fn max_value(&self) -> Float;
    fn is_black(&self) -> bool;
    fn is_valid(&self) -> bool;
    fn luminance(&self) -> Float;
}

impl Spectrum for RGBSpectrum {
    fn black() -> Self {
        Vector3f::new(0.0, 0.0, 0.0)
    }

    fn gray(v: Float) -> Self {
        Vector3f::new(v, v, v)
    }

    fn max_value(&self) -> Float {
        self.x.max(self.y).max(self.z)
    }

    fn is_black(&self) -> bool {
        self.iter().all(|c| *c == 0.0)
    }

    // Finite and non-negative in every channel.
    fn is_valid(&self) -> bool {
        self.iter().all(|c| c.is_finite() && *c >= 0.0)
    }

    fn luminance(&self) -> Float {
        0.212671 * self.x + 0.715160 * self.y + 0.072169 * self.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spectrum_helpers() {
        let s = RGBSpectrum::new(0.2, 0.7, 0.1);
        assert_eq!(s.max_value(), 0.7);
        assert!(!s.is_black());
        assert!(RGBSpectrum::black().is_black());
        assert!(s.is_valid());
        assert!(!RGBSpectrum::new(-1.0, 0.0, 0.0).is_valid());
        assert!(!RGBSpectrum::new(std::f32::NAN, 0.0, 0.0).is_valid());
        assert!((RGBSpectrum::gray(1.0).luminance() - 1.0).abs() < 1e-5);
    }
}
