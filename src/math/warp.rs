// Copyright @yucwang 2023

use super::constants::{ Float, Vector2f, Vector3f, INV_FOUR_PI, INV_PI, INV_TWO_PI, PI };

pub fn sample_uniform_disk_concentric(u: &Vector2f) -> Vector2f {
    let r1: Float = 2.0 * u.x - 1.0;
    let r2: Float = 2.0 * u.y - 1.0;

    let phi: Float;
    let r:   Float;

    if r1 == 0. && r2 == 0. {
        r = 0.0;
        phi = 0.0;
    } else if r1 * r1 > r2 * r2 {
        r = r1;
        phi = (PI / 4.0) * (r2 / r1);
    } else {
        r = r2;
        phi = (PI / 2.0) - (r1 / r2) * (PI / 4.0);
    }

    let (sin_phi, cos_phi) = phi.sin_cos();

    Vector2f::new(r * cos_phi, r * sin_phi)
}

pub fn sample_cosine_hemisphere(u: &Vector2f) -> Vector3f {
    let p = sample_uniform_disk_concentric(u);
    let z = (1. - p.x * p.x - p.y * p.y).max(0.0).sqrt();

    Vector3f::new(p.x, p.y, z)
}

pub fn sample_cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta.max(0.0) * INV_PI
}

// Lobe proportional to cos^n about +z. Exponent 0 gives the uniform hemisphere,
// exponent 1 the cosine-weighted one.
pub fn sample_power_cos_hemisphere(u: &Vector2f, exponent: Float) -> Vector3f {
    let phi = 2.0 * PI * u.x;
    let cos_theta = (1.0 - u.y).powf(1.0 / (exponent + 1.0));
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let (sin_phi, cos_phi) = phi.sin_cos();

    Vector3f::new(cos_phi * sin_theta, sin_phi * sin_theta, cos_theta)
}

pub fn sample_power_cos_hemisphere_pdf(cos_theta: Float, exponent: Float) -> Float {
    if cos_theta <= 0.0 {
        return 0.0;
    }
    (exponent + 1.0) * cos_theta.powf(exponent) * INV_TWO_PI
}

pub fn sample_uniform_sphere(u: &Vector2f) -> Vector3f {
    let z = 1.0 - 2.0 * u.x;
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * u.y;
    let (sin_phi, cos_phi) = phi.sin_cos();

    Vector3f::new(r * cos_phi, r * sin_phi, z)
}

pub fn sample_uniform_sphere_pdf() -> Float {
    INV_FOUR_PI
}

/// Mirror reflection about the local normal (+z).
pub fn reflect_local(v: &Vector3f) -> Vector3f {
    Vector3f::new(-v.x, -v.y, v.z)
}

/// Solid angle density at a point to area density at a surface `dist` away
/// whose normal makes `cos_there` with the connecting segment.
pub fn pdf_w_to_a(pdf_w: Float, dist: Float, cos_there: Float) -> Float {
    pdf_w * cos_there.abs() / (dist * dist)
}
