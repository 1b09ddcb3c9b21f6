use lightpath::core::integrator::IntegratorKind;
use lightpath::core::path::DEFAULT_MAX_PATH_LENGTH;
use lightpath::core::rng::LcgRng;
use lightpath::core::scene_loader::load_scene_with_settings;
use lightpath::math::bitmap::Bitmap;
use lightpath::math::constants::Float;
use lightpath::scenes::cornell::{cornell_box, CornellOptions};
use std::env;

// Renders many tasks of a single pixel and prints the average. A light tracing
// task splats wherever its path lands, and a full iteration runs one task per
// pixel, so its film value is scaled by the pixel count.
fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <scene.xml|cornell> <x> <y> [--spp N] [--max-length N] [--seed N] [--integrator K]", args[0]);
        std::process::exit(1);
    }

    let scene_path = &args[1];
    let x: usize = args[2].parse().unwrap_or(0);
    let y: usize = args[3].parse().unwrap_or(0);

    let mut spp: usize = 64;
    let mut max_length: Option<usize> = None;
    let mut seed: u64 = 0;
    let mut kind: Option<IntegratorKind> = None;

    let mut i = 4;
    while i < args.len() {
        match args[i].as_str() {
            "--spp" => {
                i += 1;
                spp = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(spp);
            }
            "--max-length" => {
                i += 1;
                max_length = args.get(i).and_then(|v| v.parse::<usize>().ok());
            }
            "--seed" => {
                i += 1;
                seed = args.get(i).and_then(|v| v.parse::<u64>().ok()).unwrap_or(seed);
            }
            "--integrator" => {
                i += 1;
                kind = args.get(i).and_then(|v| v.parse::<IntegratorKind>().ok());
            }
            _ => {}
        }
        i += 1;
    }

    let (scene, file_kind, file_max_length) = if scene_path == "cornell" {
        (cornell_box(&CornellOptions::default()), None, None)
    } else {
        match load_scene_with_settings(scene_path) {
            Ok(result) => (result.scene, result.integrator, result.max_path_length),
            Err(e) => {
                eprintln!("Failed to load scene {}: {}", scene_path, e);
                std::process::exit(2);
            }
        }
    };

    let (width, height) = scene.sensor().resolution();
    if x >= width || y >= height {
        eprintln!("Pixel out of bounds: ({}, {}) for size {}x{}", x, y, width, height);
        std::process::exit(2);
    }

    let kind = kind.or(file_kind).unwrap_or(IntegratorKind::Mis);
    let max_length = max_length.or(file_max_length).unwrap_or(DEFAULT_MAX_PATH_LENGTH);
    let integrator = kind.build(max_length);

    let mut film = Bitmap::new(width, height);
    let task = (x + width * y) as u64;
    for iteration in 0..spp {
        let mut rng = LcgRng::for_task(seed, iteration as u64, task);
        integrator.render_pixel(&scene, (x, y), &mut rng, &mut film);
    }

    let tasks_per_iteration = match kind {
        IntegratorKind::Light => (width * height) as Float,
        _ => 1.0,
    };
    let avg = film[(x, y)] * tasks_per_iteration / (spp as Float);
    println!(
        "pixel ({}, {}) spp={} length={} integrator={} -> R {:.6}, G {:.6}, B {:.6}",
        x, y, spp, max_length, kind, avg.x, avg.y, avg.z
    );
}
