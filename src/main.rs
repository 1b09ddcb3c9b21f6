// Copyright 2020 TwoCookingMice

use lightpath::core::integrator::IntegratorKind;
use lightpath::core::path::DEFAULT_MAX_PATH_LENGTH;
use lightpath::core::scene_loader::{ load_scene_with_settings, SceneLoadResult };
use lightpath::io::exr_utils;
use lightpath::renderers::renderer::Renderer;
use lightpath::renderers::simple::{ RenderSettings, SimpleRenderer };
use lightpath::scenes::cornell::{ cornell_box, CornellOptions, LightSetup };

use std::env;
use std::time::Duration;

const USAGE: &str = "<scene.xml|cornell> <output.exr> [--integrator direct|path|mis|light] \
[--iterations N] [--max-length N] [--seed N] [--threads N] [--time SECONDS] [--lights area|point|background|all]";

#[derive(Default)]
struct Overrides {
    integrator: Option<IntegratorKind>,
    iterations: Option<usize>,
    max_path_length: Option<usize>,
    seed: Option<u64>,
    threads: Option<usize>,
    time_budget: Option<Duration>,
    lights: Option<LightSetup>,
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T, String> {
    let raw = args.get(i).ok_or_else(|| format!("missing value for {}", flag))?;
    raw.parse::<T>().map_err(|_| format!("invalid value for {}: {}", flag, raw))
}

fn parse_overrides(args: &[String]) -> Result<Overrides, String> {
    let mut overrides = Overrides::default();
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        i += 1;
        match flag {
            "--integrator" => overrides.integrator = Some(parse_value(args, i, flag)?),
            "--iterations" => overrides.iterations = Some(parse_value(args, i, flag)?),
            "--max-length" => overrides.max_path_length = Some(parse_value(args, i, flag)?),
            "--seed" => overrides.seed = Some(parse_value(args, i, flag)?),
            "--threads" => overrides.threads = Some(parse_value(args, i, flag)?),
            "--time" => {
                let seconds: f64 = parse_value(args, i, flag)?;
                overrides.time_budget = Some(Duration::from_secs_f64(seconds.max(0.0)));
            }
            "--lights" => {
                let value: String = parse_value(args, i, flag)?;
                overrides.lights = Some(match value.as_str() {
                    "area" => LightSetup::CeilingArea,
                    "point" => LightSetup::Point,
                    "background" => LightSetup::Background,
                    "all" => LightSetup::All,
                    other => return Err(format!("unknown light setup: {}", other)),
                });
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
        i += 1;
    }
    Ok(overrides)
}

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} {}", args[0], USAGE);
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = &args[2];
    let overrides = match parse_overrides(&args[3..]) {
        Ok(overrides) => overrides,
        Err(msg) => {
            log::error!("{}", msg);
            eprintln!("Usage: {} {}", args[0], USAGE);
            std::process::exit(1);
        }
    };

    let load_result = if input_path == "cornell" {
        let options = CornellOptions {
            lights: overrides.lights.unwrap_or(LightSetup::CeilingArea),
            ..CornellOptions::default()
        };
        SceneLoadResult {
            scene: cornell_box(&options),
            integrator: None,
            iterations: None,
            max_path_length: None,
            seed: None,
        }
    } else {
        match load_scene_with_settings(input_path) {
            Ok(result) => result,
            Err(e) => {
                log::error!("Failed to load scene {}: {}", input_path, e);
                std::process::exit(2);
            }
        }
    };

    let kind = overrides.integrator.or(load_result.integrator).unwrap_or(IntegratorKind::Mis);
    let max_path_length = overrides.max_path_length
        .or(load_result.max_path_length)
        .unwrap_or(DEFAULT_MAX_PATH_LENGTH);
    let defaults = RenderSettings::default();
    let settings = RenderSettings {
        iterations: overrides.iterations.or(load_result.iterations).unwrap_or(defaults.iterations),
        seed: overrides.seed.or(load_result.seed).unwrap_or(defaults.seed),
        threads: overrides.threads.unwrap_or(defaults.threads),
        time_budget: overrides.time_budget,
        show_progress: true,
    };

    let renderer = SimpleRenderer::new(kind.build(max_path_length), settings);
    let image = renderer.render(&load_result.scene);
    if let Err(e) = exr_utils::write_exr_to_file(&image, output_path) {
        log::error!("Failed to write {}: {}", output_path, e);
        std::process::exit(3);
    }
}
