// Copyright @yucwang 2021

use crate::core::integrator::Integrator;
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::math::bitmap::Bitmap;
use crate::math::constants::Float;
use crate::math::spectrum::Spectrum;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

pub use super::renderer::Renderer;

const BLOCK_ROWS: usize = 8;

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub iterations: usize,
    pub seed: u64,
    /// Worker count, 0 means one per available core.
    pub threads: usize,
    pub time_budget: Option<Duration>,
    pub show_progress: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            iterations: 16,
            seed: 1234,
            threads: 0,
            time_budget: None,
            show_progress: true,
        }
    }
}

/// Iteration driver: every iteration runs one task per pixel on a pool of
/// scoped workers, each worker splatting into its own film.
pub struct SimpleRenderer {
    integrator: Box<dyn Integrator>,
    settings: RenderSettings,
    cancel: Arc<AtomicBool>,
}

impl Renderer for SimpleRenderer {
    fn render(&self, scene: &Scene) -> Bitmap {
        let (width, height) = scene.sensor().resolution();
        let mut accumulation = Bitmap::new(width, height);
        if width == 0 || height == 0 {
            return accumulation;
        }
        if scene.light_count() == 0 {
            log::warn!("Scene has no lights, the image will be black.");
        }

        let thread_count = self.thread_count();
        log::info!("Rendering {}x{} with the {} integrator, {} iterations on {} threads.",
                   width, height, self.integrator.name(), self.settings.iterations, thread_count);

        let progress = if self.settings.show_progress {
            ProgressBar::new(self.settings.iterations as u64)
        } else {
            ProgressBar::hidden()
        };
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} iterations")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let start = Instant::now();
        let mut completed = 0usize;
        for iteration in 0..self.settings.iterations {
            if self.cancel.load(Ordering::Relaxed) {
                log::info!("Rendering cancelled after {} iterations.", completed);
                break;
            }
            if let Some(budget) = self.settings.time_budget {
                if start.elapsed() >= budget {
                    log::info!("Time budget reached after {} iterations.", completed);
                    break;
                }
            }

            let iteration_start = Instant::now();
            let film = self.render_iteration(scene, iteration, thread_count);
            accumulation.merge(&film);
            completed += 1;
            log::debug!("Iteration {} took {:.3}s.", iteration, iteration_start.elapsed().as_secs_f32());
            progress.inc(1);
        }
        progress.finish_and_clear();
        log::info!("Finished {} iterations in {:.2}s.", completed, start.elapsed().as_secs_f32());

        if completed == 0 {
            return accumulation;
        }
        let image = accumulation.scaled(1.0 / completed as Float);
        log::info!("Mean image luminance {:.5}.", image.sum().luminance() / (width * height) as Float);
        image
    }
}

impl SimpleRenderer {
    pub fn new(integrator: Box<dyn Integrator>, settings: RenderSettings) -> Self {
        Self {
            integrator,
            settings,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Setting the flag stops rendering before the next iteration.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    fn thread_count(&self) -> usize {
        match self.settings.threads {
            0 => thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
            n => n,
        }
    }

    fn render_iteration(&self, scene: &Scene, iteration: usize, thread_count: usize) -> Bitmap {
        let (width, height) = scene.sensor().resolution();
        let total_blocks = (height + BLOCK_ROWS - 1) / BLOCK_ROWS;
        let next_block = AtomicUsize::new(0);
        let integrator: &dyn Integrator = self.integrator.as_ref();
        let seed = self.settings.seed;

        let films: Vec<Bitmap> = thread::scope(|scope| {
            let handles: Vec<_> = (0..thread_count.min(total_blocks).max(1))
                .map(|_| {
                    let next_block = &next_block;
                    scope.spawn(move || {
                        let mut film = Bitmap::new(width, height);
                        loop {
                            let block_index = next_block.fetch_add(1, Ordering::Relaxed);
                            if block_index >= total_blocks {
                                break;
                            }

                            let y0 = block_index * BLOCK_ROWS;
                            let y1 = (y0 + BLOCK_ROWS).min(height);
                            for y in y0..y1 {
                                for x in 0..width {
                                    let task = (x + width * y) as u64;
                                    let mut rng = LcgRng::for_task(seed, iteration as u64, task);
                                    integrator.render_pixel(scene, (x, y), &mut rng, &mut film);
                                }
                            }
                        }
                        film
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(film) => film,
                    Err(payload) => std::panic::resume_unwind(payload),
                })
                .collect()
        });

        let mut iteration_film = Bitmap::new(width, height);
        for film in &films {
            iteration_film.merge(film);
        }
        iteration_film
    }
}
