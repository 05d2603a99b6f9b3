//! Headless animation player: runs the zoom on worker threads and writes
//! the last frame shown as a PPM image.

use anyhow::{Context, Result};
use clap::Parser;
use mandelanim_core::AnimationConfig;
use mandelanim_player::{AnimationSession, FrameRecorder};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Parser)]
#[command(
    name = "mandelanim",
    about = "Render a Mandelbrot zoom animation on a pool of worker threads"
)]
struct Args {
    /// JSON animation config; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frames to show before stopping.
    #[arg(long, default_value_t = 200)]
    frames: u64,

    /// Number of compute workers.
    #[arg(long)]
    workers: Option<usize>,

    /// Upper bound on workers (0 = hardware concurrency).
    #[arg(long)]
    max_workers: Option<usize>,

    #[arg(long)]
    max_iterations: Option<u32>,

    /// Use the 4-lane kernel.
    #[arg(long)]
    vectorized: bool,

    /// Compute at half resolution.
    #[arg(long)]
    downscale: bool,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Resolution multiplier in percent.
    #[arg(long)]
    scale_percent: Option<u32>,

    /// Seconds to wait for a single frame before giving up.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Write the final frame here as PPM.
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Args {
    fn to_config(&self) -> Result<AnimationConfig> {
        let mut config = match &self.config {
            Some(path) => AnimationConfig::from_json_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => AnimationConfig::default(),
        };

        if let Some(workers) = self.workers {
            config.desired_worker_count = workers;
        }
        if let Some(max) = self.max_workers {
            config.max_workers = max;
        }
        if let Some(iterations) = self.max_iterations {
            config.render_options.max_iterations = iterations;
        }
        config.render_options.use_vectorized_kernel |= self.vectorized;
        config.render_options.downscale |= self.downscale;
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(scale) = self.scale_percent {
            config.scale_percent = scale;
        }

        config.validate().context("invalid animation settings")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.to_config()?;
    let timeout = Duration::from_secs(args.timeout_secs);

    let (width, height) = config.surface_size();
    log::info!(
        "Rendering {} frames at {}x{} with {} workers (max {})",
        args.frames,
        width,
        height,
        config.desired_worker_count,
        config.resolved_max_workers()
    );

    let mut session = AnimationSession::new(&config, FrameRecorder::new(width, height))
        .context("creating animation session")?;

    let started = Instant::now();
    let shown = session
        .run_frames(args.frames, timeout)
        .context("running animation")?;
    let elapsed = started.elapsed();
    let stats = session.fps_stats();

    let recorder = session.shutdown(timeout).context("stopping animation")?;
    log::info!(
        "Showed {} frames in {:.2}s, average {:.1} fps",
        shown,
        elapsed.as_secs_f64(),
        stats.average()
    );

    if let Some(path) = &args.output {
        let file =
            File::create(path).with_context(|| format!("creating {}", path.display()))?;
        recorder
            .write_ppm(BufWriter::new(file))
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Wrote last frame to {}", path.display());
    }

    Ok(())
}
