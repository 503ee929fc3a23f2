use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use glint_renderer::{render, Camera, HemisphereSampling, RenderConfig, SamplerKind};

mod progress;
mod scene_file;

use progress::ConsoleProgress;
use scene_file::SceneFile;

/// Upscale applied to the saved image when neither the scene nor the
/// command line sets one. The default 240x135 render becomes 3840x2160.
const DEFAULT_SCALE: u32 = 16;

/// Render a sphere scene with a CPU path tracer and save it as PNG.
#[derive(Parser, Debug)]
#[command(name = "glint", version, about)]
struct Args {
    /// JSON scene description; renders the built-in demo scene if omitted
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long, default_value = "output.png")]
    output: PathBuf,

    /// Image width in pixels (before upscaling)
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels (before upscaling)
    #[arg(long)]
    height: Option<u32>,

    /// Samples per pixel
    #[arg(short, long)]
    samples: Option<u32>,

    /// Maximum path depth
    #[arg(long)]
    max_depth: Option<u32>,

    /// Seed for all random streams
    #[arg(long)]
    seed: Option<u64>,

    /// Sampler for bounce directions: random or quasi-random
    #[arg(long)]
    sampler: Option<SamplerKind>,

    /// Bounce direction distribution: cosine or uniform
    #[arg(long)]
    hemisphere: Option<HemisphereSampling>,

    /// Worker threads (defaults to one per core)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Integer upscale factor for the saved image
    #[arg(long)]
    scale: Option<u32>,
}

impl Args {
    /// Override scene file settings with the flags that were given.
    fn apply(&self, config: &mut RenderConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(samples) = self.samples {
            config.samples_per_pixel = samples;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(sampler) = self.sampler {
            config.sampler = sampler;
        }
        if let Some(hemisphere) = self.hemisphere {
            config.hemisphere = hemisphere;
        }
        if let Some(threads) = self.threads {
            config.threads = Some(threads);
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut description = match &args.scene {
        Some(path) => SceneFile::load(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => SceneFile::demo(),
    };
    args.apply(&mut description.render);
    let scale = args.scale.or(description.scale).unwrap_or(DEFAULT_SCALE);

    let start = Instant::now();
    let scene = description.build_scene().context("Invalid scene")?;
    log::info!("Scene built with {} spheres in {:?}", scene.len(), start.elapsed());

    let config = description.render;
    let camera = Camera::for_image(config.width, config.height);

    let progress = ConsoleProgress::new().context("Failed to set up the progress bar")?;
    let image = render(&scene, &camera, &config, &progress).context("Render failed")?;

    image
        .save_png(&args.output, scale)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;

    Ok(())
}
