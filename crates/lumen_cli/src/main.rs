use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use lumen_renderer::Renderer;

mod cli;
mod config;
mod output;

use cli::Args;
use config::JobConfig;

fn init_logger(level: LevelFilter) {
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    let job = match &args.scene {
        Some(path) => JobConfig::load(path)?,
        None => {
            info!("No scene given, rendering the demo scene");
            JobConfig::demo()
        }
    };

    let scene = job.scene.build().context("Invalid scene")?;
    let mut renderer = Renderer::new(Arc::new(scene), job.camera.to_camera(), job.render);

    info!(
        "Rendering {} frames at {}x{} ({} rays per pixel, {} bounces)",
        args.frames,
        args.width,
        args.height,
        renderer.params().rays_per_pixel,
        renderer.params().max_bounces
    );

    let start = Instant::now();
    for frame in 0..args.frames.max(1) {
        renderer.render_frame(args.width, args.height)?;
        if (frame + 1) % 16 == 0 {
            info!("Frame {}/{} ({:.2?})", frame + 1, args.frames, start.elapsed());
        }
    }
    info!(
        "Accumulated {} frames in {:.2?}",
        renderer.frame_count(),
        start.elapsed()
    );

    output::save_png(renderer.accumulated(), &args.output)
}
