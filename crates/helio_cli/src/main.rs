//! Headless driver for the helio tracer.
//!
//! Builds one of the demo scenes, optionally walks the camera forward for
//! a number of simulated frames, renders once, and reports timing and
//! image statistics through the log. Display and persistence belong to
//! other front ends; this binary only exercises the core.

mod scenes;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::time::Instant;

use helio_renderer::{Camera, MotionKey, Perspective, Tracer, Vec3};

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Parser)]
#[command(name = "helio")]
#[command(about = "Whitted ray tracer demo scenes")]
struct Args {
    /// Square output resolution in pixels
    #[arg(long, default_value = "512")]
    resolution: u32,

    /// Demo scene index
    #[arg(short, long, default_value = "0")]
    scene: usize,

    /// Supersampling factor (antialias^2 rays per pixel)
    #[arg(short, long, default_value = "1")]
    antialias: u32,

    /// Sub-ray jitter fraction in [0, 1]
    #[arg(long, default_value = "0.0")]
    jitter: f32,

    /// Mirror bounce count
    #[arg(short, long, default_value = "1")]
    reflections: u32,

    /// Simulated frames of forward camera motion before rendering
    #[arg(long, default_value = "0")]
    frames: u32,

    /// Render rows in parallel
    #[arg(long)]
    parallel: bool,

    /// Light indices to disable, comma separated
    #[arg(long, value_delimiter = ',')]
    disable_light: Vec<usize>,

    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    debug_level: LogLevel,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_default_env()
        .filter_level(args.debug_level.into())
        .init();

    if args.scene >= scenes::SCENE_COUNT {
        bail!(
            "scene index {} out of range (0..{})",
            args.scene,
            scenes::SCENE_COUNT
        );
    }

    let mut scene = scenes::build(args.scene);
    for &index in &args.disable_light {
        match scene.lights.get_mut(index) {
            Some(light) => light.enabled = false,
            None => log::warn!("no light {index} to disable"),
        }
    }

    let mut camera = Camera::new(
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::Z,
        Vec3::Y,
        Perspective::new(35.0, 1.0, 1.0, 100.0),
    );

    if args.frames > 0 {
        camera.press(MotionKey::Forward);
        for _ in 0..args.frames {
            camera.solve(1.0);
        }
        camera.release(MotionKey::Forward);
        log::info!(
            "camera advanced {} frames to {}",
            args.frames,
            camera.position
        );
    }

    let mut tracer = Tracer::new(args.resolution, args.resolution);
    tracer.config.antialias = args.antialias;
    tracer.config.jitter = args.jitter;
    tracer.config.reflections = args.reflections;

    log::info!(
        "tracing scene {} at {}x{}, antialias {}, jitter {}, {} reflections",
        args.scene,
        args.resolution,
        args.resolution,
        args.antialias,
        args.jitter,
        args.reflections
    );

    let start = Instant::now();
    if args.parallel {
        tracer.trace_parallel(&camera, &scene);
    } else {
        tracer.trace(&camera, &scene);
    }
    let elapsed = start.elapsed();

    let bytes = tracer.img.data();
    let mean = bytes.iter().map(|&b| b as u64).sum::<u64>() as f64 / bytes.len() as f64;
    let lit = bytes.chunks(3).filter(|px| px.iter().any(|&b| b > 0)).count();

    log::info!("rendered in {elapsed:?}");
    log::info!(
        "mean channel value {mean:.2}, {lit} of {} pixels lit",
        bytes.len() / 3
    );

    Ok(())
}
