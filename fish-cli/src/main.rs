use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fish_cli::{HeadlessRunner, PointerSample, RunOptions};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run the fish school without a display", long_about = None)]
struct Args {
    /// Number of animation frames to run
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    #[arg(long, default_value_t = 800.0)]
    width: f64,

    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Simulated milliseconds between frames
    #[arg(long, default_value_t = 1000.0 / 60.0)]
    frame_ms: f64,

    /// Seed for a reproducible school
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON settings file, e.g. {"fishCount": 5, "maxSpeed": 2}
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Run with the reduced-motion preference enabled
    #[arg(long)]
    reduced_motion: bool,

    /// Pointer sample as FRAME:X,Y (repeatable)
    #[arg(short, long = "pointer")]
    pointers: Vec<PointerSample>,

    /// Write one JSON frame sample per line to this file
    #[arg(short, long)]
    trace: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl From<Args> for RunOptions {
    fn from(args: Args) -> Self {
        Self {
            frames: args.frames,
            width: args.width,
            height: args.height,
            frame_ms: args.frame_ms,
            seed: args.seed,
            settings: args.settings,
            reduced_motion: args.reduced_motion,
            pointers: args.pointers,
            trace: args.trace,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("Fish runner starting...");
    if let Some(seed) = args.seed {
        log::info!("Seed: {}", seed);
    }

    let mut runner = HeadlessRunner::new(args.into()).context("Failed to initialize runner")?;
    let status = runner.run().context("Run failed")?;

    println!(
        "{}",
        serde_json::to_string_pretty(&status).context("Failed to encode status")?
    );

    Ok(())
}
