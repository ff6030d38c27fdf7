//! Headless driver for the fish simulation.
//!
//! Runs the same flock, input adapter and animation loop the browser uses,
//! with a recording surface and a synthetic frame clock, so behaviour can
//! be inspected and traced without a display.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use fish_core::{
    AnimationLoop, Flock, FlockConfig, FrameHandle, FrameOutcome, FrameScheduler, InputAdapter,
    InputEvent, RecordingSurface,
};
use fish_shared::{FishSettings, FlockStatus};

/// Pointer sample injected before a given frame, written `FRAME:X,Y`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub frame: u64,
    pub x: f64,
    pub y: f64,
}

impl FromStr for PointerSample {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (frame, point) = s
            .split_once(':')
            .ok_or_else(|| format!("expected FRAME:X,Y, got '{}'", s))?;
        let (x, y) = point
            .split_once(',')
            .ok_or_else(|| format!("expected X,Y after ':', got '{}'", point))?;

        let frame = frame
            .trim()
            .parse()
            .map_err(|e| format!("bad frame '{}': {}", frame, e))?;
        let x = x.trim().parse().map_err(|e| format!("bad x '{}': {}", x, e))?;
        let y = y.trim().parse().map_err(|e| format!("bad y '{}': {}", y, e))?;

        Ok(Self { frame, x, y })
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub frames: u64,
    pub width: f64,
    pub height: f64,
    /// Simulated time between frames in milliseconds
    pub frame_ms: f64,
    pub seed: Option<u64>,
    pub settings: Option<PathBuf>,
    pub reduced_motion: bool,
    pub pointers: Vec<PointerSample>,
    pub trace: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            frames: 600,
            width: 800.0,
            height: 600.0,
            frame_ms: 1000.0 / 60.0,
            seed: None,
            settings: None,
            reduced_motion: false,
            pointers: Vec::new(),
            trace: None,
        }
    }
}

/// Scheduler that always has a next frame ready
#[derive(Debug, Default)]
struct TickScheduler {
    next: i32,
}

impl FrameScheduler for TickScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        self.next = self.next.wrapping_add(1);
        Some(FrameHandle(self.next))
    }

    fn cancel_frame(&mut self, _handle: FrameHandle) {}
}

pub struct HeadlessRunner {
    flock: Flock,
    animation: AnimationLoop,
    input: InputAdapter,
    surface: RecordingSurface,
    scheduler: TickScheduler,
    options: RunOptions,
    trace: Option<BufWriter<File>>,
}

impl HeadlessRunner {
    pub fn new(options: RunOptions) -> Result<Self> {
        if !options.frame_ms.is_finite() || options.frame_ms < 0.0 {
            anyhow::bail!(
                "Frame spacing must be a finite, non-negative number of milliseconds, got {}",
                options.frame_ms
            );
        }

        let mut settings = match &options.settings {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read settings from {}", path.display()))?;
                FishSettings::from_json(&json)
                    .with_context(|| format!("Invalid settings in {}", path.display()))?
            }
            None => FishSettings::default(),
        };
        if options.seed.is_some() {
            settings.seed = options.seed;
        }

        let config = FlockConfig::from_settings(&settings);
        let animation = AnimationLoop::new(config.max_delta_ms);
        let mut flock = Flock::new(config).context("Invalid flock configuration")?;

        let mut input = InputAdapter::new();
        input.handle(
            InputEvent::ReducedMotion {
                enabled: options.reduced_motion,
            },
            &mut flock,
        );
        if !input.resized(&mut flock, options.width, options.height) {
            anyhow::bail!(
                "Viewport {}x{} is empty; width and height must be positive",
                options.width,
                options.height
            );
        }

        let trace = match &options.trace {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create trace file {}", path.display()))?;
                Some(BufWriter::new(file))
            }
            None => None,
        };

        log::info!(
            "Headless run: {} fish, {} frames, {}x{}",
            flock.fishes.len(),
            options.frames,
            options.width,
            options.height
        );

        Ok(Self {
            flock,
            animation,
            input,
            surface: RecordingSurface::new(),
            scheduler: TickScheduler::default(),
            options,
            trace,
        })
    }

    pub fn flock(&self) -> &Flock {
        &self.flock
    }

    /// Run every frame and return the final status
    pub fn run(&mut self) -> Result<FlockStatus> {
        let mut pointers = self.options.pointers.clone();
        pointers.sort_by_key(|p| p.frame);
        let mut pointers = pointers.into_iter().peekable();

        self.animation.start(&mut self.scheduler);

        for frame in 0..self.options.frames {
            while let Some(sample) = pointers.next_if(|p| p.frame <= frame) {
                let id = self.input.pointer_moved(&mut self.flock, sample.x, sample.y);
                log::debug!("Frame {}: pointer at ({}, {}) -> {:?}", frame, sample.x, sample.y, id);
            }

            let time = frame as f64 * self.options.frame_ms;
            let outcome = self.animation.on_frame(
                time,
                &mut self.flock,
                &mut self.surface,
                &mut self.scheduler,
            );
            // Only the latest frame's commands are worth keeping
            self.surface.take_ops();

            match outcome {
                FrameOutcome::Stepped { delta_ms } => self.write_trace(delta_ms)?,
                FrameOutcome::Skipped => log::debug!("Frame {} skipped", frame),
                FrameOutcome::Ignored | FrameOutcome::Stopped => {
                    log::warn!("Animation ended early at frame {}", frame);
                    break;
                }
            }

            if frame > 0 && frame % 600 == 0 {
                log::info!(
                    "Frame {}: {} of {} fish seeking",
                    frame,
                    self.flock.seeking_count(),
                    self.flock.fishes.len()
                );
            }
        }

        if let Some(trace) = self.trace.as_mut() {
            trace.flush().context("Failed to flush trace")?;
        }

        Ok(self.animation.status(&self.flock))
    }

    fn write_trace(&mut self, delta_ms: f64) -> Result<()> {
        if let Some(trace) = self.trace.as_mut() {
            let sample = self.flock.sample(delta_ms);
            serde_json::to_writer(&mut *trace, &sample).context("Failed to write trace")?;
            trace.write_all(b"\n").context("Failed to write trace")?;
        }
        Ok(())
    }
}
