use core::convert::Infallible;

use fish_shared::{FishSample, FlockStatus, FrameSample};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::behavior;
use crate::config::{ConfigError, FlockConfig};
use crate::fish::{Fish, SeekState};
use crate::surface::DrawingSurface;
use crate::vector::Vector2D;

/// Logical size of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True for zero, negative or non-finite sizes, which can show up
    /// while the host is still laying out.
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }
}

/// Pointer target shared by the whole school.
///
/// `id` grows with every pointer sample so each fish can tell a fresh
/// move from the one it already reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub position: Vector2D,
    pub id: u64,
}

/// The school of fish plus the shared state every fish reads each frame
pub struct Flock {
    pub fishes: Vec<Fish>,
    config: FlockConfig,
    viewport: Viewport,
    target: Option<Target>,
    reduced_motion: bool,
    rng: StdRng,
    frames_stepped: u64,
    frames_skipped: u64,
}

impl Flock {
    /// Create an empty flock. Fish are spawned on the first non-empty
    /// viewport.
    pub fn new(config: FlockConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            fishes: Vec::new(),
            config,
            viewport: Viewport::default(),
            target: None,
            reduced_motion: false,
            rng,
            frames_stepped: 0,
            frames_skipped: 0,
        })
    }

    /// Create a flock already populated for a `width` x `height` surface
    pub fn with_viewport(config: FlockConfig, width: f64, height: f64) -> Result<Self, ConfigError> {
        let mut flock = Self::new(config)?;
        flock.set_viewport(Viewport::new(width, height));
        Ok(flock)
    }

    /// Validated configuration; fixed for the life of the flock
    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    pub fn frames_stepped(&self) -> u64 {
        self.frames_stepped
    }

    pub fn seeking_count(&self) -> usize {
        self.fishes
            .iter()
            .filter(|fish| fish.state() == SeekState::Seeking)
            .count()
    }

    /// Replace the school with freshly spawned fish.
    ///
    /// Does nothing while the viewport is empty.
    pub fn seed(&mut self) {
        if self.viewport.is_empty() {
            return;
        }

        let count = self.config.population(self.reduced_motion);
        let base_speed = self.config.base_speed(self.reduced_motion);
        let viewport = self.viewport;

        self.fishes.clear();
        for i in 0..count {
            let color = &self.config.palette[i % self.config.palette.len()];
            let fish = Fish::spawn(&mut self.rng, viewport, base_speed, &self.config, color);
            self.fishes.push(fish);
        }

        log::info!(
            "Seeded {} fish in {}x{} (reduced motion: {})",
            count,
            viewport.width,
            viewport.height,
            self.reduced_motion
        );
    }

    /// Advance every fish by one frame without drawing.
    ///
    /// Returns `false` when the frame was skipped because the viewport is
    /// empty.
    pub fn step(&mut self) -> bool {
        match self.run_frame(|_| Ok::<(), Infallible>(())) {
            Ok(stepped) => stepped,
            Err(never) => match never {},
        }
    }

    /// Clear `surface`, then advance and draw each fish in turn.
    pub fn frame<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> Result<bool, S::Error> {
        if self.viewport.is_empty() {
            self.frames_skipped += 1;
            return Ok(false);
        }

        surface.clear(self.viewport);
        self.run_frame(|fish| fish.draw(&mut *surface))
    }

    fn run_frame<E>(&mut self, mut after_update: impl FnMut(&Fish) -> Result<(), E>) -> Result<bool, E> {
        if self.viewport.is_empty() {
            self.frames_skipped += 1;
            return Ok(false);
        }

        // Every fish sees the same target for the whole frame
        let target = if self.reduced_motion { None } else { self.target };

        for i in 0..self.fishes.len() {
            self.steer(i, target.as_ref());
            self.fishes[i].update(self.config.wobble_step);
            after_update(&self.fishes[i])?;
        }

        self.frames_stepped += 1;
        Ok(true)
    }

    fn steer(&mut self, index: usize, target: Option<&Target>) {
        let boundary = behavior::boundaries(&self.fishes[index], self.viewport, self.config.boundary_margin);
        let neighbors = self
            .fishes
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != index)
            .map(|(_, other)| other);
        let separation = behavior::separate(
            &self.fishes[index],
            neighbors,
            self.config.perception_radius,
            self.config.separation_strength,
        );

        let fish = &mut self.fishes[index];
        fish.apply_force(boundary);
        fish.apply_force(separation);

        let force = match fish.observe_target(target, self.config.arrival_threshold) {
            Some(point) => behavior::seek(fish, point, self.config.seek_strength, 0.0),
            None => behavior::wander(fish, self.config.wander_strength, &self.config, &mut self.rng),
        };
        fish.apply_force(force);
    }

    /// Store a new viewport, spawning the school if it is still empty.
    ///
    /// Empty sizes are ignored and return `false`.
    pub(crate) fn set_viewport(&mut self, viewport: Viewport) -> bool {
        if viewport.is_empty() {
            return false;
        }

        self.viewport = viewport;
        if self.fishes.is_empty() {
            self.seed();
        }
        true
    }

    pub(crate) fn set_target(&mut self, target: Option<Target>) {
        self.target = target;
    }

    pub(crate) fn set_reduced_motion(&mut self, enabled: bool) {
        self.reduced_motion = enabled;
    }

    pub fn status(&self) -> FlockStatus {
        FlockStatus {
            fish_count: self.fishes.len(),
            frames_stepped: self.frames_stepped,
            frames_skipped: self.frames_skipped,
            target_active: self.target.is_some() && !self.reduced_motion,
            target_id: self.target.map(|t| t.id).unwrap_or(0),
            seeking: self.seeking_count(),
            running: false,
            reduced_motion: self.reduced_motion,
        }
    }

    /// Snapshot of the school for traces
    pub fn sample(&self, delta_ms: f64) -> FrameSample {
        FrameSample {
            frame: self.frames_stepped,
            delta_ms,
            target: self.target.map(|t| t.position.into()),
            fish: self
                .fishes
                .iter()
                .map(|fish| FishSample {
                    position: fish.position.into(),
                    speed: fish.velocity.magnitude(),
                    heading: fish.heading,
                    seeking: fish.state() == SeekState::Seeking,
                })
                .collect(),
        }
    }
}
