use core::ops::Range;

use fish_shared::FishSettings;
use thiserror::Error;

/// The seven bright colours cycled across the school
pub const DEFAULT_PALETTE: [&str; 7] = [
    "#FF6B6B", // red
    "#FF9F43", // orange
    "#FDCB6E", // yellow
    "#55EFC4", // teal
    "#00CEC9", // cyan
    "#0984E3", // blue
    "#FD79A8", // pink
];

/// Largest school a single frame will step. Steering is O(n²) and runs
/// on the host's frame callback.
pub const MAX_FISH: usize = 64;

/// Errors raised when validating a [`FlockConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a finite positive number, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("{name} range {start}..{end} is empty or inverted")]
    EmptyRange {
        name: &'static str,
        start: f64,
        end: f64,
    },
    #[error("fish_count must be at most {max}, got {count}")]
    TooManyFish { count: usize, max: usize },
    #[error("colour palette must contain at least one colour")]
    EmptyPalette,
}

/// Configuration for the fish simulation
#[derive(Debug, Clone, PartialEq)]
pub struct FlockConfig {
    pub fish_count: usize,
    /// Base speed; each fish gets `max_speed * speed_jitter` at spawn
    pub max_speed: f64,
    pub max_force: f64,
    pub perception_radius: f64,
    pub separation_strength: f64,
    pub seek_strength: f64,
    pub wander_strength: f64,
    /// Distance at which a seeking fish counts as having passed the target
    pub arrival_threshold: f64,
    pub boundary_margin: f64,
    pub wander_distance: f64,
    pub wander_radius: f64,
    /// Maximum per-frame change of the wander angle, applied as `±jitter`
    pub wander_jitter: f64,
    /// Fixed per-frame advance of the wander angle
    pub wobble_step: f64,
    pub speed_jitter: Range<f64>,
    pub size_range: Range<f64>,
    /// Ceiling on the frame delta handed to a step, in milliseconds
    pub max_delta_ms: f64,
    pub reduced_motion_speed_factor: f64,
    pub palette: Vec<String>,
    pub seed: Option<u64>,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            fish_count: 7,
            max_speed: 2.5,
            max_force: 0.1,
            perception_radius: 50.0,
            separation_strength: 0.1,
            seek_strength: 1.2,
            wander_strength: 0.5,
            arrival_threshold: 30.0,
            boundary_margin: 50.0,
            wander_distance: 80.0,
            wander_radius: 25.0,
            wander_jitter: 0.3,
            wobble_step: 0.05,
            speed_jitter: 0.8..1.2,
            size_range: 20.0..25.0,
            max_delta_ms: 64.0,
            reduced_motion_speed_factor: 0.2,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            seed: None,
        }
    }
}

impl FlockConfig {
    /// Overlay host-facing settings onto the defaults
    pub fn from_settings(settings: &FishSettings) -> Self {
        Self {
            fish_count: settings.fish_count,
            max_speed: settings.max_speed,
            perception_radius: settings.perception_radius,
            separation_strength: settings.separation_strength,
            seek_strength: settings.seek_strength,
            wander_strength: settings.wander_strength,
            seed: settings.seed,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of fish spawned for the current motion preference.
    pub fn population(&self, reduced_motion: bool) -> usize {
        if reduced_motion {
            (self.fish_count / 2).max(1).min(self.fish_count)
        } else {
            self.fish_count
        }
    }

    /// Base speed for the current motion preference.
    pub fn base_speed(&self, reduced_motion: bool) -> f64 {
        if reduced_motion {
            self.max_speed * self.reduced_motion_speed_factor
        } else {
            self.max_speed
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fish_count > MAX_FISH {
            return Err(ConfigError::TooManyFish {
                count: self.fish_count,
                max: MAX_FISH,
            });
        }

        positive("max_speed", self.max_speed)?;
        positive("max_force", self.max_force)?;
        positive("arrival_threshold", self.arrival_threshold)?;
        positive("max_delta_ms", self.max_delta_ms)?;
        positive("reduced_motion_speed_factor", self.reduced_motion_speed_factor)?;

        non_negative("perception_radius", self.perception_radius)?;
        non_negative("separation_strength", self.separation_strength)?;
        non_negative("seek_strength", self.seek_strength)?;
        non_negative("wander_strength", self.wander_strength)?;
        non_negative("boundary_margin", self.boundary_margin)?;
        non_negative("wander_distance", self.wander_distance)?;
        non_negative("wander_radius", self.wander_radius)?;
        non_negative("wander_jitter", self.wander_jitter)?;
        non_negative("wobble_step", self.wobble_step)?;

        range("speed_jitter", &self.speed_jitter)?;
        range("size_range", &self.size_range)?;

        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

fn range(name: &'static str, r: &Range<f64>) -> Result<(), ConfigError> {
    if r.start.is_finite() && r.end.is_finite() && r.start > 0.0 && r.start < r.end {
        Ok(())
    } else {
        Err(ConfigError::EmptyRange {
            name,
            start: r.start,
            end: r.end,
        })
    }
}
