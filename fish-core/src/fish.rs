use core::f64::consts::TAU;

use rand::Rng;

use crate::config::FlockConfig;
use crate::flock::{Target, Viewport};
use crate::surface::DrawingSurface;
use crate::vector::Vector2D;

/// Whether a fish is chasing the pointer or drifting on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekState {
    Wandering,
    Seeking,
}

/// A single fish
#[derive(Debug, Clone)]
pub struct Fish {
    pub position: Vector2D,
    pub velocity: Vector2D,
    /// Forces applied this frame; cleared by [`Fish::update`]
    pub acceleration: Vector2D,
    pub max_speed: f64,
    pub max_force: f64,
    /// Running wander angle
    pub wobble_phase: f64,
    /// Visual scale only
    pub size: f64,
    /// Cached `velocity.heading()` for rendering
    pub heading: f64,
    pub color: String,
    pub last_target_id: u64,
    pub arrived: bool,
}

impl Fish {
    pub fn new(position: Vector2D, velocity: Vector2D, max_speed: f64, max_force: f64) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vector2D::zero(),
            max_speed,
            max_force,
            wobble_phase: 0.0,
            size: 20.0,
            heading: velocity.heading(),
            color: String::from("#FFFFFF"),
            last_target_id: 0,
            arrived: true,
        }
    }

    /// Spawn a fish at a uniformly random point inside `viewport`.
    ///
    /// Speed, size, starting velocity and wander angle are jittered so the
    /// school never moves in lockstep.
    pub fn spawn<R: Rng + ?Sized>(
        rng: &mut R,
        viewport: Viewport,
        base_speed: f64,
        config: &FlockConfig,
        color: &str,
    ) -> Self {
        let position = Vector2D::new(
            rng.gen::<f64>() * viewport.width,
            rng.gen::<f64>() * viewport.height,
        );
        let velocity = Vector2D::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
        let max_speed = base_speed * rng.gen_range(config.speed_jitter.clone());

        let mut fish = Self::new(position, velocity, max_speed, config.max_force);
        fish.wobble_phase = rng.gen_range(0.0..TAU);
        fish.size = rng.gen_range(config.size_range.clone());
        fish.color = color.to_string();
        fish
    }

    pub fn apply_force(&mut self, force: Vector2D) {
        self.acceleration += force;
    }

    pub fn state(&self) -> SeekState {
        if self.arrived {
            SeekState::Wandering
        } else {
            SeekState::Seeking
        }
    }

    /// Run the seek/arrive state machine against the shared target.
    ///
    /// Returns the point to seek this frame, or `None` when the fish should
    /// wander. A target id the fish has not seen yet re-arms seeking; once
    /// within `arrival_threshold` the fish counts as having passed through
    /// and ignores that id from then on.
    pub fn observe_target(&mut self, target: Option<&Target>, arrival_threshold: f64) -> Option<Vector2D> {
        let Some(target) = target else {
            // Nothing to chase; a later sample arrives with a fresh id
            self.arrived = true;
            return None;
        };

        if self.last_target_id != target.id {
            self.arrived = false;
            self.last_target_id = target.id;
        }

        if self.arrived {
            return None;
        }

        if self.position.distance(&target.position) < arrival_threshold {
            self.arrived = true;
            None
        } else {
            Some(target.position)
        }
    }

    /// Semi-implicit Euler step with a fixed per-frame displacement.
    pub fn update(&mut self, wobble_step: f64) {
        self.velocity += self.acceleration;
        self.velocity = self.velocity.limit(self.max_speed);
        self.position += self.velocity;
        self.acceleration = Vector2D::zero();

        self.wobble_phase += wobble_step;
        self.heading = self.velocity.heading();
    }

    pub fn draw<S: DrawingSurface + ?Sized>(&self, surface: &mut S) -> Result<(), S::Error> {
        surface.save();
        let result = self.draw_body(surface);
        surface.restore();
        result
    }

    fn draw_body<S: DrawingSurface + ?Sized>(&self, surface: &mut S) -> Result<(), S::Error> {
        surface.translate(self.position.x, self.position.y)?;
        surface.rotate(self.heading)?;

        surface.set_fill_color(&self.color);
        surface.set_stroke_color(&self.color);
        surface.set_line_width(2.0);

        let s = self.size * 0.6;

        // Tail filament
        surface.begin_path();
        surface.move_to(-s * 2.8, 0.0);
        surface.line_to(-s * 6.0, 0.0);
        surface.stroke();

        // Body
        surface.begin_path();
        surface.ellipse(0.0, 0.0, s * 3.2, s * 1.0)?;
        surface.fill();

        // Pectoral fins, then the smaller pelvic fins, mirrored across the spine
        for side in [1.0, -1.0] {
            surface.begin_path();
            surface.move_to(s * 1.2, side * s * 0.5);
            surface.quadratic_curve_to(s * 0.5, side * s * 2.8, -s * 0.8, side * s * 0.8);
            surface.fill();
        }
        for side in [1.0, -1.0] {
            surface.begin_path();
            surface.move_to(-s * 1.0, side * s * 0.5);
            surface.quadratic_curve_to(-s * 1.5, side * s * 1.5, -s * 2.2, side * s * 0.4);
            surface.fill();
        }

        Ok(())
    }
}
