//! Steering simulation behind the animated fish background.
//!
//! A [`Flock`] owns the fish, the shared pointer [`Target`] and the
//! [`Viewport`]. Each frame every fish accumulates boundary, separation
//! and either seek or wander forces, integrates once, and is drawn onto a
//! [`DrawingSurface`]. [`AnimationLoop`] drives frames from a host
//! [`FrameScheduler`]; [`InputAdapter`] feeds pointer, resize, visibility
//! and reduced-motion events in between frames.

pub mod animation;
pub mod behavior;
pub mod config;
pub mod fish;
pub mod flock;
pub mod input;
pub mod surface;
pub mod vector;

pub use animation::{AnimationLoop, FrameClock, FrameHandle, FrameOutcome, FrameScheduler, LoopCommand, LoopState};
pub use config::{ConfigError, FlockConfig, DEFAULT_PALETTE, MAX_FISH};
pub use fish::{Fish, SeekState};
pub use flock::{Flock, Target, Viewport};
pub use input::{InputAdapter, InputEvent};
pub use surface::{DrawOp, DrawingSurface, RecordingSurface, SurfaceLost};
pub use vector::Vector2D;
