//! Translates host events into flock state.
//!
//! The adapter is the only writer of the shared target and the viewport.
//! Hosts deliver events between frames, so a frame never observes a
//! half-applied update.

use crate::animation::LoopCommand;
use crate::flock::{Flock, Target, Viewport};
use crate::vector::Vector2D;

/// Host event, in drawing-surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Mouse move or first touch point
    PointerMove { x: f64, y: f64 },
    PointerLeave,
    Resize { width: f64, height: f64 },
    Visibility { visible: bool },
    ReducedMotion { enabled: bool },
}

#[derive(Debug, Clone, Default)]
pub struct InputAdapter {
    last_target_id: u64,
    clear_on_leave: bool,
}

impl InputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the target when the pointer leaves the surface
    pub fn clear_on_leave(mut self, enabled: bool) -> Self {
        self.clear_on_leave = enabled;
        self
    }

    /// Id handed to the most recent pointer sample, 0 before the first
    pub fn last_target_id(&self) -> u64 {
        self.last_target_id
    }

    /// Apply `event` to `flock`. Visibility changes come back as a command
    /// for the animation loop.
    pub fn handle(&mut self, event: InputEvent, flock: &mut Flock) -> Option<LoopCommand> {
        match event {
            InputEvent::PointerMove { x, y } => {
                self.pointer_moved(flock, x, y);
                None
            }
            InputEvent::PointerLeave => {
                if self.clear_on_leave {
                    flock.set_target(None);
                }
                None
            }
            InputEvent::Resize { width, height } => {
                self.resized(flock, width, height);
                None
            }
            InputEvent::Visibility { visible } => Some(if visible {
                LoopCommand::Resume
            } else {
                LoopCommand::Pause
            }),
            InputEvent::ReducedMotion { enabled } => {
                if flock.reduced_motion() != enabled {
                    log::debug!("Reduced motion set to {}", enabled);
                }
                flock.set_reduced_motion(enabled);
                None
            }
        }
    }

    /// Publish a new target. Returns its id, or `None` when the sample was
    /// dropped (reduced motion, or a non-finite coordinate).
    pub fn pointer_moved(&mut self, flock: &mut Flock, x: f64, y: f64) -> Option<u64> {
        if flock.reduced_motion() || !x.is_finite() || !y.is_finite() {
            return None;
        }

        self.last_target_id += 1;
        flock.set_target(Some(Target {
            position: Vector2D::new(x, y),
            id: self.last_target_id,
        }));
        Some(self.last_target_id)
    }

    /// Update the viewport. Empty sizes are ignored; the first usable size
    /// spawns the school.
    pub fn resized(&mut self, flock: &mut Flock, width: f64, height: f64) -> bool {
        let applied = flock.set_viewport(Viewport::new(width, height));
        if applied {
            log::debug!("Viewport resized to {}x{}", width, height);
        }
        applied
    }
}
