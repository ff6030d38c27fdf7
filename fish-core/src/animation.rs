//! Frame-driven animation loop.
//!
//! The host owns the real frame primitive (`requestAnimationFrame` in a
//! browser, a plain loop in the CLI). It hands each callback to
//! [`AnimationLoop::on_frame`], which runs exactly one simulation step and
//! asks the scheduler for the next frame. Nothing is queued: a late
//! callback still runs one step, with its delta capped by [`FrameClock`].

use fish_shared::FlockStatus;

use crate::flock::Flock;
use crate::surface::DrawingSurface;

/// Opaque id of a pending frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

/// Host primitive that calls back once per display refresh
pub trait FrameScheduler {
    /// Ask for one more callback. `None` means the host can no longer
    /// deliver frames.
    fn request_frame(&mut self) -> Option<FrameHandle>;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Turns frame timestamps into capped deltas
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<f64>,
    max_delta_ms: f64,
}

impl FrameClock {
    pub fn new(max_delta_ms: f64) -> Self {
        Self {
            last: None,
            max_delta_ms,
        }
    }

    /// Delta since the previous tick in milliseconds, clamped to
    /// `0..=max_delta_ms`. The first tick after a reset yields 0, and so
    /// does a non-finite timestamp, which also leaves the baseline alone.
    pub fn tick(&mut self, now: f64) -> f64 {
        if !now.is_finite() {
            return 0.0;
        }
        let delta = match self.last {
            Some(last) => (now - last).clamp(0.0, self.max_delta_ms),
            None => 0.0,
        };
        self.last = Some(now);
        delta
    }

    /// Forget the baseline so the next tick does not see the time spent
    /// paused.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running(FrameHandle),
    Paused,
    /// Terminal: torn down or the host lost its surface or scheduler
    Stopped,
}

/// Lifecycle requests produced by the input adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopCommand {
    Pause,
    Resume,
    Stop,
}

/// What a single frame callback did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Stale callback after pause or teardown; nothing ran
    Ignored,
    /// Viewport was empty; nothing stepped but the loop keeps going
    Skipped,
    Stepped { delta_ms: f64 },
    /// The loop ended during this callback
    Stopped,
}

#[derive(Debug, Clone)]
pub struct AnimationLoop {
    state: LoopState,
    clock: FrameClock,
}

impl AnimationLoop {
    pub fn new(max_delta_ms: f64) -> Self {
        Self {
            state: LoopState::Idle,
            clock: FrameClock::new(max_delta_ms),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running(_))
    }

    pub fn start<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) {
        if self.state == LoopState::Idle {
            self.clock.reset();
            self.schedule(scheduler);
        }
    }

    /// Run one step for the frame at `time` (milliseconds, monotonic).
    pub fn on_frame<S, F>(
        &mut self,
        time: f64,
        flock: &mut Flock,
        surface: &mut S,
        scheduler: &mut F,
    ) -> FrameOutcome
    where
        S: DrawingSurface + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        if !self.is_running() {
            return FrameOutcome::Ignored;
        }

        let delta_ms = self.clock.tick(time);

        let stepped = match flock.frame(surface) {
            Ok(stepped) => stepped,
            Err(err) => {
                log::warn!("Drawing surface lost, stopping animation: {:?}", err);
                self.state = LoopState::Stopped;
                return FrameOutcome::Stopped;
            }
        };

        if !self.schedule(scheduler) {
            return FrameOutcome::Stopped;
        }

        if stepped {
            FrameOutcome::Stepped { delta_ms }
        } else {
            FrameOutcome::Skipped
        }
    }

    pub fn pause<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) {
        if let LoopState::Running(handle) = self.state {
            scheduler.cancel_frame(handle);
            self.state = LoopState::Paused;
            log::debug!("Animation paused");
        }
    }

    pub fn resume<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) {
        if self.state == LoopState::Paused {
            self.clock.reset();
            if self.schedule(scheduler) {
                log::debug!("Animation resumed");
            }
        }
    }

    pub fn stop<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) {
        if let LoopState::Running(handle) = self.state {
            scheduler.cancel_frame(handle);
        }
        if self.state != LoopState::Stopped {
            self.state = LoopState::Stopped;
            log::debug!("Animation stopped");
        }
    }

    pub fn apply<F: FrameScheduler + ?Sized>(&mut self, command: LoopCommand, scheduler: &mut F) {
        match command {
            LoopCommand::Pause => self.pause(scheduler),
            LoopCommand::Resume => self.resume(scheduler),
            LoopCommand::Stop => self.stop(scheduler),
        }
    }

    pub fn status(&self, flock: &Flock) -> FlockStatus {
        FlockStatus {
            running: self.is_running(),
            ..flock.status()
        }
    }

    fn schedule<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) -> bool {
        match scheduler.request_frame() {
            Some(handle) => {
                self.state = LoopState::Running(handle);
                true
            }
            None => {
                log::warn!("Frame scheduler unavailable, stopping animation");
                self.state = LoopState::Stopped;
                false
            }
        }
    }
}
