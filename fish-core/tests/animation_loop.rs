use fish_core::{
    AnimationLoop, Flock, FlockConfig, FrameHandle, FrameOutcome, FrameScheduler, InputAdapter,
    InputEvent, LoopState, RecordingSurface,
};

/// Scheduler that hands out sequential handles and remembers cancellations
#[derive(Default)]
struct FakeScheduler {
    next: i32,
    pending: Option<FrameHandle>,
    cancelled: Vec<FrameHandle>,
    lost: bool,
}

impl FrameScheduler for FakeScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        if self.lost {
            return None;
        }
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.pending = Some(handle);
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.cancelled.push(handle);
    }
}

fn flock() -> Flock {
    let config = FlockConfig {
        fish_count: 4,
        ..FlockConfig::default()
    }
    .with_seed(17);
    Flock::with_viewport(config, 400.0, 300.0).unwrap()
}

#[test]
fn runs_one_step_per_callback_and_reschedules() {
    let mut flock = flock();
    let mut surface = RecordingSurface::new();
    let mut scheduler = FakeScheduler::default();
    let mut animation = AnimationLoop::new(64.0);

    animation.start(&mut scheduler);
    assert_eq!(animation.state(), LoopState::Running(FrameHandle(1)));

    assert_eq!(
        animation.on_frame(1000.0, &mut flock, &mut surface, &mut scheduler),
        FrameOutcome::Stepped { delta_ms: 0.0 }
    );
    assert_eq!(
        animation.on_frame(1016.0, &mut flock, &mut surface, &mut scheduler),
        FrameOutcome::Stepped { delta_ms: 16.0 }
    );
    // A stall is capped, and still only one step runs
    assert_eq!(
        animation.on_frame(3000.0, &mut flock, &mut surface, &mut scheduler),
        FrameOutcome::Stepped { delta_ms: 64.0 }
    );

    assert_eq!(flock.frames_stepped(), 3);
    assert_eq!(surface.clears(), 3);
    assert_eq!(scheduler.pending, Some(FrameHandle(4)));
    assert!(animation.status(&flock).running);
}

#[test]
fn hidden_page_pauses_without_jumping() {
    let mut flock = flock();
    let mut surface = RecordingSurface::new();
    let mut scheduler = FakeScheduler::default();
    let mut input = InputAdapter::new();
    let mut animation = AnimationLoop::new(64.0);

    animation.start(&mut scheduler);
    animation.on_frame(0.0, &mut flock, &mut surface, &mut scheduler);
    animation.on_frame(16.0, &mut flock, &mut surface, &mut scheduler);

    let command = input
        .handle(InputEvent::Visibility { visible: false }, &mut flock)
        .unwrap();
    animation.apply(command, &mut scheduler);
    assert_eq!(animation.state(), LoopState::Paused);
    assert_eq!(scheduler.pending, None);
    assert_eq!(scheduler.cancelled, vec![FrameHandle(3)]);

    // A callback that slipped through the cancel does nothing
    let phases: Vec<_> = flock.fishes.iter().map(|f| f.wobble_phase).collect();
    assert_eq!(
        animation.on_frame(20.0, &mut flock, &mut surface, &mut scheduler),
        FrameOutcome::Ignored
    );
    assert_eq!(flock.frames_stepped(), 2);

    let command = input
        .handle(InputEvent::Visibility { visible: true }, &mut flock)
        .unwrap();
    animation.apply(command, &mut scheduler);
    assert!(animation.is_running());

    // Five minutes later: the baseline was reset, so delta is zero
    assert_eq!(
        animation.on_frame(300_016.0, &mut flock, &mut surface, &mut scheduler),
        FrameOutcome::Stepped { delta_ms: 0.0 }
    );
    for (fish, before) in flock.fishes.iter().zip(phases) {
        let advance = fish.wobble_phase - before;
        assert!(advance.abs() <= 0.05 + 0.3 + 1e-9);
    }
}

#[test]
fn teardown_cancels_and_is_terminal() {
    let mut flock = flock();
    let mut surface = RecordingSurface::new();
    let mut scheduler = FakeScheduler::default();
    let mut animation = AnimationLoop::new(64.0);

    animation.start(&mut scheduler);
    animation.on_frame(0.0, &mut flock, &mut surface, &mut scheduler);
    animation.stop(&mut scheduler);

    assert_eq!(animation.state(), LoopState::Stopped);
    assert_eq!(scheduler.pending, None);

    animation.resume(&mut scheduler);
    animation.start(&mut scheduler);
    assert_eq!(animation.state(), LoopState::Stopped);
    assert_eq!(
        animation.on_frame(16.0, &mut flock, &mut surface, &mut scheduler),
        FrameOutcome::Ignored
    );
}

#[test]
fn lost_surface_stops_the_loop() {
    let mut flock = flock();
    let mut surface = RecordingSurface::new();
    let mut scheduler = FakeScheduler::default();
    let mut animation = AnimationLoop::new(64.0);

    animation.start(&mut scheduler);
    surface.detach();

    assert_eq!(
        animation.on_frame(0.0, &mut flock, &mut surface, &mut scheduler),
        FrameOutcome::Stopped
    );
    assert_eq!(animation.state(), LoopState::Stopped);
    assert_eq!(scheduler.next, 1);
}

#[test]
fn lost_scheduler_stops_the_loop() {
    let mut flock = flock();
    let mut surface = RecordingSurface::new();
    let mut scheduler = FakeScheduler::default();
    let mut animation = AnimationLoop::new(64.0);

    animation.start(&mut scheduler);
    scheduler.lost = true;

    assert_eq!(
        animation.on_frame(0.0, &mut flock, &mut surface, &mut scheduler),
        FrameOutcome::Stopped
    );
    assert_eq!(animation.state(), LoopState::Stopped);
}

#[test]
fn empty_viewport_skips_frames_but_keeps_running() {
    let config = FlockConfig::default().with_seed(2);
    let mut flock = Flock::new(config).unwrap();
    let mut surface = RecordingSurface::new();
    let mut scheduler = FakeScheduler::default();
    let mut input = InputAdapter::new();
    let mut animation = AnimationLoop::new(64.0);

    animation.start(&mut scheduler);
    assert_eq!(
        animation.on_frame(0.0, &mut flock, &mut surface, &mut scheduler),
        FrameOutcome::Skipped
    );
    assert!(surface.ops().is_empty());
    assert!(animation.is_running());

    input.handle(
        InputEvent::Resize {
            width: 320.0,
            height: 240.0,
        },
        &mut flock,
    );
    assert!(matches!(
        animation.on_frame(16.0, &mut flock, &mut surface, &mut scheduler),
        FrameOutcome::Stepped { .. }
    ));
    assert_eq!(flock.fishes.len(), 7);
    assert_eq!(animation.status(&flock).frames_skipped, 1);
}
