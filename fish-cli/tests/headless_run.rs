use fish_cli::{HeadlessRunner, PointerSample, RunOptions};
use fish_shared::FrameSample;
use tempfile::tempdir;

fn options(frames: u64) -> RunOptions {
    RunOptions {
        frames,
        width: 400.0,
        height: 300.0,
        seed: Some(42),
        ..RunOptions::default()
    }
}

#[test]
fn test_run_reports_status() {
    let mut runner = HeadlessRunner::new(options(120)).unwrap();
    let status = runner.run().unwrap();

    assert_eq!(status.fish_count, 7);
    assert_eq!(status.frames_stepped, 120);
    assert!(status.running);
    assert!(!status.target_active);
}

#[test]
fn test_pointer_samples_start_a_chase() {
    let mut opts = options(60);
    opts.pointers = vec![PointerSample {
        frame: 10,
        x: 200.0,
        y: 150.0,
    }];

    let mut runner = HeadlessRunner::new(opts).unwrap();
    let status = runner.run().unwrap();

    assert!(status.target_active);
    assert_eq!(status.target_id, 1);
}

#[test]
fn test_reduced_motion_ignores_pointer() {
    let mut opts = options(30);
    opts.reduced_motion = true;
    opts.pointers = vec![PointerSample {
        frame: 0,
        x: 10.0,
        y: 10.0,
    }];

    let mut runner = HeadlessRunner::new(opts).unwrap();
    let status = runner.run().unwrap();

    assert!(status.reduced_motion);
    assert!(!status.target_active);
    assert_eq!(status.fish_count, 3);
    assert_eq!(runner.flock().seeking_count(), 0);
}

#[test]
fn test_trace_has_one_line_per_frame() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("trace.jsonl");
    let mut opts = options(25);
    opts.trace = Some(path.clone());

    let mut runner = HeadlessRunner::new(opts).unwrap();
    runner.run().unwrap();

    let trace = std::fs::read_to_string(&path).unwrap();
    let samples: Vec<FrameSample> = trace
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(samples.len(), 25);
    assert_eq!(samples[0].fish.len(), 7);
    assert!(samples.iter().all(|s| s.delta_ms <= 64.0));
}

#[test]
fn test_settings_file_is_applied() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"fishCount": 4, "maxSpeed": 1.5}"#).unwrap();

    let mut opts = options(10);
    opts.settings = Some(path);
    let runner = HeadlessRunner::new(opts).unwrap();

    assert_eq!(runner.flock().fishes.len(), 4);
}

#[test]
fn test_empty_viewport_is_rejected() {
    let mut opts = options(10);
    opts.width = 0.0;
    assert!(HeadlessRunner::new(opts).is_err());
}

#[test]
fn test_oversized_school_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"fishCount": 20000}"#).unwrap();

    let mut opts = options(10);
    opts.settings = Some(path);
    assert!(HeadlessRunner::new(opts).is_err());
}

#[test]
fn test_non_finite_frame_spacing_is_rejected() {
    let mut opts = options(10);
    opts.frame_ms = f64::NAN;
    assert!(HeadlessRunner::new(opts).is_err());
}
