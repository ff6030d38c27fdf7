use serde::{Deserialize, Serialize};

/// Represents a 2D position in drawing-surface coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Host-facing tunables for the fish background.
///
/// Every field has a default, so hosts may send a partial JSON object
/// such as `{"fishCount": 4}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FishSettings {
    pub fish_count: usize,
    pub max_speed: f64,
    pub perception_radius: f64,
    pub separation_strength: f64,
    pub seek_strength: f64,
    pub wander_strength: f64,
    /// Fixed seed for reproducible runs; entropy when absent
    pub seed: Option<u64>,
}

impl Default for FishSettings {
    fn default() -> Self {
        Self {
            fish_count: 7,
            max_speed: 2.5,
            perception_radius: 50.0,
            separation_strength: 0.1,
            seek_strength: 1.2,
            wander_strength: 0.5,
            seed: None,
        }
    }
}

impl FishSettings {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Status snapshot reported back to the host
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlockStatus {
    pub fish_count: usize,
    pub frames_stepped: u64,
    pub frames_skipped: u64,
    pub target_active: bool,
    pub target_id: u64,
    pub seeking: usize,
    pub running: bool,
    pub reduced_motion: bool,
}

/// One fish at the end of a frame, as written to traces
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FishSample {
    pub position: Position,
    pub speed: f64,
    pub heading: f64,
    pub seeking: bool,
}

/// One trace row: the flock after a single simulation step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameSample {
    pub frame: u64,
    pub delta_ms: f64,
    pub target: Option<Position>,
    pub fish: Vec<FishSample>,
}
