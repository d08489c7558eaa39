//! Mission configuration, loaded from a YAML file.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

/// Everything the driver needs to build and run a mission.
///
/// Every field has a default, so an empty file (or no file at all) is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    pub driver: DriverConfig,
    pub gate: GateConfig,
    pub finish: FinishConfig,
    pub sim: SimConfig,
}

/// Tick loop cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// The driver stops after this many ticks even without a halt request.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

fn default_tick_interval_ms() -> u64 {
    100
}
fn default_max_ticks() -> u64 {
    200
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            max_ticks: default_max_ticks(),
        }
    }
}

/// Approach branch of the gate mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Detector label of the gate.
    #[serde(default = "default_object")]
    pub object: String,

    #[serde(default = "default_attempts")]
    pub attempts: u32,

    /// Closer than this the approach ends and the vehicle coasts through.
    #[serde(default = "default_max_distance")]
    pub max_distance: f64,

    #[serde(default = "default_depth")]
    pub depth: f64,

    #[serde(default = "default_depth_tolerance")]
    pub depth_tolerance: f64,

    #[serde(default = "default_heading_tolerance")]
    pub heading_tolerance: f64,

    /// Forward (z) speed in m/s once aligned.
    #[serde(default = "default_forward_speed")]
    pub forward_speed: f64,

    /// Detections nearer than this produce no heading correction. `None` disables the guard.
    #[serde(default = "default_close_range")]
    pub close_range: Option<f64>,
}

fn default_object() -> String {
    "gate".to_string()
}
fn default_attempts() -> u32 {
    3
}
fn default_max_distance() -> f64 {
    1.5
}
fn default_depth() -> f64 {
    1.1
}
fn default_depth_tolerance() -> f64 {
    0.005
}
fn default_heading_tolerance() -> f64 {
    2.0
}
fn default_forward_speed() -> f64 {
    1.0
}
fn default_close_range() -> Option<f64> {
    Some(1.0)
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            object: default_object(),
            attempts: default_attempts(),
            max_distance: default_max_distance(),
            depth: default_depth(),
            depth_tolerance: default_depth_tolerance(),
            heading_tolerance: default_heading_tolerance(),
            forward_speed: default_forward_speed(),
            close_range: default_close_range(),
        }
    }
}

/// Fallback branch: coast, stop, settle, exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishConfig {
    #[serde(default = "default_coast_secs")]
    pub coast_secs: f64,

    #[serde(default = "default_settle_secs")]
    pub settle_secs: f64,
}

fn default_coast_secs() -> f64 {
    2.0
}
fn default_settle_secs() -> f64 {
    0.1
}

impl Default for FinishConfig {
    fn default() -> Self {
        Self {
            coast_secs: default_coast_secs(),
            settle_secs: default_settle_secs(),
        }
    }
}

/// Simulated vehicle and pool. Positions are `(east, north)` in meters, headings are compass
/// degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub initial_depth: f64,

    #[serde(default)]
    pub initial_heading: f64,

    #[serde(default = "default_gate_position")]
    pub gate_position: [f64; 2],

    /// Physical gate width, sets the bounding box size.
    #[serde(default = "default_gate_width")]
    pub gate_width: f64,

    /// Gates farther than this are not detected.
    #[serde(default = "default_visibility")]
    pub visibility: f64,

    /// m/s
    #[serde(default = "default_depth_rate")]
    pub depth_rate: f64,

    /// deg/s
    #[serde(default = "default_yaw_rate")]
    pub yaw_rate: f64,

    #[serde(default = "default_hfov")]
    pub hfov_deg: f64,
}

fn default_gate_position() -> [f64; 2] {
    [0.8, 6.0]
}
fn default_gate_width() -> f64 {
    1.5
}
fn default_visibility() -> f64 {
    10.0
}
fn default_depth_rate() -> f64 {
    0.3
}
fn default_yaw_rate() -> f64 {
    30.0
}
fn default_hfov() -> f64 {
    okon_actions::CAMERA_HFOV_DEG
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            initial_depth: 0.0,
            initial_heading: 0.0,
            gate_position: default_gate_position(),
            gate_width: default_gate_width(),
            visibility: default_visibility(),
            depth_rate: default_depth_rate(),
            yaw_rate: default_yaw_rate(),
            hfov_deg: default_hfov(),
        }
    }
}

impl MissionConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: MissionConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.driver.tick_interval_ms > 0,
            "driver.tick_interval_ms must be positive"
        );
        ensure!(self.gate.attempts > 0, "gate.attempts must be at least 1");
        ensure!(
            self.gate.depth_tolerance > 0.0 && self.gate.heading_tolerance > 0.0,
            "gate tolerances must be positive"
        );
        ensure!(
            self.sim.hfov_deg > 0.0 && self.sim.hfov_deg < 180.0,
            "sim.hfov_deg must be within (0, 180)"
        );
        Ok(())
    }
}
