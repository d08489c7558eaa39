//! Blackboard keys shared between the perception and heading actions.

use okon_core::{BbKey, Detection};

/// Latest non-empty detection list, written by `TryDetectNTimes`.
pub const DETECTION: BbKey<Vec<Detection>> = BbKey::new("detection");

/// Heading correction in degrees towards the first detection, written by `CalculateDeltaYaw`.
pub const DELTA_YAW: BbKey<f64> = BbKey::new("deltaYaw");
