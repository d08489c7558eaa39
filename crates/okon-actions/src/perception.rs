//! Gate detection and the decisions derived from it.

use okon_bt::{Behaviour, BtError, TickScope, Update};
use okon_core::{Access, Blackboard, BlackboardClient, Detection, VehicleMut};

use crate::{DELTA_YAW, DETECTION};

/// Horizontal field of view of the front camera.
pub const CAMERA_HFOV_DEG: f64 = 60.0;

/// Heading correction in degrees that centers `detection` horizontally in the image.
///
/// Positive when the object is right of the image center.
pub fn delta_yaw(detection: &Detection, hfov_deg: f64) -> f64 {
    let offset = detection.bbox.horizontal_offset();
    let camera_plane = 1.0 / (hfov_deg / 2.0).to_radians().tan();
    (offset / camera_plane).atan().to_degrees()
}

/// Polls the detector for `object`, giving up after `attempts` ticks without a detection.
///
/// A non-empty detection list is written to `detection` and ends the node with `Success`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TryDetectNTimes {
    object: String,
    attempts: u32,
    attempt: u32,
    blackboard: BlackboardClient,
}

impl TryDetectNTimes {
    pub fn new(object: impl Into<String>, attempts: u32) -> Self {
        Self {
            object: object.into(),
            attempts,
            attempt: 1,
            blackboard: BlackboardClient::default(),
        }
    }

    /// Attempt number the next tick will make.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }
}

impl<V> Behaviour<V> for TryDetectNTimes
where
    V: VehicleMut + 'static,
{
    fn setup(&mut self, node: &str, blackboard: &mut Blackboard) -> Result<(), BtError> {
        self.blackboard = BlackboardClient::new(node);
        self.blackboard.register(blackboard, DETECTION, Access::Write)?;
        Ok(())
    }

    fn initialise(&mut self, _scope: &mut TickScope<'_, V>) -> Result<(), BtError> {
        self.attempt = 1;
        Ok(())
    }

    fn update(&mut self, scope: &mut TickScope<'_, V>) -> Result<Update, BtError> {
        let detections = scope.vehicle.detections(&self.object);
        let attempt = self.attempt;
        self.attempt += 1;

        if !detections.is_empty() {
            self.blackboard.set(scope.blackboard, DETECTION, detections)?;
            return Ok(Update::success(format!(
                "Object {} detected in attempt number {attempt}",
                self.object
            )));
        }

        let feedback = format!(
            "Object {} undetected in attempt number {attempt}",
            self.object
        );
        if attempt >= self.attempts {
            Ok(Update::failure(feedback))
        } else {
            Ok(Update::running(feedback))
        }
    }
}

/// Converts the first entry of `detection` into a heading correction stored in `deltaYaw`.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculateDeltaYaw {
    hfov_deg: f64,
    close_range: Option<f64>,
    blackboard: BlackboardClient,
}

impl Default for CalculateDeltaYaw {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculateDeltaYaw {
    pub fn new() -> Self {
        Self {
            hfov_deg: CAMERA_HFOV_DEG,
            close_range: None,
            blackboard: BlackboardClient::default(),
        }
    }

    pub fn with_hfov(mut self, hfov_deg: f64) -> Self {
        self.hfov_deg = hfov_deg;
        self
    }

    /// Objects nearer than `meters` produce no correction: the bounding box is unreliable that
    /// close to the camera.
    pub fn with_close_range(mut self, meters: f64) -> Self {
        self.close_range = Some(meters);
        self
    }

    fn correction(&self, detection: &Detection) -> f64 {
        match self.close_range {
            Some(range) if detection.distance < range => 0.0,
            _ => delta_yaw(detection, self.hfov_deg),
        }
    }
}

impl<V> Behaviour<V> for CalculateDeltaYaw
where
    V: VehicleMut + 'static,
{
    fn setup(&mut self, node: &str, blackboard: &mut Blackboard) -> Result<(), BtError> {
        self.blackboard = BlackboardClient::new(node);
        self.blackboard.register(blackboard, DETECTION, Access::Read)?;
        self.blackboard.register(blackboard, DELTA_YAW, Access::Write)?;
        Ok(())
    }

    fn update(&mut self, scope: &mut TickScope<'_, V>) -> Result<Update, BtError> {
        let first = self
            .blackboard
            .get(&*scope.blackboard, DETECTION)?
            .first()
            .copied();
        let Some(first) = first else {
            return Ok(Update::failure(
                "There were no objects in the detection parameter in blackboard.",
            ));
        };

        let correction = self.correction(&first);
        self.blackboard.set(scope.blackboard, DELTA_YAW, correction)?;
        Ok(Update::success(format!(
            "Delta Yaw was calculated and is equal to {correction}"
        )))
    }
}

/// Succeeds while the first detected object is farther than `max_distance`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IsGateFarEnough {
    max_distance: f64,
    blackboard: BlackboardClient,
}

impl IsGateFarEnough {
    pub fn new(max_distance: f64) -> Self {
        Self {
            max_distance,
            blackboard: BlackboardClient::default(),
        }
    }
}

impl<V> Behaviour<V> for IsGateFarEnough
where
    V: VehicleMut + 'static,
{
    fn setup(&mut self, node: &str, blackboard: &mut Blackboard) -> Result<(), BtError> {
        self.blackboard = BlackboardClient::new(node);
        self.blackboard.register(blackboard, DETECTION, Access::Read)?;
        Ok(())
    }

    fn update(&mut self, scope: &mut TickScope<'_, V>) -> Result<Update, BtError> {
        let nearest = self
            .blackboard
            .get(&*scope.blackboard, DETECTION)?
            .first()
            .map(|d| d.distance);

        match nearest {
            Some(distance) if distance > self.max_distance => Ok(Update::success(format!(
                "Gate is in distance of {distance:.3} m"
            ))),
            Some(_) => Ok(Update::failure(format!(
                "Gate is closer than max distance set to {:.3}m.",
                self.max_distance
            ))),
            None => Ok(Update::failure("No detection to measure the gate distance.")),
        }
    }
}
