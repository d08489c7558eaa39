use crate::{Detection, Orientation, Velocity, VehicleError};

/// Latest-known sensor readings of the vehicle.
///
/// Reads return whatever snapshot the vehicle link last received; no freshness is surfaced.
/// Specific links (network client, simulator, test doubles) implement this trait.
pub trait VehicleView {
    /// Depth below the surface in meters.
    fn depth(&self) -> f64;

    fn orientation(&self) -> Orientation;

    /// Current detections of `object`, nearest first. Empty when nothing is seen.
    fn detections(&self, object: &str) -> Vec<Detection>;
}

/// Setpoint sink. Setpoints are held by the vehicle's own control loop.
pub trait VehicleMut: VehicleView {
    fn set_depth(&mut self, depth: f64) -> Result<(), VehicleError>;

    fn set_stable_orientation(&mut self, yaw: f64) -> Result<(), VehicleError>;

    fn set_stable_velocity(&mut self, velocity: Velocity) -> Result<(), VehicleError>;
}
