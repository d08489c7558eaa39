//! Heading changes relative to the heading at entry.
//!
//! Both actions fix their target once, when entered, and hold it until the measured heading is
//! within `delta` degrees of it (measured the shorter way round).

use okon_bt::{Behaviour, BtError, TickScope, Update};
use okon_core::{
    normalize_heading, within_heading_tolerance, Access, Blackboard, BlackboardClient, VehicleMut,
};
use tracing::warn;

use crate::DELTA_YAW;

fn hold_heading<V: VehicleMut>(vehicle: &mut V, target: f64, delta: f64) -> Update {
    if let Err(err) = vehicle.set_stable_orientation(target) {
        warn!(heading = target, error = %err, "heading setpoint not delivered");
        return Update::running(format!(
            "Heading setpoint of {target:.3} degrees not delivered: {err}."
        ));
    }

    let yaw = vehicle.orientation().yaw;
    if within_heading_tolerance(yaw, target, delta) {
        Update::success(format!("Target rotation of {target:.3} degrees reached."))
    } else {
        Update::running(format!(
            "Current rotation is {yaw:.3} degrees. Waiting for target rotation of {target:.3} degrees."
        ))
    }
}

/// Turns by a fixed angle from the heading at entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Rotate {
    add_angle: f64,
    delta: f64,
    target: f64,
}

impl Rotate {
    pub fn new(add_angle: f64, delta: f64) -> Self {
        Self {
            add_angle,
            delta,
            target: 0.0,
        }
    }

    /// Changes the turn angle. Takes effect on the next entry; a turn in progress keeps its target.
    pub fn set_add_angle(&mut self, add_angle: f64) {
        self.add_angle = add_angle;
    }

    /// Target heading in `[0, 360)`, fixed on the last entry.
    pub fn target_angle(&self) -> f64 {
        self.target
    }
}

impl<V> Behaviour<V> for Rotate
where
    V: VehicleMut + 'static,
{
    fn initialise(&mut self, scope: &mut TickScope<'_, V>) -> Result<(), BtError> {
        let yaw = scope.vehicle.orientation().yaw;
        self.target = normalize_heading(yaw + self.add_angle);
        Ok(())
    }

    fn update(&mut self, scope: &mut TickScope<'_, V>) -> Result<Update, BtError> {
        Ok(hold_heading(&mut *scope.vehicle, self.target, self.delta))
    }
}

/// Turns by the correction found in `deltaYaw` when the node is entered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RotateDeltaYawAngle {
    delta: f64,
    target: f64,
    blackboard: BlackboardClient,
}

impl RotateDeltaYawAngle {
    pub fn new(delta: f64) -> Self {
        Self {
            delta,
            target: 0.0,
            blackboard: BlackboardClient::default(),
        }
    }

    pub fn target_angle(&self) -> f64 {
        self.target
    }
}

impl<V> Behaviour<V> for RotateDeltaYawAngle
where
    V: VehicleMut + 'static,
{
    fn setup(&mut self, node: &str, blackboard: &mut Blackboard) -> Result<(), BtError> {
        self.blackboard = BlackboardClient::new(node);
        self.blackboard.register(blackboard, DELTA_YAW, Access::Read)?;
        Ok(())
    }

    fn initialise(&mut self, scope: &mut TickScope<'_, V>) -> Result<(), BtError> {
        let delta_yaw = *self.blackboard.get(&*scope.blackboard, DELTA_YAW)?;
        self.target = normalize_heading(scope.vehicle.orientation().yaw + delta_yaw);
        Ok(())
    }

    fn update(&mut self, scope: &mut TickScope<'_, V>) -> Result<Update, BtError> {
        Ok(hold_heading(&mut *scope.vehicle, self.target, self.delta))
    }
}
