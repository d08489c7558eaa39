use okon_bt::{Behaviour, BtError, TickScope, Update};
use okon_core::{VehicleMut, Velocity};
use tracing::warn;

/// Sends a stabilized velocity setpoint and succeeds as soon as it is delivered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetVelocity {
    velocity: Velocity,
}

impl SetVelocity {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            velocity: Velocity::new(x, y, z),
        }
    }

    /// Zero velocity on every axis.
    pub fn stop() -> Self {
        Self {
            velocity: Velocity::ZERO,
        }
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }
}

impl<V> Behaviour<V> for SetVelocity
where
    V: VehicleMut + 'static,
{
    fn update(&mut self, scope: &mut TickScope<'_, V>) -> Result<Update, BtError> {
        let Velocity { x, y, z } = self.velocity;
        match scope.vehicle.set_stable_velocity(self.velocity) {
            Ok(()) => Ok(Update::success(format!(
                "Speed set as: Vx = {x:.3} Vy = {y:.3} Vz = {z:.3}."
            ))),
            Err(err) => {
                warn!(x, y, z, error = %err, "velocity setpoint not delivered");
                Ok(Update::running(format!(
                    "Speed setpoint not delivered: {err}."
                )))
            }
        }
    }
}
