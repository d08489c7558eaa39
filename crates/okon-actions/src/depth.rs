use okon_bt::{Behaviour, BtError, TickScope, Update};
use okon_core::VehicleMut;
use tracing::warn;

/// Commands a depth and waits until the measured depth is inside `depth ± delta`.
#[derive(Debug, Clone, PartialEq)]
pub struct SetDepth {
    depth: f64,
    delta: f64,
}

impl SetDepth {
    pub fn new(depth: f64, delta: f64) -> Self {
        Self { depth, delta }
    }

    /// Changes the target depth. Takes effect on the next tick.
    pub fn set_depth(&mut self, depth: f64) {
        self.depth = depth;
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    fn reached(&self, measured: f64) -> bool {
        (measured - self.depth).abs() < self.delta
    }
}

impl<V> Behaviour<V> for SetDepth
where
    V: VehicleMut + 'static,
{
    fn update(&mut self, scope: &mut TickScope<'_, V>) -> Result<Update, BtError> {
        if let Err(err) = scope.vehicle.set_depth(self.depth) {
            warn!(depth = self.depth, error = %err, "depth setpoint not delivered");
            return Ok(Update::running(format!(
                "Depth setpoint of {} m not delivered: {err}.",
                self.depth
            )));
        }

        let measured = scope.vehicle.depth();
        if self.reached(measured) {
            Ok(Update::success(format!(
                "Target depth of {} m reached.",
                self.depth
            )))
        } else {
            Ok(Update::running(format!(
                "Current depth {measured:.3}. Waiting for target depth of {} m.",
                self.depth
            )))
        }
    }
}
