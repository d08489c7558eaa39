//! Drives a single action's hooks directly, outside a tree.

use okon_bt::{HaltRequest, TickScope};
use okon_core::{
    Blackboard, Detection, Orientation, TickContext, VehicleError, VehicleMut, VehicleView,
    Velocity,
};
use okon_tools::NullTraceSink;

/// Holds whatever the test sets; setpoints are accepted and ignored.
#[derive(Debug, Default)]
pub(crate) struct Fixed {
    pub depth: f64,
    pub yaw: f64,
    pub seen: Vec<Detection>,
}

impl VehicleView for Fixed {
    fn depth(&self) -> f64 {
        self.depth
    }

    fn orientation(&self) -> Orientation {
        Orientation {
            yaw: self.yaw,
            ..Orientation::default()
        }
    }

    fn detections(&self, _object: &str) -> Vec<Detection> {
        self.seen.clone()
    }
}

impl VehicleMut for Fixed {
    fn set_depth(&mut self, _depth: f64) -> Result<(), VehicleError> {
        Ok(())
    }

    fn set_stable_orientation(&mut self, _yaw: f64) -> Result<(), VehicleError> {
        Ok(())
    }

    fn set_stable_velocity(&mut self, _velocity: Velocity) -> Result<(), VehicleError> {
        Ok(())
    }
}

pub(crate) struct Bench {
    pub vehicle: Fixed,
    pub blackboard: Blackboard,
    trace: NullTraceSink,
    halt: Option<HaltRequest>,
    ctx: TickContext,
}

impl Bench {
    pub fn new(vehicle: Fixed) -> Self {
        Self {
            vehicle,
            blackboard: Blackboard::new(),
            trace: NullTraceSink,
            halt: None,
            ctx: TickContext::new(0, 0.1),
        }
    }

    /// Runs `f` with a scope for the current tick, then advances the tick by 0.1 s.
    pub fn with_scope<R>(&mut self, f: impl FnOnce(&mut TickScope<'_, Fixed>) -> R) -> R {
        let ctx = self.ctx;
        let mut scope = TickScope::new(
            &ctx,
            &mut self.vehicle,
            &mut self.blackboard,
            &mut self.trace,
            &mut self.halt,
        );
        let out = f(&mut scope);
        self.ctx = ctx.next(0.1);
        out
    }
}
