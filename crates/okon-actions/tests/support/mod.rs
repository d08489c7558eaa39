#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use okon_bt::{BehaviourTree, BtError, BtStatus, Node};
use okon_core::{
    BoundingBox, Detection, ImagePoint, Orientation, TickContext, VehicleError, VehicleMut,
    VehicleView, Velocity,
};
use okon_tools::{TraceEvent, TraceSink};

/// Vehicle double: sensors are whatever the test sets, setpoints are recorded but never applied.
#[derive(Debug, Default)]
pub struct MockVehicle {
    pub depth: f64,
    pub yaw: f64,
    pub seen: Vec<Detection>,
    pub fail_setpoints: bool,
    pub depth_setpoints: Vec<f64>,
    pub heading_setpoints: Vec<f64>,
    pub velocity_setpoints: Vec<Velocity>,
}

impl MockVehicle {
    pub fn at_heading(yaw: f64) -> Self {
        Self {
            yaw,
            ..Self::default()
        }
    }

    fn deliver(&self) -> Result<(), VehicleError> {
        if self.fail_setpoints {
            Err(VehicleError::Link("connection lost".into()))
        } else {
            Ok(())
        }
    }
}

impl VehicleView for MockVehicle {
    fn depth(&self) -> f64 {
        self.depth
    }

    fn orientation(&self) -> Orientation {
        Orientation {
            yaw: self.yaw,
            ..Orientation::default()
        }
    }

    fn detections(&self, object: &str) -> Vec<Detection> {
        assert_eq!(object, "gate", "actions should query the configured object");
        self.seen.clone()
    }
}

impl VehicleMut for MockVehicle {
    fn set_depth(&mut self, depth: f64) -> Result<(), VehicleError> {
        self.deliver()?;
        self.depth_setpoints.push(depth);
        Ok(())
    }

    fn set_stable_orientation(&mut self, yaw: f64) -> Result<(), VehicleError> {
        self.deliver()?;
        self.heading_setpoints.push(yaw);
        Ok(())
    }

    fn set_stable_velocity(&mut self, velocity: Velocity) -> Result<(), VehicleError> {
        self.deliver()?;
        self.velocity_setpoints.push(velocity);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct SharedTrace(pub Rc<RefCell<Vec<TraceEvent>>>);

impl SharedTrace {
    /// Nodes entered so far, in order.
    pub fn entered(&self) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter(|e| e.tag == "bt.node.initialise")
            .map(|e| e.node.clone())
            .collect()
    }
}

impl TraceSink for SharedTrace {
    fn emit(&mut self, event: TraceEvent) {
        self.0.borrow_mut().push(event);
    }
}

/// A set-up tree, its vehicle and a tick counter advancing by `dt` per tick.
pub struct Harness {
    pub tree: BehaviourTree<MockVehicle>,
    pub vehicle: MockVehicle,
    pub trace: SharedTrace,
    ctx: TickContext,
    dt: f32,
}

impl Harness {
    pub fn new(root: Node<MockVehicle>, vehicle: MockVehicle) -> Self {
        Self::with_dt(root, vehicle, 0.1)
    }

    pub fn with_dt(root: Node<MockVehicle>, vehicle: MockVehicle, dt: f32) -> Self {
        let trace = SharedTrace::default();
        let mut tree = BehaviourTree::new(root).with_trace_sink(trace.clone());
        tree.setup().expect("setup");
        Self {
            tree,
            vehicle,
            trace,
            ctx: TickContext::new(0, dt),
            dt,
        }
    }

    pub fn try_tick(&mut self) -> Result<BtStatus, BtError> {
        let ctx = self.ctx;
        self.ctx = ctx.next(self.dt);
        self.tree.tick(&ctx, &mut self.vehicle)
    }

    pub fn tick(&mut self) -> BtStatus {
        self.try_tick().expect("tick")
    }

    pub fn feedback(&self) -> &str {
        self.tree.root().feedback()
    }
}

/// A detection whose box spans `min_x..max_x` horizontally.
pub fn gate(distance: f64, min_x: f64, max_x: f64) -> Detection {
    Detection::new(
        distance,
        BoundingBox::new(ImagePoint::new(min_x, 0.2), ImagePoint::new(max_x, 0.8)),
    )
}
