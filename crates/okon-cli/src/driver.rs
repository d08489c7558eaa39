//! Ticks a mission tree against the simulated vehicle.
//!
//! The driver owns the cadence: the caller decides when to call [`Driver::step`] and with what
//! elapsed time, so the same loop runs under a wall-clock timer or as fast as a test likes.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use okon_bt::{BehaviourTree, BtStatus, HaltRequest, Node};
use okon_core::TickContext;
use okon_tools::{TraceEvent, TraceLog, TraceSink};
use tracing::{debug, info};

use crate::sim::SimVehicle;

/// Why the driver stopped ticking.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Halted(HaltRequest),
    TickLimit { ticks: u64, status: BtStatus },
    Interrupted { ticks: u64 },
}

pub struct Driver {
    tree: BehaviourTree<SimVehicle>,
    vehicle: SimVehicle,
    tick: u64,
    max_ticks: u64,
    last_status: Option<BtStatus>,
}

impl Driver {
    /// Builds and sets up the tree. Fails when a node's blackboard registration is rejected.
    pub fn new(
        root: Node<SimVehicle>,
        vehicle: SimVehicle,
        max_ticks: u64,
        trace: impl TraceSink + 'static,
    ) -> Result<Self> {
        let mut tree = BehaviourTree::new(root).with_trace_sink(trace);
        tree.setup().context("Failed to set up behaviour tree")?;
        Ok(Self {
            tree,
            vehicle,
            tick: 0,
            max_ticks,
            last_status: None,
        })
    }

    pub fn tree(&self) -> &BehaviourTree<SimVehicle> {
        &self.tree
    }

    pub fn vehicle(&self) -> &SimVehicle {
        &self.vehicle
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// Advances the vehicle by `dt_seconds`, then ticks the tree once.
    ///
    /// Returns the outcome once the tree asked to halt or the tick budget is used up.
    pub fn step(&mut self, dt_seconds: f32) -> Result<Option<Outcome>> {
        let ctx = TickContext::new(self.tick, dt_seconds);
        self.vehicle.step(f64::from(dt_seconds));

        debug!("--------- Tick {} ---------", ctx.tick);
        let status = self
            .tree
            .tick(&ctx, &mut self.vehicle)
            .with_context(|| format!("Tick {} failed", ctx.tick))?;
        self.tick += 1;

        debug!("\n{}", self.tree.ascii_tree());
        debug!("\n{}", self.tree.blackboard());
        if self.last_status != Some(status) {
            info!(
                tick = ctx.tick,
                status = %status,
                feedback = %self.tree.root().feedback(),
                "mission status"
            );
            self.last_status = Some(status);
        }

        if let Some(halt) = self.tree.halt_requested() {
            return Ok(Some(Outcome::Halted(halt.clone())));
        }
        if self.tick >= self.max_ticks {
            return Ok(Some(Outcome::TickLimit {
                ticks: self.tick,
                status,
            }));
        }
        Ok(None)
    }

    /// Interrupts whatever is still running, e.g. on Ctrl-C.
    pub fn interrupt(&mut self, dt_seconds: f32) -> Outcome {
        let ctx = TickContext::new(self.tick, dt_seconds);
        self.tree.interrupt(&ctx, &mut self.vehicle);
        Outcome::Interrupted { ticks: self.tick }
    }
}

/// Trace sink the driver can still read after handing it to the tree.
#[derive(Debug, Clone, Default)]
pub struct SharedLog(Rc<RefCell<TraceLog>>);

impl SharedLog {
    pub fn event_count(&self) -> usize {
        self.0.borrow().events.len()
    }

    pub fn snapshot(&self) -> TraceLog {
        self.0.borrow().clone()
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot())
            .context("Failed to serialize trace")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write trace: {}", path.display()))?;
        Ok(())
    }
}

impl TraceSink for SharedLog {
    fn emit(&mut self, event: TraceEvent) {
        self.0.borrow_mut().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MissionConfig;
    use crate::mission::{depth_demo, gate_mission};
    use okon_core::{heading_error, VehicleView, Velocity};

    const DT: f32 = 0.1;

    fn run(driver: &mut Driver) -> Outcome {
        loop {
            if let Some(outcome) = driver.step(DT).unwrap() {
                return outcome;
            }
        }
    }

    fn gate_driver(config: &MissionConfig, log: SharedLog) -> Driver {
        let root = gate_mission(&config.gate, &config.finish, config.sim.hfov_deg);
        Driver::new(
            root,
            SimVehicle::new(config.sim.clone()).with_gate_label(&config.gate.object),
            config.driver.max_ticks,
            log,
        )
        .unwrap()
    }

    #[test]
    fn gate_mission_passes_the_gate_and_halts() {
        let config = MissionConfig::default();
        let log = SharedLog::default();
        let mut driver = gate_driver(&config, log.clone());

        let halt = match run(&mut driver) {
            Outcome::Halted(halt) => halt,
            other => panic!("expected halt, got {other:?}"),
        };
        assert_eq!(halt.reason, "gate passed");
        assert!(driver.ticks() < config.driver.max_ticks);

        let vehicle = driver.vehicle();
        assert!((vehicle.depth() - config.gate.depth).abs() < config.gate.depth_tolerance);
        assert!(vehicle.position()[1] > config.sim.gate_position[1]);
        assert_eq!(vehicle.velocity(), Velocity::ZERO);

        let trace = log.snapshot();
        assert_eq!(trace.with_tag("bt.tree.halt").count(), 1);
        assert!(trace
            .with_tag("bt.node.initialise")
            .any(|e| e.node == "Pass through"));
    }

    #[test]
    fn relabelled_gate_is_still_found() {
        let mut config = MissionConfig::default();
        config.gate.object = "qualification_gate".to_string();
        let mut driver = gate_driver(&config, SharedLog::default());

        assert!(matches!(run(&mut driver), Outcome::Halted(_)));
        let vehicle = driver.vehicle();
        assert!((vehicle.depth() - config.gate.depth).abs() < config.gate.depth_tolerance);
        assert!(vehicle.position()[1] > config.sim.gate_position[1]);
    }

    #[test]
    fn missing_gate_falls_back_to_exit_without_diving() {
        let mut config = MissionConfig::default();
        config.sim.initial_heading = 180.0;
        let mut driver = gate_driver(&config, SharedLog::default());

        assert!(matches!(run(&mut driver), Outcome::Halted(_)));
        // three detection attempts, 2 s coast, stop and settle, exit
        assert!(driver.ticks() <= 25, "{}", driver.ticks());
        assert_eq!(driver.vehicle().depth(), 0.0);
    }

    #[test]
    fn tick_budget_stops_a_running_mission() {
        let mut config = MissionConfig::default();
        config.driver.max_ticks = 5;
        let mut driver = gate_driver(&config, SharedLog::default());

        assert_eq!(
            run(&mut driver),
            Outcome::TickLimit {
                ticks: 5,
                status: BtStatus::Running
            }
        );
    }

    #[test]
    fn interrupt_unwinds_running_nodes() {
        let config = MissionConfig::default();
        let log = SharedLog::default();
        let mut driver = gate_driver(&config, log.clone());
        assert_eq!(driver.step(DT).unwrap(), None);

        assert_eq!(driver.interrupt(DT), Outcome::Interrupted { ticks: 1 });
        assert_eq!(driver.tree().root().status(), None);
        assert!(log.snapshot().with_tag("bt.node.interrupt").count() >= 3);
    }

    #[test]
    fn demo_dives_turns_and_returns() {
        let mut driver = Driver::new(
            depth_demo(),
            SimVehicle::new(MissionConfig::default().sim),
            400,
            SharedLog::default(),
        )
        .unwrap();

        assert!(matches!(run(&mut driver), Outcome::Halted(_)));
        let vehicle = driver.vehicle();
        assert!((vehicle.depth() - 0.2).abs() < 0.005);
        assert!(heading_error(vehicle.orientation().yaw, 0.0).abs() < 1.0);
    }

    #[test]
    fn trace_is_written_as_json() {
        let mut log = SharedLog::default();
        log.emit(TraceEvent::new(3, "bt.tree.halt").with_detail("done"));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");

        log.write_json(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: TraceLog = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, log.snapshot());
        assert_eq!(log.event_count(), 1);
    }
}
