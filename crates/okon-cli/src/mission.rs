//! The trees the driver can run.

use okon_actions::{
    CalculateDeltaYaw, Exit, IsGateFarEnough, Rotate, RotateDeltaYawAngle, SetDepth, SetVelocity,
    TryDetectNTimes, Wait,
};
use okon_bt::{MemSelector, Node, Sequence};
use okon_core::VehicleMut;

use crate::config::{FinishConfig, GateConfig};

/// Gate qualification run: dive, align with the gate and drive at it while it is far enough
/// away, then coast through, stop and end the mission.
///
/// The root sticks with the finishing branch once it has been chosen.
pub fn gate_mission<V>(gate: &GateConfig, finish: &FinishConfig, hfov_deg: f64) -> Node<V>
where
    V: VehicleMut + 'static,
{
    let mut calculate = CalculateDeltaYaw::new().with_hfov(hfov_deg);
    if let Some(range) = gate.close_range {
        calculate = calculate.with_close_range(range);
    }

    let approach = Node::new(
        "Approach gate",
        Sequence::new(vec![
            Node::new(
                format!("Try detect {} {} times", gate.object, gate.attempts),
                TryDetectNTimes::new(gate.object.clone(), gate.attempts),
            ),
            Node::new(
                format!("Check if {} is further than {} m", gate.object, gate.max_distance),
                IsGateFarEnough::new(gate.max_distance),
            ),
            Node::new("Calculate delta yaw", calculate),
            Node::new(
                format!("Set depth to {} m", gate.depth),
                SetDepth::new(gate.depth, gate.depth_tolerance),
            ),
            Node::new(
                "Turn deltaYaw angle",
                RotateDeltaYawAngle::new(gate.heading_tolerance),
            ),
            Node::new(
                format!("Set stable velocity of {} m/s on Z axis", gate.forward_speed),
                SetVelocity::new(0.0, 0.0, gate.forward_speed),
            ),
        ]),
    );

    let pass_through = Node::new(
        "Pass through",
        Sequence::new(vec![
            Node::new(
                format!("Wait for {} seconds", finish.coast_secs),
                Wait::new(finish.coast_secs),
            ),
            Node::new("Stop Okon", SetVelocity::stop()),
            Node::new(
                format!("Wait for {} seconds", finish.settle_secs),
                Wait::new(finish.settle_secs),
            ),
            Node::new("Exit", Exit::new("gate passed")),
        ]),
    );

    Node::new("Gate mission", MemSelector::new(vec![approach, pass_through]))
}

/// Dive and turn exercise: 0.5 m, 45 degrees left, 0.8 m, back right, 0.2 m, exit.
pub fn depth_demo<V>() -> Node<V>
where
    V: VehicleMut + 'static,
{
    const DEPTH_TOLERANCE: f64 = 0.005;
    const HEADING_TOLERANCE: f64 = 1.0;

    Node::new(
        "Depth and rotation demo",
        Sequence::new(vec![
            Node::new("Set depth to 0.5 m", SetDepth::new(0.5, DEPTH_TOLERANCE)),
            Node::new("Rotate -45 degrees", Rotate::new(-45.0, HEADING_TOLERANCE)),
            Node::new("Set depth to 0.8 m", SetDepth::new(0.8, DEPTH_TOLERANCE)),
            Node::new("Rotate 45 degrees", Rotate::new(45.0, HEADING_TOLERANCE)),
            Node::new("Set depth to 0.2 m", SetDepth::new(0.2, DEPTH_TOLERANCE)),
            Node::new("Exit", Exit::new("demo finished")),
        ]),
    )
}
