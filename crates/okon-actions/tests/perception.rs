mod support;

use okon_actions::{
    CalculateDeltaYaw, IsGateFarEnough, TryDetectNTimes, CAMERA_HFOV_DEG, DELTA_YAW, DETECTION,
};
use okon_bt::{BtError, BtStatus, Node};
use okon_core::BlackboardError;

use support::{gate, Harness, MockVehicle};

fn expected_delta_yaw(offset: f64) -> f64 {
    let plane = 1.0 / (CAMERA_HFOV_DEG / 2.0).to_radians().tan();
    (offset / plane).atan().to_degrees()
}

#[test]
fn try_detect_gives_up_on_the_last_attempt() {
    let mut h = Harness::new(
        Node::new("try_detect", TryDetectNTimes::new("gate", 3)),
        MockVehicle::default(),
    );

    assert_eq!(h.tick(), BtStatus::Running);
    assert_eq!(h.tick(), BtStatus::Running);
    assert_eq!(h.tick(), BtStatus::Failure);
    assert_eq!(h.feedback(), "Object gate undetected in attempt number 3");
    assert!(!h.tree.blackboard().contains(DETECTION));

    // entering again starts over from the first attempt
    assert_eq!(h.tick(), BtStatus::Running);
    assert_eq!(h.feedback(), "Object gate undetected in attempt number 1");
}

#[test]
fn try_detect_publishes_detections_when_found() {
    let mut h = Harness::new(
        Node::new("try_detect", TryDetectNTimes::new("gate", 3)),
        MockVehicle::default(),
    );

    assert_eq!(h.tick(), BtStatus::Running);

    let seen = vec![gate(3.0, 0.6, 0.9), gate(5.0, 0.1, 0.2)];
    h.vehicle.seen = seen.clone();
    assert_eq!(h.tick(), BtStatus::Success);
    assert_eq!(h.feedback(), "Object gate detected in attempt number 2");
    assert_eq!(h.tree.blackboard().get(DETECTION), Some(&seen));
}

#[test]
fn single_attempt_fails_immediately() {
    let mut h = Harness::new(
        Node::new("try_detect", TryDetectNTimes::new("gate", 1)),
        MockVehicle::default(),
    );

    assert_eq!(h.tick(), BtStatus::Failure);
}

#[test]
fn delta_yaw_is_computed_from_the_first_detection() {
    let mut h = Harness::new(
        Node::new("calculate_delta_yaw", CalculateDeltaYaw::new()),
        MockVehicle::default(),
    );
    // center at 0.75, offset 0.5 right of the image center
    h.tree
        .blackboard_mut()
        .set(DETECTION, vec![gate(3.0, 0.6, 0.9), gate(2.0, 0.0, 0.1)]);

    assert_eq!(h.tick(), BtStatus::Success);
    let first = *h.tree.blackboard().get(DELTA_YAW).expect("deltaYaw");
    assert!((first - expected_delta_yaw(0.5)).abs() < 1e-9, "{first}");
    assert!(h.feedback().starts_with("Delta Yaw was calculated"), "{}", h.feedback());

    assert_eq!(h.tick(), BtStatus::Success);
    assert_eq!(h.tree.blackboard().get(DELTA_YAW), Some(&first));
}

#[test]
fn delta_yaw_fails_on_empty_detection() {
    let mut h = Harness::new(
        Node::new("calculate_delta_yaw", CalculateDeltaYaw::new()),
        MockVehicle::default(),
    );
    h.tree.blackboard_mut().set(DETECTION, Vec::new());

    assert_eq!(h.tick(), BtStatus::Failure);
    assert_eq!(h.tick(), BtStatus::Failure);
    assert!(!h.tree.blackboard().contains(DELTA_YAW));
}

#[test]
fn delta_yaw_close_range_writes_zero() {
    let mut h = Harness::new(
        Node::new(
            "calculate_delta_yaw",
            CalculateDeltaYaw::new().with_close_range(1.0),
        ),
        MockVehicle::default(),
    );
    h.tree
        .blackboard_mut()
        .set(DETECTION, vec![gate(0.6, 0.8, 1.0)]);

    assert_eq!(h.tick(), BtStatus::Success);
    assert_eq!(h.tree.blackboard().get(DELTA_YAW), Some(&0.0));
}

#[test]
fn delta_yaw_needs_a_detection_entry() {
    let mut h = Harness::new(
        Node::new("calculate_delta_yaw", CalculateDeltaYaw::new()),
        MockVehicle::default(),
    );

    assert_eq!(
        h.try_tick(),
        Err(BtError::Blackboard(BlackboardError::KeyNotSet("detection")))
    );
}

#[test]
fn gate_distance_check_is_strict() {
    let mut h = Harness::new(
        Node::new("is_gate_far_enough", IsGateFarEnough::new(1.5)),
        MockVehicle::default(),
    );

    h.tree.blackboard_mut().set(DETECTION, vec![gate(2.0, 0.4, 0.6)]);
    assert_eq!(h.tick(), BtStatus::Success);
    assert_eq!(h.feedback(), "Gate is in distance of 2.000 m");

    h.tree.blackboard_mut().set(DETECTION, vec![gate(1.5, 0.4, 0.6)]);
    assert_eq!(h.tick(), BtStatus::Failure);
    assert_eq!(h.feedback(), "Gate is closer than max distance set to 1.500m.");
}
