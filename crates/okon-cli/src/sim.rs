//! A kinematic stand-in for the vehicle link.
//!
//! Setpoints are held and tracked at fixed rates, the way the vehicle's own stabilisation loop
//! would. The pool holds a single gate; the camera sees it while it is in range and inside the
//! horizontal field of view.

use okon_core::{
    heading_error, normalize_heading, BoundingBox, Detection, ImagePoint, Orientation,
    VehicleError, VehicleMut, VehicleView, Velocity,
};

use crate::config::SimConfig;

const DEFAULT_GATE_LABEL: &str = "gate";

#[derive(Debug, Clone)]
pub struct SimVehicle {
    config: SimConfig,
    /// Detector label the gate is reported under.
    gate_label: String,
    /// `(east, north)` in meters.
    position: [f64; 2],
    depth: f64,
    yaw: f64,
    depth_setpoint: Option<f64>,
    heading_setpoint: Option<f64>,
    velocity: Velocity,
}

impl SimVehicle {
    pub fn new(config: SimConfig) -> Self {
        Self {
            gate_label: DEFAULT_GATE_LABEL.to_string(),
            position: [0.0, 0.0],
            depth: config.initial_depth,
            yaw: normalize_heading(config.initial_heading),
            depth_setpoint: None,
            heading_setpoint: None,
            velocity: Velocity::ZERO,
            config,
        }
    }

    pub fn with_gate_label(mut self, label: impl Into<String>) -> Self {
        self.gate_label = label.into();
        self
    }

    pub fn position(&self) -> [f64; 2] {
        self.position
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    /// Advances the vehicle by `dt` seconds towards its setpoints.
    pub fn step(&mut self, dt: f64) {
        if let Some(target) = self.depth_setpoint {
            let max_step = self.config.depth_rate * dt;
            let remaining = target - self.depth;
            self.depth = if remaining.abs() <= max_step {
                target
            } else {
                self.depth + max_step.copysign(remaining)
            };
        }

        if let Some(target) = self.heading_setpoint {
            let max_step = self.config.yaw_rate * dt;
            let remaining = heading_error(target, self.yaw);
            self.yaw = if remaining.abs() <= max_step {
                target
            } else {
                normalize_heading(self.yaw + max_step.copysign(remaining))
            };
        }

        let (sin, cos) = self.yaw.to_radians().sin_cos();
        let Velocity { x, z, .. } = self.velocity;
        self.position[0] += (z * sin + x * cos) * dt;
        self.position[1] += (z * cos - x * sin) * dt;
    }

    fn see_gate(&self) -> Option<Detection> {
        let [gate_east, gate_north] = self.config.gate_position;
        let east = gate_east - self.position[0];
        let north = gate_north - self.position[1];
        let distance = east.hypot(north);
        if distance <= f64::EPSILON || distance > self.config.visibility {
            return None;
        }

        let half_fov = self.config.hfov_deg / 2.0;
        let bearing = heading_error(east.atan2(north).to_degrees(), self.yaw);
        if bearing.abs() >= half_fov {
            return None;
        }

        // Project both gate posts onto the image plane; x in [0, 1] left to right.
        let half_width = (self.config.gate_width / 2.0 / distance).atan().to_degrees();
        let plane = half_fov.to_radians().tan();
        let image_x = |angle: f64| {
            let angle = angle.clamp(-half_fov, half_fov);
            (angle.to_radians().tan() / plane + 1.0) / 2.0
        };
        let half_height = (0.5 * self.config.gate_width / distance).min(0.5);

        Some(Detection::new(
            distance,
            BoundingBox::new(
                ImagePoint::new(image_x(bearing - half_width), 0.5 - half_height),
                ImagePoint::new(image_x(bearing + half_width), 0.5 + half_height),
            ),
        ))
    }
}

impl VehicleView for SimVehicle {
    fn depth(&self) -> f64 {
        self.depth
    }

    fn orientation(&self) -> Orientation {
        Orientation {
            roll: 0.0,
            pitch: 0.0,
            yaw: self.yaw,
        }
    }

    fn detections(&self, object: &str) -> Vec<Detection> {
        if object != self.gate_label {
            return Vec::new();
        }
        self.see_gate().into_iter().collect()
    }
}

impl VehicleMut for SimVehicle {
    fn set_depth(&mut self, depth: f64) -> Result<(), VehicleError> {
        if !depth.is_finite() || depth < 0.0 {
            return Err(VehicleError::Rejected(format!("depth {depth} out of range")));
        }
        self.depth_setpoint = Some(depth);
        Ok(())
    }

    fn set_stable_orientation(&mut self, yaw: f64) -> Result<(), VehicleError> {
        if !yaw.is_finite() {
            return Err(VehicleError::Rejected(format!("heading {yaw} is not finite")));
        }
        self.heading_setpoint = Some(normalize_heading(yaw.rem_euclid(360.0)));
        Ok(())
    }

    fn set_stable_velocity(&mut self, velocity: Velocity) -> Result<(), VehicleError> {
        self.velocity = velocity;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use okon_actions::delta_yaw;

    fn sim(configure: impl FnOnce(&mut SimConfig)) -> SimVehicle {
        let mut config = SimConfig::default();
        configure(&mut config);
        SimVehicle::new(config)
    }

    #[test]
    fn depth_moves_at_limited_rate_and_settles_exactly() {
        let mut vehicle = sim(|c| c.depth_rate = 0.5);
        vehicle.set_depth(1.0).unwrap();

        vehicle.step(1.0);
        assert!((vehicle.depth() - 0.5).abs() < 1e-12);
        vehicle.step(1.0);
        assert_eq!(vehicle.depth(), 1.0);
        vehicle.step(1.0);
        assert_eq!(vehicle.depth(), 1.0);
    }

    #[test]
    fn heading_turns_the_short_way_across_north() {
        let mut vehicle = sim(|c| {
            c.initial_heading = 350.0;
            c.yaw_rate = 30.0;
        });
        vehicle.set_stable_orientation(10.0).unwrap();

        vehicle.step(0.5);
        assert!((vehicle.orientation().yaw - 5.0).abs() < 1e-9);
        vehicle.step(0.5);
        assert_eq!(vehicle.orientation().yaw, 10.0);
    }

    #[test]
    fn forward_speed_follows_heading() {
        let mut vehicle = sim(|c| c.initial_heading = 90.0);
        vehicle.set_stable_velocity(Velocity::new(0.0, 0.0, 1.0)).unwrap();

        vehicle.step(2.0);
        let [east, north] = vehicle.position();
        assert!((east - 2.0).abs() < 1e-9);
        assert!(north.abs() < 1e-9);
    }

    #[test]
    fn gate_straight_ahead_is_centered() {
        let vehicle = sim(|c| c.gate_position = [0.0, 5.0]);

        let seen = vehicle.detections("gate");
        assert_eq!(seen.len(), 1);
        assert!((seen[0].distance - 5.0).abs() < 1e-9);
        assert!(delta_yaw(&seen[0], 60.0).abs() < 1e-9);
    }

    #[test]
    fn gate_to_starboard_needs_a_right_turn() {
        let vehicle = sim(|c| c.gate_position = [1.0, 5.0]);
        let bearing = 1.0_f64.atan2(5.0).to_degrees();

        let seen = vehicle.detections("gate");
        let correction = delta_yaw(&seen[0], 60.0);
        assert!(correction > 0.0);
        assert!((correction - bearing).abs() < 1.0, "{correction} vs {bearing}");
    }

    #[test]
    fn gate_outside_view_or_range_is_not_seen() {
        assert!(sim(|c| c.initial_heading = 180.0)
            .detections("gate")
            .is_empty());
        assert!(sim(|c| c.visibility = 2.0).detections("gate").is_empty());
        assert!(sim(|_| {}).detections("buoy").is_empty());
    }

    #[test]
    fn gate_is_reported_under_its_configured_label() {
        let vehicle = sim(|_| {}).with_gate_label("qualification_gate");

        assert_eq!(vehicle.detections("qualification_gate").len(), 1);
        assert!(vehicle.detections("gate").is_empty());
    }

    #[test]
    fn negative_depth_is_rejected() {
        let mut vehicle = sim(|_| {});
        assert!(matches!(
            vehicle.set_depth(-1.0),
            Err(VehicleError::Rejected(_))
        ));
    }
}
