//! Sensor and setpoint values exchanged with the vehicle.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Vehicle attitude in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Orientation {
    pub roll: f64,
    pub pitch: f64,
    /// Heading, `[0, 360)`.
    pub yaw: f64,
}

/// Body-frame velocity setpoint in m/s. `z` points forward.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Velocity {
    pub const ZERO: Velocity = Velocity {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A point in normalized image coordinates, both axes in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImagePoint {
    pub x: f64,
    pub y: f64,
}

impl ImagePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundingBox {
    pub min: ImagePoint,
    pub max: ImagePoint,
}

impl BoundingBox {
    pub fn new(min: ImagePoint, max: ImagePoint) -> Self {
        Self { min, max }
    }

    pub fn center_x(&self) -> f64 {
        (self.min.x + self.max.x) / 2.0
    }

    /// Horizontal offset of the box center from the image center, in `[-1, 1]`.
    pub fn horizontal_offset(&self) -> f64 {
        self.center_x() * 2.0 - 1.0
    }
}

/// One detected object, as reported by the vehicle's detector.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Detection {
    /// Distance to the object in meters.
    pub distance: f64,
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(distance: f64, bbox: BoundingBox) -> Self {
        Self { distance, bbox }
    }
}
