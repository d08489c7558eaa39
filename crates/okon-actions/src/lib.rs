//! OKON vehicle actions for `okon-bt` trees.
//!
//! Every action is generic over the vehicle link (`VehicleMut`). Setpoint calls are fire and
//! forget; a setpoint the link fails to deliver keeps the action `Running`.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod control;
pub mod depth;
pub mod heading;
pub mod keys;
pub mod perception;
pub mod velocity;

#[cfg(test)]
mod testing;

pub use control::{Exit, Wait};
pub use depth::SetDepth;
pub use heading::{Rotate, RotateDeltaYawAngle};
pub use keys::{DELTA_YAW, DETECTION};
pub use perception::{
    delta_yaw, CalculateDeltaYaw, IsGateFarEnough, TryDetectNTimes, CAMERA_HFOV_DEG,
};
pub use velocity::SetVelocity;
