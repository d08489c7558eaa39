//! Vehicle-facing primitives shared by the OKON behavior tree crates.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod blackboard;
pub mod error;
pub mod heading;
pub mod sensors;
pub mod tick;
pub mod vehicle;

pub use blackboard::{Access, BbKey, BbValue, Blackboard, BlackboardClient};
pub use error::{BlackboardError, VehicleError};
pub use heading::{heading_error, normalize_heading, within_heading_tolerance};
pub use sensors::{BoundingBox, Detection, ImagePoint, Orientation, Velocity};
pub use tick::TickContext;
pub use vehicle::{VehicleMut, VehicleView};
