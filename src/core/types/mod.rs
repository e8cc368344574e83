//! Core value types shared by all layers.

mod covariance;
mod field_line;
mod pose;

pub use covariance::{PoseCovariance, SymMatrix2};
pub use field_line::{CorrespondenceSlots, FieldLine, MAX_LINE_OBSERVATIONS};
pub use pose::{Point2D, Pose2D};
