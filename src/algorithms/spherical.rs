//! Camera-height-normalized spherical observation model.
//!
//! Converts line observations into an angular representation that depends
//! only on the line's position relative to the observing camera and the
//! camera's height, never on the robot's absolute pose. Map lines
//! re-expressed relative to any candidate pose project into the same space,
//! which makes correspondence scoring a comparison of angle pairs.

use serde::{Deserialize, Serialize};

use crate::core::types::{FieldLine, Point2D, Pose2D};

/// A point observation in spherical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphericalPoint {
    /// Vertical angle: atan2(camera height, planar distance), in radians
    pub vertical: f32,
    /// Horizontal angle: bearing of the point in the observer frame, in radians
    pub horizontal: f32,
}

/// A line observation in spherical coordinates, one entry per endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphericalLine {
    /// Projection of the start endpoint
    pub start: SphericalPoint,
    /// Projection of the end endpoint
    pub end: SphericalPoint,
    /// Camera height carried through from the source line, in millimeters
    pub camera_height: f32,
}

/// Project a robot-relative point into spherical coordinates.
#[inline]
pub fn project_point(point: &Point2D, camera_height: f32) -> SphericalPoint {
    SphericalPoint {
        vertical: camera_height.atan2(point.norm()),
        horizontal: point.angle(),
    }
}

/// Project a robot-relative field line into spherical coordinates.
pub fn project_line(line: &FieldLine) -> SphericalLine {
    SphericalLine {
        start: project_point(&line.start, line.camera_height),
        end: project_point(&line.end, line.camera_height),
        camera_height: line.camera_height,
    }
}

/// Project an absolute-coordinate point into the spherical space of an
/// observer at `pose`.
#[inline]
pub fn project_point_absolute(pose: &Pose2D, point: &Point2D, camera_height: f32) -> SphericalPoint {
    project_point(&pose.inverse_transform_point(point), camera_height)
}

/// Project an absolute-coordinate field line into the spherical space of an
/// observer at `pose`, using `camera_height` for both endpoints.
///
/// Map lines carry no meaningful camera height of their own; the caller
/// supplies the height of the observation frame being compared against.
pub fn project_line_absolute(pose: &Pose2D, line: &FieldLine, camera_height: f32) -> SphericalLine {
    SphericalLine {
        start: project_point_absolute(pose, &line.start, camera_height),
        end: project_point_absolute(pose, &line.end, camera_height),
        camera_height,
    }
}
