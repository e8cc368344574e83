//! Field-line segment type and correspondence capacity.

use serde::{Deserialize, Serialize};

use super::pose::Point2D;

/// Maximum number of line observations considered per frame.
///
/// Correspondence arrays always carry exactly this many slots; observation
/// buffers are silently truncated at this bound.
pub const MAX_LINE_OBSERVATIONS: usize = 8;

/// Per-observation correspondence slots.
///
/// Slot `i` holds the index of the map line matched to observation `i`,
/// or `None` when the observation is unmatched.
pub type CorrespondenceSlots = [Option<usize>; MAX_LINE_OBSERVATIONS];

/// A directed field-line segment.
///
/// Used both for map lines (absolute field coordinates, camera height 0)
/// and for observed lines (robot-relative coordinates, camera height of
/// the producing camera). Immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldLine {
    /// First endpoint in millimeters
    pub start: Point2D,
    /// Second endpoint in millimeters
    pub end: Point2D,
    /// Height of the observing camera in millimeters (0 for map lines)
    pub camera_height: f32,
}

impl FieldLine {
    /// Create a new field line.
    #[inline]
    pub fn new(start: Point2D, end: Point2D, camera_height: f32) -> Self {
        Self {
            start,
            end,
            camera_height,
        }
    }

    /// Create a map line (camera height 0).
    #[inline]
    pub fn map_line(start: Point2D, end: Point2D) -> Self {
        Self::new(start, end, 0.0)
    }

    /// Segment length in millimeters.
    #[inline]
    pub fn length(&self) -> f32 {
        self.start.distance(&self.end)
    }

    /// Unit direction vector from start to end.
    ///
    /// Returns a zero vector for a degenerate (zero-length) segment.
    pub fn direction(&self) -> Point2D {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len < f32::EPSILON {
            return Point2D::new(0.0, 0.0);
        }
        Point2D::new(dx / len, dy / len)
    }

    /// Angle of the segment direction, in radians.
    #[inline]
    pub fn angle(&self) -> f32 {
        (self.end.y - self.start.y).atan2(self.end.x - self.start.x)
    }

    /// Line in normal form: unit normal `n` and offset `c` with
    /// `n · p + c = 0` for every point `p` on the infinite extension.
    pub fn normal_form(&self) -> (Point2D, f32) {
        let dir = self.direction();
        let normal = Point2D::new(-dir.y, dir.x);
        let c = -normal.dot(&self.start);
        (normal, c)
    }

    /// Orthogonally project a point onto the infinite extension of this line.
    pub fn project_point(&self, point: &Point2D) -> Point2D {
        let (normal, c) = self.normal_form();
        let signed = normal.dot(point) + c;
        Point2D::new(point.x - normal.x * signed, point.y - normal.y * signed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_length_and_direction() {
        let line = FieldLine::map_line(Point2D::new(0.0, 0.0), Point2D::new(0.0, 2000.0));
        assert_relative_eq!(line.length(), 2000.0);
        assert_relative_eq!(line.direction().y, 1.0);
        assert_relative_eq!(line.angle(), FRAC_PI_2);
    }

    #[test]
    fn test_degenerate_direction_is_zero() {
        let p = Point2D::new(10.0, 10.0);
        let line = FieldLine::map_line(p, p);
        assert_eq!(line.direction(), Point2D::new(0.0, 0.0));
    }

    #[test]
    fn test_normal_form_contains_endpoints() {
        let line = FieldLine::map_line(Point2D::new(-3000.0, 500.0), Point2D::new(3000.0, 500.0));
        let (n, c) = line.normal_form();
        assert_relative_eq!(n.dot(&line.start) + c, 0.0, epsilon = 1e-3);
        assert_relative_eq!(n.dot(&line.end) + c, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_project_point() {
        let line = FieldLine::map_line(Point2D::new(-3000.0, 0.0), Point2D::new(3000.0, 0.0));
        let projected = line.project_point(&Point2D::new(123.0, 456.0));
        assert_relative_eq!(projected.x, 123.0, epsilon = 1e-3);
        assert_relative_eq!(projected.y, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_projection_lands_beyond_segment_extent() {
        // Projection is onto the infinite extension, not clamped to the segment.
        let line = FieldLine::map_line(Point2D::new(0.0, 0.0), Point2D::new(1000.0, 0.0));
        let projected = line.project_point(&Point2D::new(5000.0, 700.0));
        assert_relative_eq!(projected.x, 5000.0, epsilon = 1e-3);
        assert_relative_eq!(projected.y, 0.0, epsilon = 1e-3);
    }
}
