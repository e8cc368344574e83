//! Point and pose types for 2D field geometry.

use serde::{Deserialize, Serialize};

/// A 2D point in millimeters (field or robot frame).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate in millimeters
    pub x: f32,
    /// Y coordinate in millimeters
    pub y: f32,
}

impl Point2D {
    /// Create a new point.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean norm (planar distance from the origin).
    #[inline]
    pub fn norm(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Bearing of the point vector, in radians.
    #[inline]
    pub fn angle(&self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Dot product with another point vector.
    #[inline]
    pub fn dot(&self, other: &Point2D) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point2D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// Robot pose in 2D space.
///
/// Position (x, y) in millimeters and heading (theta) in radians,
/// normalized to [-π, π].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    /// X position in millimeters
    pub x: f32,
    /// Y position in millimeters
    pub y: f32,
    /// Heading in radians, normalized to [-π, π]
    pub theta: f32,
}

impl Pose2D {
    /// Create a new pose with theta normalized to [-π, π].
    #[inline]
    pub fn new(x: f32, y: f32, theta: f32) -> Self {
        Self {
            x,
            y,
            theta: crate::core::math::normalize_angle(theta),
        }
    }

    /// Identity pose at origin with zero heading.
    #[inline]
    pub fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            theta: 0.0,
        }
    }

    /// Position of this pose as a point.
    #[inline]
    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Compose two poses: self ⊕ other.
    ///
    /// Applies `other` relative to the frame of `self`.
    #[inline]
    pub fn compose(&self, other: &Pose2D) -> Pose2D {
        let (sin_t, cos_t) = self.theta.sin_cos();
        Pose2D::new(
            self.x + other.x * cos_t - other.y * sin_t,
            self.y + other.x * sin_t + other.y * cos_t,
            self.theta + other.theta,
        )
    }

    /// Inverse of this pose.
    #[inline]
    pub fn inverse(&self) -> Pose2D {
        let (sin_t, cos_t) = self.theta.sin_cos();
        Pose2D::new(
            -self.x * cos_t - self.y * sin_t,
            self.x * sin_t - self.y * cos_t,
            -self.theta,
        )
    }

    /// Transform a point from this pose's local frame to the field frame.
    #[inline]
    pub fn transform_point(&self, point: &Point2D) -> Point2D {
        let (sin_t, cos_t) = self.theta.sin_cos();
        Point2D::new(
            self.x + point.x * cos_t - point.y * sin_t,
            self.y + point.x * sin_t + point.y * cos_t,
        )
    }

    /// Transform a point from the field frame to this pose's local frame.
    #[inline]
    pub fn inverse_transform_point(&self, point: &Point2D) -> Point2D {
        let (sin_t, cos_t) = self.theta.sin_cos();
        let dx = point.x - self.x;
        let dy = point.y - self.y;
        Point2D::new(dx * cos_t + dy * sin_t, -dx * sin_t + dy * cos_t)
    }

    /// Rotate a vector by this pose's heading, without translating.
    #[inline]
    pub fn rotate(&self, vector: &Point2D) -> Point2D {
        let (sin_t, cos_t) = self.theta.sin_cos();
        Point2D::new(
            vector.x * cos_t - vector.y * sin_t,
            vector.x * sin_t + vector.y * cos_t,
        )
    }
}

impl Default for Pose2D {
    fn default() -> Self {
        Self::identity()
    }
}
