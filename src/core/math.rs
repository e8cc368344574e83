//! Mathematical primitives for 2D field-line geometry.
//!
//! Functions for angle normalization and angular statistics.

use std::f32::consts::PI;

/// Normalize angle to [-π, π].
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a < -PI {
        a += 2.0 * PI;
    }
    a
}

/// Shortest angular difference from angle `a` to angle `b`.
///
/// Returns the signed angle you need to add to `a` to reach `b`,
/// taking the shortest path around the circle.
#[inline]
pub fn angle_diff(a: f32, b: f32) -> f32 {
    normalize_angle(b - a)
}

/// Circular mean of a set of angles.
///
/// Averages on the unit circle, so values straddling the ±π boundary
/// combine correctly. Returns 0.0 for an empty slice.
pub fn circular_mean(angles: &[f32]) -> f32 {
    if angles.is_empty() {
        return 0.0;
    }
    let mut sin_sum = 0.0f32;
    let mut cos_sum = 0.0f32;
    for &a in angles {
        sin_sum += a.sin();
        cos_sum += a.cos();
    }
    sin_sum.atan2(cos_sum)
}
