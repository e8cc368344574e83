//! Gaussian scoring of spherical-coordinate correspondences.
//!
//! The residual between an observed and a predicted endpoint lives in
//! spherical space (vertical angle, horizontal angle). The acceptance
//! likelihood combines measurement noise with pose uncertainty: the pose
//! covariance is propagated into spherical space through the linearized
//! Jacobian of the projection, summed with the measurement covariance,
//! and the Mahalanobis distance is evaluated against the combined term:
//!
//! ```text
//! Σ = Σ_meas + J Σ_pose Jᵀ
//! m = dᵀ Σ⁻¹ d
//! likelihood(pair) = exp(-0.5 · (m_start + m_end) / 2)
//! ```

use crate::core::math::normalize_angle;
use crate::core::types::{Point2D, PoseCovariance, SymMatrix2};

use super::super::spherical::SphericalPoint;
use super::EndpointOrder;

/// Squared Mahalanobis distance between an observed and a predicted
/// endpoint in spherical space.
///
/// `map_offset` is the matched map endpoint minus the candidate pose
/// position, in the field frame; it parameterizes the Jacobian of the
/// projection with respect to the pose.
pub(crate) fn endpoint_mahalanobis(
    observed: &SphericalPoint,
    predicted: &SphericalPoint,
    map_offset: &Point2D,
    camera_height: f32,
    pose_covariance: &PoseCovariance,
    measurement_covariance: &SymMatrix2,
) -> f32 {
    let dv = observed.vertical - predicted.vertical;
    let dh = normalize_angle(observed.horizontal - predicted.horizontal);

    let r_sq = map_offset.x * map_offset.x + map_offset.y * map_offset.y;
    let r = r_sq.sqrt();

    let total = if r > f32::EPSILON {
        // Jacobian of (vertical, horizontal) w.r.t. pose (x, y, θ):
        //   vertical   = atan2(h, |m - t|)       (heading independent)
        //   horizontal = atan2(dy, dx) - θ        with d = m - t
        let v_scale = camera_height / (r * (r_sq + camera_height * camera_height));
        let j = [
            [v_scale * map_offset.x, v_scale * map_offset.y, 0.0],
            [map_offset.y / r_sq, -map_offset.x / r_sq, -1.0],
        ];
        measurement_covariance.add(&pose_covariance.propagate(&j))
    } else {
        // Map point at the pose position: projection is not differentiable,
        // fall back to measurement noise alone.
        *measurement_covariance
    };

    match total.inverse() {
        Some(precision) => precision.quadratic_form(dv, dh),
        None => f32::INFINITY,
    }
}

/// Likelihood of an observed line having been generated by a predicted map
/// line, for one endpoint pairing order.
pub(crate) fn order_likelihood(
    observed: (&SphericalPoint, &SphericalPoint),
    predicted: (&SphericalPoint, &SphericalPoint),
    map_offsets: (&Point2D, &Point2D),
    camera_height: f32,
    pose_covariance: &PoseCovariance,
    measurement_covariance: &SymMatrix2,
) -> f32 {
    let m_first = endpoint_mahalanobis(
        observed.0,
        predicted.0,
        map_offsets.0,
        camera_height,
        pose_covariance,
        measurement_covariance,
    );
    let m_second = endpoint_mahalanobis(
        observed.1,
        predicted.1,
        map_offsets.1,
        camera_height,
        pose_covariance,
        measurement_covariance,
    );
    (-0.25 * (m_first + m_second)).exp()
}

/// Score both endpoint pairing orders and keep the better one.
///
/// Field lines carry no direction the observer can see, so start↔start and
/// start↔end pairings are both legitimate; the arg-max decides.
pub(crate) fn best_order_likelihood(
    observed: (&SphericalPoint, &SphericalPoint),
    predicted: (&SphericalPoint, &SphericalPoint),
    map_offsets: (&Point2D, &Point2D),
    camera_height: f32,
    pose_covariance: &PoseCovariance,
    measurement_covariance: &SymMatrix2,
) -> (EndpointOrder, f32) {
    let direct = order_likelihood(
        observed,
        predicted,
        map_offsets,
        camera_height,
        pose_covariance,
        measurement_covariance,
    );
    let swapped = order_likelihood(
        observed,
        (predicted.1, predicted.0),
        (map_offsets.1, map_offsets.0),
        camera_height,
        pose_covariance,
        measurement_covariance,
    );
    if swapped > direct {
        (EndpointOrder::Swapped, swapped)
    } else {
        (EndpointOrder::Direct, direct)
    }
}
