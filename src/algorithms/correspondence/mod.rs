//! Correspondence search between observed and mapped field lines.
//!
//! For one candidate pose, every map line is re-expressed relative to the
//! pose and projected into spherical space, where it is scored against the
//! cached spherical projections of the frame's observations. Pairs above
//! the likelihood threshold compete in a greedy assignment: the strongest
//! pair is fixed first, then the remaining observations are matched against
//! the remaining map lines.

mod config;
mod scoring;

pub use config::{ConfigError, MatchingConfig};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::types::{FieldLine, Point2D, Pose2D, PoseCovariance};

use super::spherical::{self, SphericalLine};

/// Likelihood margin below which two candidates count as tied.
const TIE_EPSILON: f32 = 1e-4;

/// Endpoint pairing order between an observed and a mapped line.
///
/// Field lines have no direction visible to the observer, so both pairings
/// are evaluated and the better one kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndpointOrder {
    /// Observation start ↔ map start, observation end ↔ map end
    Direct,
    /// Observation start ↔ map end, observation end ↔ map start
    Swapped,
}

/// An accepted assignment of one observed line to one map line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correspondence {
    /// Index into the frame's observations
    pub observation: usize,
    /// Index into the field line map
    pub map_line: usize,
    /// Winning endpoint pairing order
    pub order: EndpointOrder,
    /// Gaussian likelihood of the pairing
    pub likelihood: f32,
}

/// Find the correspondences between observations and map lines that a
/// candidate pose makes geometrically plausible.
///
/// Returns accepted correspondences ordered by observation index. Empty
/// observation or map sets yield an empty result, never an error.
/// `display_warning` surfaces tie diagnostics to the log collaborator
/// without changing the outcome.
pub fn find_correspondences(
    pose: &Pose2D,
    pose_covariance: &PoseCovariance,
    config: &MatchingConfig,
    observations_spherical: &[SphericalLine],
    map_lines: &[FieldLine],
    display_warning: bool,
) -> Vec<Correspondence> {
    if observations_spherical.is_empty() || map_lines.is_empty() {
        return Vec::new();
    }

    let Some(measurement_covariance) = config.measurement_precision.inverse() else {
        warn!("measurement precision matrix is singular, rejecting all correspondences");
        return Vec::new();
    };

    // Map endpoints relative to the pose position (field frame), reused for
    // the scoring Jacobian of every observation.
    let position = pose.position();
    let map_offsets: Vec<(Point2D, Point2D)> = map_lines
        .iter()
        .map(|line| {
            (
                Point2D::new(line.start.x - position.x, line.start.y - position.y),
                Point2D::new(line.end.x - position.x, line.end.y - position.y),
            )
        })
        .collect();

    let mut candidates: Vec<Correspondence> = Vec::new();
    for (obs_index, observation) in observations_spherical.iter().enumerate() {
        let mut best = 0.0f32;
        let mut second_best = 0.0f32;

        for (map_index, map_line) in map_lines.iter().enumerate() {
            // Predicted appearance of the map line from the candidate pose,
            // in the observation's own camera-height space.
            let predicted = spherical::project_line_absolute(pose, map_line, observation.camera_height);
            let offsets = &map_offsets[map_index];

            let (order, likelihood) = scoring::best_order_likelihood(
                (&observation.start, &observation.end),
                (&predicted.start, &predicted.end),
                (&offsets.0, &offsets.1),
                observation.camera_height,
                pose_covariance,
                &measurement_covariance,
            );

            if likelihood > best {
                second_best = best;
                best = likelihood;
            } else if likelihood > second_best {
                second_best = likelihood;
            }

            if likelihood >= config.likelihood_threshold {
                candidates.push(Correspondence {
                    observation: obs_index,
                    map_line: map_index,
                    order,
                    likelihood,
                });
            }
        }

        if display_warning
            && best >= config.likelihood_threshold
            && second_best >= config.likelihood_threshold
            && (best - second_best) < TIE_EPSILON
        {
            warn!(
                "observation {} matches multiple map lines with near-equal likelihood {:.4}",
                obs_index, best
            );
        }
    }

    // Strongest pair first; ties resolve to the lower observation index,
    // then the lower map index, keeping the assignment deterministic.
    candidates.sort_by(|a, b| {
        b.likelihood
            .total_cmp(&a.likelihood)
            .then(a.observation.cmp(&b.observation))
            .then(a.map_line.cmp(&b.map_line))
    });

    let mut observation_taken = vec![false; observations_spherical.len()];
    let mut map_taken = vec![false; map_lines.len()];
    let mut accepted: Vec<Correspondence> = Vec::new();
    for candidate in candidates {
        if observation_taken[candidate.observation] || map_taken[candidate.map_line] {
            continue;
        }
        observation_taken[candidate.observation] = true;
        map_taken[candidate.map_line] = true;
        accepted.push(candidate);
    }

    accepted.sort_by_key(|c| c.observation);
    accepted
}
