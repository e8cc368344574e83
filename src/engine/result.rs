//! Per-frame line matching result aggregate.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithms::correspondence::{self, MatchingConfig};
use crate::algorithms::hypothesis::{PoseHypothesis, PoseHypothesisInterval};
use crate::algorithms::spherical::{self, SphericalLine};
use crate::core::types::{FieldLine, Pose2D, PoseCovariance, MAX_LINE_OBSERVATIONS};

/// The per-frame container handed from the vision collaborator through the
/// matching engine to the pose tracker.
///
/// Lifecycle per frame: [`reset`](Self::reset), observation fill by vision,
/// spherical cache fill and hypothesis generation by the engine, then
/// read-only consumption by the tracker. The spherical cache is derived
/// purely from the observations and is invalidated whenever they change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineMatchingResult {
    /// Known field lines in absolute coordinates (stable across frames)
    pub field_lines: Vec<FieldLine>,
    /// This frame's observed lines in robot-relative coordinates
    observations: Vec<FieldLine>,
    /// Cached spherical projections of the observations
    observations_spherical: Vec<SphericalLine>,
    /// Fully determined pose candidates (crossing geometry)
    pub pose_hypotheses: Vec<PoseHypothesis>,
    /// Pose ambiguity intervals (parallel-only geometry)
    pub pose_hypothesis_intervals: Vec<PoseHypothesisInterval>,
    /// Frame contained exactly one observed field line
    pub only_observed_one_field_line: bool,
}

impl LineMatchingResult {
    /// Create an aggregate over the given field line map.
    pub fn new(field_lines: Vec<FieldLine>) -> Self {
        Self {
            field_lines,
            ..Default::default()
        }
    }

    /// Clear all per-frame state. The field line map is kept.
    pub fn reset(&mut self) {
        self.observations.clear();
        self.observations_spherical.clear();
        self.pose_hypotheses.clear();
        self.pose_hypothesis_intervals.clear();
        self.only_observed_one_field_line = false;
    }

    /// Replace this frame's observations, truncating silently at
    /// [`MAX_LINE_OBSERVATIONS`]. Invalidates the spherical cache.
    pub fn set_observations(&mut self, observations: &[FieldLine]) {
        let count = observations.len().min(MAX_LINE_OBSERVATIONS);
        self.observations.clear();
        self.observations.extend_from_slice(&observations[..count]);
        self.observations_spherical.clear();
    }

    /// This frame's observations.
    pub fn observations(&self) -> &[FieldLine] {
        &self.observations
    }

    /// Cached spherical projections; empty until
    /// [`calculate_observations_spherical_coords`](Self::calculate_observations_spherical_coords) runs.
    pub fn observations_spherical(&self) -> &[SphericalLine] {
        &self.observations_spherical
    }

    /// Fill the spherical projection cache from the current observations.
    ///
    /// Must run after the observations are populated and before any
    /// correspondence search. Idempotent for unchanged observations.
    pub fn calculate_observations_spherical_coords(&mut self) {
        self.observations_spherical = self
            .observations
            .iter()
            .map(spherical::project_line)
            .collect();
    }

    /// Search correspondences for one candidate pose and hand back the
    /// accepted (observed, map) line pairs in matched order.
    ///
    /// Returns whether at least one correspondence was accepted.
    /// `requested_by_localization` tags the diagnostics only; it never
    /// changes the result.
    pub fn get_correspondences_for_localization_hypothesis(
        &self,
        pose: &Pose2D,
        pose_covariance: &PoseCovariance,
        config: &MatchingConfig,
        out: &mut Vec<(FieldLine, FieldLine)>,
        display_warning: bool,
        requested_by_localization: bool,
    ) -> bool {
        out.clear();
        let accepted = correspondence::find_correspondences(
            pose,
            pose_covariance,
            config,
            &self.observations_spherical,
            &self.field_lines,
            display_warning,
        );
        for c in &accepted {
            out.push((self.observations[c.observation], self.field_lines[c.map_line]));
        }
        debug!(
            "correspondence query ({}): {} of {} observations matched",
            if requested_by_localization {
                "localization"
            } else {
                "external"
            },
            out.len(),
            self.observations.len()
        );
        !out.is_empty()
    }

    /// (observed, map) line pairs recorded in a hypothesis, for external
    /// debug drawing.
    pub fn correspondence_pairs_for_hypothesis(
        &self,
        hypothesis: &PoseHypothesis,
    ) -> Vec<(FieldLine, FieldLine)> {
        hypothesis
            .correspondences
            .iter()
            .enumerate()
            .filter_map(|(observation, slot)| {
                slot.map(|map_index| (self.observations[observation], self.field_lines[map_index]))
            })
            .collect()
    }

    /// Any evidence at all this frame?
    #[inline]
    pub fn contains_matches(&self) -> bool {
        !self.pose_hypotheses.is_empty() || !self.pose_hypothesis_intervals.is_empty()
    }

    /// Any fully determined pose this frame?
    #[inline]
    pub fn contains_unique_matches(&self) -> bool {
        !self.pose_hypotheses.is_empty()
    }

    /// Any ambiguity interval this frame?
    #[inline]
    pub fn contains_non_unique_matches(&self) -> bool {
        !self.pose_hypothesis_intervals.is_empty()
    }
}
