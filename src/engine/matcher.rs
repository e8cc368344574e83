//! Per-frame matching orchestration.

use log::debug;

use crate::algorithms::correspondence::{self, ConfigError, MatchingConfig};
use crate::algorithms::hypothesis::{self, HypothesisOutcome};
use crate::core::types::{Pose2D, PoseCovariance};

use super::result::LineMatchingResult;

/// Drives the per-frame flow: spherical cache, correspondence search per
/// candidate pose, hypothesis generation, aggregate population.
///
/// Stateless across frames; everything per-frame lives in the
/// [`LineMatchingResult`] the caller owns.
#[derive(Debug, Clone)]
pub struct LineMatcher {
    config: MatchingConfig,
}

impl LineMatcher {
    /// Create a matcher with a validated configuration.
    pub fn new(config: MatchingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active matching configuration.
    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Run one frame against the supplied candidate poses.
    ///
    /// Expects `result` to hold this frame's observations; fills the
    /// spherical cache and the hypothesis and interval sequences. Runs to
    /// completion within the frame; never fails.
    pub fn update(
        &self,
        result: &mut LineMatchingResult,
        candidates: &[(Pose2D, PoseCovariance)],
    ) {
        result.pose_hypotheses.clear();
        result.pose_hypothesis_intervals.clear();
        result.only_observed_one_field_line = false;
        result.calculate_observations_spherical_coords();

        if result.observations().is_empty() {
            return;
        }
        if result.observations().len() == 1 {
            // A lone line is weak evidence: flag it, fabricate nothing.
            result.only_observed_one_field_line = true;
            debug!("single line observed, skipping hypothesis generation");
            return;
        }

        for (pose, covariance) in candidates {
            let accepted = correspondence::find_correspondences(
                pose,
                covariance,
                &self.config,
                result.observations_spherical(),
                &result.field_lines,
                false,
            );
            if accepted.is_empty() {
                continue;
            }

            match hypothesis::generate(result.observations(), &result.field_lines, &accepted) {
                HypothesisOutcome::Unique(h) => result.pose_hypotheses.push(h),
                HypothesisOutcome::Interval(i) => result.pose_hypothesis_intervals.push(i),
                HypothesisOutcome::SingleLine => result.only_observed_one_field_line = true,
                HypothesisOutcome::NoMatch => {}
            }
        }

        debug!(
            "frame: {} observations, {} candidates -> {} unique, {} intervals",
            result.observations().len(),
            candidates.len(),
            result.pose_hypotheses.len(),
            result.pose_hypothesis_intervals.len()
        );
    }
}

impl Default for LineMatcher {
    fn default() -> Self {
        Self {
            config: MatchingConfig::default(),
        }
    }
}
