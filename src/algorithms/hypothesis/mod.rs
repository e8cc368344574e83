//! Pose hypothesis generation from accepted correspondences.
//!
//! A correspondence set with a geometric crossing (two matched map lines
//! that are not parallel) pins down position and heading completely and
//! yields a unique [`PoseHypothesis`]. A set of mutually parallel matches
//! determines heading and the cross-line offset but leaves the along-line
//! translation free: that one-parameter family is reported as a
//! [`PoseHypothesisInterval`] bounded by the matched map segments' extents.
//! A frame with a single observed line carries too little evidence for
//! either and is flagged instead.

mod interval;

use serde::{Deserialize, Serialize};

use crate::core::math::circular_mean;
use crate::core::types::{
    CorrespondenceSlots, FieldLine, Point2D, Pose2D, SymMatrix2, MAX_LINE_OBSERVATIONS,
};

use super::correspondence::{Correspondence, EndpointOrder};
use interval::ShiftRange;

/// Minimum |sin| between two map-line directions to count as a crossing.
/// Below this the pair is treated as parallel (~3 degrees).
const CROSSING_MIN_SIN: f32 = 0.05;

/// A fully determined candidate robot pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseHypothesis {
    /// Pose in absolute field coordinates
    pub pose: Pose2D,
    /// Map-line index per observation slot
    pub correspondences: CorrespondenceSlots,
}

/// A one-parameter family of candidate poses.
///
/// `start` and `end` bound the physically reachable translation along the
/// under-constrained axis; both share the determined heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseHypothesisInterval {
    /// Lower bounding pose
    pub start: Pose2D,
    /// Upper bounding pose
    pub end: Pose2D,
    /// Map-line index per observation slot, shared by both bounds
    pub correspondences: CorrespondenceSlots,
}

/// What a correspondence set implies about the robot pose.
#[derive(Debug, Clone, PartialEq)]
pub enum HypothesisOutcome {
    /// Crossing geometry: position and heading fully determined
    Unique(PoseHypothesis),
    /// Parallel-only geometry: translation ambiguous along one axis
    Interval(PoseHypothesisInterval),
    /// Exactly one observed line: weak evidence, no hypothesis fabricated
    SingleLine,
    /// Nothing accepted or geometry unsolvable
    NoMatch,
}

/// Derive pose evidence from an accepted correspondence set.
pub fn generate(
    observations: &[FieldLine],
    map_lines: &[FieldLine],
    correspondences: &[Correspondence],
) -> HypothesisOutcome {
    if observations.len() == 1 {
        return HypothesisOutcome::SingleLine;
    }
    if correspondences.is_empty() {
        return HypothesisOutcome::NoMatch;
    }

    let slots = to_slots(correspondences);
    let theta = estimate_heading(observations, map_lines, correspondences);

    if has_crossing(map_lines, correspondences) {
        match solve_translation(observations, map_lines, correspondences, theta) {
            Some(position) => HypothesisOutcome::Unique(PoseHypothesis {
                pose: Pose2D::new(position.x, position.y, theta),
                correspondences: slots,
            }),
            None => HypothesisOutcome::NoMatch,
        }
    } else {
        HypothesisOutcome::Interval(parallel_interval(
            observations,
            map_lines,
            correspondences,
            theta,
            slots,
        ))
    }
}

/// Orthogonally project a robot-relative point onto the infinite extension
/// of a field line, assuming the robot stands at `pose`.
///
/// Returns the projected point in absolute field coordinates.
pub fn project_point_to_field_line(
    pose: &Pose2D,
    point_relative: &Point2D,
    line: &FieldLine,
) -> Point2D {
    line.project_point(&pose.transform_point(point_relative))
}

/// Orthogonally project an absolute-coordinate point onto the infinite
/// extension of a field line.
pub fn project_point_to_field_line_absolute(point: &Point2D, line: &FieldLine) -> Point2D {
    line.project_point(point)
}

fn to_slots(correspondences: &[Correspondence]) -> CorrespondenceSlots {
    let mut slots: CorrespondenceSlots = [None; MAX_LINE_OBSERVATIONS];
    for c in correspondences {
        if c.observation < MAX_LINE_OBSERVATIONS {
            slots[c.observation] = Some(c.map_line);
        }
    }
    slots
}

/// True if any two matched map lines cross.
fn has_crossing(map_lines: &[FieldLine], correspondences: &[Correspondence]) -> bool {
    for (i, a) in correspondences.iter().enumerate() {
        let u = map_lines[a.map_line].direction();
        for b in correspondences.iter().skip(i + 1) {
            let v = map_lines[b.map_line].direction();
            let cross = u.x * v.y - u.y * v.x;
            if cross.abs() > CROSSING_MIN_SIN {
                return true;
            }
        }
    }
    false
}

/// Heading as the circular mean of per-correspondence estimates.
///
/// Each estimate is the matched map line's direction angle minus the
/// observed line's direction angle, with the winning endpoint order applied
/// so the two directions point the same way.
fn estimate_heading(
    observations: &[FieldLine],
    map_lines: &[FieldLine],
    correspondences: &[Correspondence],
) -> f32 {
    let mut estimates = Vec::with_capacity(correspondences.len());
    for c in correspondences {
        let observed = &observations[c.observation];
        let map_line = &map_lines[c.map_line];
        let map_angle = match c.order {
            EndpointOrder::Direct => map_line.angle(),
            EndpointOrder::Swapped => {
                (map_line.start.y - map_line.end.y).atan2(map_line.start.x - map_line.end.x)
            }
        };
        estimates.push(map_angle - observed.angle());
    }
    circular_mean(&estimates)
}

/// Least-squares translation placing rotated observed endpoints onto their
/// matched infinite map lines.
///
/// Minimizes Σ (n·(R(θ)p + t) + c)² over t; the 2x2 normal equations are
/// nonsingular whenever the matched normals span the plane (a crossing).
fn solve_translation(
    observations: &[FieldLine],
    map_lines: &[FieldLine],
    correspondences: &[Correspondence],
    theta: f32,
) -> Option<Point2D> {
    let rotation = Pose2D::new(0.0, 0.0, theta);
    let mut a = SymMatrix2::diagonal(0.0, 0.0);
    let mut bx = 0.0f32;
    let mut by = 0.0f32;

    for c in correspondences {
        let observed = &observations[c.observation];
        let (normal, offset) = map_lines[c.map_line].normal_form();
        for endpoint in [&observed.start, &observed.end] {
            let rotated = rotation.rotate(endpoint);
            let residual = normal.dot(&rotated) + offset;
            a.xx += normal.x * normal.x;
            a.xy += normal.x * normal.y;
            a.yy += normal.y * normal.y;
            bx -= normal.x * residual;
            by -= normal.y * residual;
        }
    }

    let inv = a.inverse()?;
    Some(Point2D::new(
        inv.xx * bx + inv.xy * by,
        inv.xy * bx + inv.yy * by,
    ))
}

/// Interval construction for mutually parallel correspondence sets.
///
/// The cross-line offset comes from averaging the per-endpoint line
/// constraints; the along-line shift range keeps every observed segment
/// inside its matched map segment's extent, intersected across matches.
fn parallel_interval(
    observations: &[FieldLine],
    map_lines: &[FieldLine],
    correspondences: &[Correspondence],
    theta: f32,
    slots: CorrespondenceSlots,
) -> PoseHypothesisInterval {
    let rotation = Pose2D::new(0.0, 0.0, theta);
    let axis = map_lines[correspondences[0].map_line].direction();
    let normal_axis = Point2D::new(-axis.y, axis.x);

    let mut beta_sum = 0.0f32;
    let mut beta_count = 0.0f32;
    let mut range = ShiftRange::unbounded();

    for c in correspondences {
        let observed = &observations[c.observation];
        let map_line = &map_lines[c.map_line];
        let (line_normal, line_offset) = map_line.normal_form();
        // Parallel lines may carry an antiparallel normal; fold the sign in.
        let sign = if line_normal.dot(&normal_axis) >= 0.0 {
            1.0
        } else {
            -1.0
        };

        let map_proj = (axis.dot(&map_line.start), axis.dot(&map_line.end));
        let map_lo = map_proj.0.min(map_proj.1);
        let map_hi = map_proj.0.max(map_proj.1);

        let mut obs_lo = f32::INFINITY;
        let mut obs_hi = f32::NEG_INFINITY;
        for endpoint in [&observed.start, &observed.end] {
            let rotated = rotation.rotate(endpoint);
            beta_sum -= sign * (line_offset + line_normal.dot(&rotated));
            beta_count += 1.0;

            let along = axis.dot(&rotated);
            obs_lo = obs_lo.min(along);
            obs_hi = obs_hi.max(along);
        }

        range = range.intersect(&ShiftRange::containing(map_lo, map_hi, obs_lo, obs_hi));
    }

    let beta = beta_sum / beta_count;
    let range = range.normalized();
    let position_at = |alpha: f32| {
        Point2D::new(
            alpha * axis.x + beta * normal_axis.x,
            alpha * axis.y + beta * normal_axis.y,
        )
    };

    let start = position_at(range.min);
    let end = position_at(range.max);
    PoseHypothesisInterval {
        start: Pose2D::new(start.x, start.y, theta),
        end: Pose2D::new(end.x, end.y, theta),
        correspondences: slots,
    }
}
