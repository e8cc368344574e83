//! Field-line correspondence engine for humanoid robot self-localization.
//!
//! Given the field lines observed by the robot's cameras in one frame and
//! a known map of field lines, this crate decides which candidate robot
//! poses are geometrically consistent with the observation. Fully
//! determined configurations become unique pose hypotheses; parallel-only
//! configurations become explicit pose ambiguity intervals for a
//! higher-level estimator to resolve.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    engine/                          │  ← Per-frame orchestration
//! │          (LineMatcher, LineMatchingResult)          │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                  algorithms/                        │  ← Core algorithms
//! │      (spherical, correspondence, hypothesis)        │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │                 (types, math)                       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Per-frame flow
//!
//! 1. The vision collaborator fills observations into a
//!    [`LineMatchingResult`] (after [`LineMatchingResult::reset`]).
//! 2. The engine caches the spherical projections once per frame.
//! 3. For each candidate pose the correspondence search assigns observed
//!    lines to map lines under a Gaussian acceptance rule.
//! 4. The hypothesis generator turns accepted sets into unique poses or
//!    ambiguity intervals; a single-line frame only raises a flag.
//! 5. The pose tracker consumes the aggregate read-only.

pub mod algorithms;
pub mod core;
pub mod engine;

// Core types
pub use crate::core::math;
pub use crate::core::types::{
    CorrespondenceSlots, FieldLine, Point2D, Pose2D, PoseCovariance, SymMatrix2,
    MAX_LINE_OBSERVATIONS,
};

// Algorithms - spherical observation model
pub use algorithms::spherical::{
    project_line, project_line_absolute, project_point, project_point_absolute, SphericalLine,
    SphericalPoint,
};

// Algorithms - correspondence search
pub use algorithms::correspondence::{
    find_correspondences, ConfigError, Correspondence, EndpointOrder, MatchingConfig,
};

// Algorithms - hypothesis generation
pub use algorithms::hypothesis::{
    generate, project_point_to_field_line, project_point_to_field_line_absolute,
    HypothesisOutcome, PoseHypothesis, PoseHypothesisInterval,
};

// Engine
pub use engine::{LineMatcher, LineMatchingResult};
