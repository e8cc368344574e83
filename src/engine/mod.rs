//! Orchestration layer: per-frame matcher and result aggregate.

pub mod matcher;
pub mod result;

pub use matcher::LineMatcher;
pub use result::LineMatchingResult;
