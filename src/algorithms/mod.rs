//! Core algorithms: spherical observation model, correspondence search,
//! and pose hypothesis generation.

pub mod correspondence;
pub mod hypothesis;
pub mod spherical;
