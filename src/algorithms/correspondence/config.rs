//! Configuration for correspondence matching.

use thiserror::Error;

use crate::core::types::SymMatrix2;

/// Invalid matching configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("likelihood threshold must be in (0, 1], got {0}")]
    Threshold(f32),

    #[error("measurement precision matrix must be positive definite")]
    Precision,
}

/// Configuration for the correspondence search.
#[derive(Debug, Clone)]
pub struct MatchingConfig {
    /// Minimum Gaussian likelihood for a correspondence to be accepted.
    pub likelihood_threshold: f32,

    /// Inverse measurement covariance for spherical-coordinate noise
    /// (vertical angle, horizontal angle).
    pub measurement_precision: SymMatrix2,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            likelihood_threshold: 0.2,
            // 0.05 rad standard deviation per spherical axis
            measurement_precision: SymMatrix2::diagonal(400.0, 400.0),
        }
    }
}

impl MatchingConfig {
    /// Check the configuration for values the matcher cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.likelihood_threshold > 0.0 && self.likelihood_threshold <= 1.0) {
            return Err(ConfigError::Threshold(self.likelihood_threshold));
        }
        let p = &self.measurement_precision;
        if p.xx <= 0.0 || p.yy <= 0.0 || p.det() <= 0.0 {
            return Err(ConfigError::Precision);
        }
        Ok(())
    }
}
