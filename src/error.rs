//! Crate-level error type.

use thiserror::Error;

use crate::attitude::AttitudeError;
use crate::config::ConfigError;
use crate::gti::GtiError;
use crate::observation::SampleError;

/// Any failure surfaced by the map pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AllSkyError {
    #[error("GTI error: {0}")]
    Gti(#[from] GtiError),

    #[error("Attitude error: {0}")]
    Attitude(#[from] AttitudeError),

    #[error("Sample error: {0}")]
    Sample(#[from] SampleError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type AllSkyResult<T> = Result<T, AllSkyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_subsystem_errors() {
        let err: AllSkyError = GtiError::EmptyIntervalSet.into();
        assert_eq!(
            err.to_string(),
            "GTI error: Interval set is empty and no explicit bounds were given"
        );
        let err: AllSkyError = AttitudeError::Empty.into();
        assert!(matches!(err, AllSkyError::Attitude(AttitudeError::Empty)));
    }
}
