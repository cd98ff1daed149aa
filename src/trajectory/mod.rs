//! Trajectory Engine
//!
//! Reconstructs a borehole path from directional survey stations.
//!
//! ## Pipeline
//! 1. `TrajectoryStore` - fixed-size station table filled from raw input
//! 2. `calculator` - one integration pass (survey-angle or displacement)
//! 3. `interpolator` - MD lookup over the populated table
//! 4. `Well` - owns the store and ties the steps together

pub mod calculator;
pub mod interpolator;
pub mod store;
pub mod well;

pub use calculator::{integrate_displacements, integrate_survey_angles, HeadFrame};
pub use interpolator::TrajectoryInterpolator;
pub use store::TrajectoryStore;
pub use well::{Well, WellSetup};

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geodesy::TransformError;

/// Errors raised while building a well trajectory
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrajectoryError {
    #[error("Invalid processing mode '{0}' (expected MD or XYZ)")]
    InvalidProcessingMode(String),

    #[error("Survey contains no stations")]
    EmptySurvey,

    #[error("Station {index}: measured depth {current} is less than previous {previous}")]
    UnorderedStations { index: usize, previous: f64, current: f64 },

    #[error("Station {index}: value {value} is not a finite number")]
    NonFiniteStation { index: usize, value: f64 },

    #[error("Coordinate transform failed: {0}")]
    Transform(#[from] TransformError),
}

/// How raw station triples are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessingMode {
    /// (measured depth, inclination, azimuth)
    #[serde(rename = "MD")]
    SurveyAngles,
    /// (x, y, vertical depth) offsets
    #[serde(rename = "XYZ")]
    Displacement,
}

impl ProcessingMode {
    pub const fn name(self) -> &'static str {
        match self {
            Self::SurveyAngles => "MD",
            Self::Displacement => "XYZ",
        }
    }
}

impl std::fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProcessingMode {
    type Err = TrajectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("MD") {
            Ok(Self::SurveyAngles)
        } else if trimmed.eq_ignore_ascii_case("XYZ") {
            Ok(Self::Displacement)
        } else {
            Err(TrajectoryError::InvalidProcessingMode(s.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!("MD".parse::<ProcessingMode>(), Ok(ProcessingMode::SurveyAngles));
        assert_eq!(" xyz ".parse::<ProcessingMode>(), Ok(ProcessingMode::Displacement));
    }

    #[test]
    fn test_mode_parse_rejects_unknown() {
        assert_eq!(
            "TVD".parse::<ProcessingMode>(),
            Err(TrajectoryError::InvalidProcessingMode("TVD".to_string()))
        );
        assert!("".parse::<ProcessingMode>().is_err());
    }

    #[test]
    fn test_mode_display_round_trip() {
        for mode in [ProcessingMode::SurveyAngles, ProcessingMode::Displacement] {
            assert_eq!(mode.to_string().parse::<ProcessingMode>(), Ok(mode));
        }
    }
}
