//! Inclinometry: borehole trajectory reconstruction
//!
//! Turns directional survey stations into a well path in Gauss-Krüger zone
//! coordinates.
//!
//! ## Architecture
//!
//! - **Geodesy**: CRS ids, the coordinate transform capability, zone and
//!   meridian-convergence resolution, a built-in Pulkovo 1942 / GK transformer
//! - **Trajectory**: station table, integration passes, MD interpolation and
//!   the `Well` that ties them together
//! - **Survey I/O**: tab-delimited import, table and GeoJSON export
//! - **Config**: TOML-backed geodesy, export and survey defaults

pub mod config;
pub mod geodesy;
pub mod survey_io;
pub mod trajectory;
pub mod types;

// Re-export configuration
pub use config::SurveyConfig;

// Re-export geodesy
pub use crate::geodesy::{
    CoordinateTransformer, CrsId, GaussKrugerTransformer, GeodeticZone, TransformError,
};

// Re-export trajectory processing
pub use trajectory::{ProcessingMode, TrajectoryError, Well, WellSetup};

// Re-export commonly used types
pub use types::{
    ExportRow, ExportTable, HorizontalTrace, PointInterpolation, StationRecord,
    TrajectoryPoint, WellHead,
};
