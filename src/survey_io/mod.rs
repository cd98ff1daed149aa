//! Survey file I/O
//!
//! Tab-delimited survey and MD-point import, plus the three per-well output
//! artifacts:
//!
//! - `<well>_inclination.dat` - inclination table with correction preamble
//! - `<well>_hor_trace.geojson` - plan-view trace as a LineString feature
//! - `<well>_MD_Points.dat` - labelled MD points located on the trajectory
//!
//! Validation of arity and numerics happens here, so the trajectory engine
//! only ever sees well-formed triples.

pub mod export;
pub mod import;

pub use export::{export_well, ExportSummary, OutputPaths};
pub use import::{ColumnSelector, PointsTable, SurveyTable};

use std::path::PathBuf;

use thiserror::Error;

/// Errors while reading survey or point files
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input has no header line")]
    Empty,

    #[error("Line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("Column not found: {0}")]
    MissingColumn(String),
}

/// Errors while writing output artifacts
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
