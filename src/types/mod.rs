//! Shared data structures for trajectory reconstruction
//!
//! - `StationRecord`: one row of the trajectory table
//! - `TrajectoryPoint` / `PointInterpolation`: positions along the hole
//! - `WellHead`: head position in the source CRS
//! - `ExportTable` / `HorizontalTrace`: export projections of a processed well

mod station;
mod export;

pub use station::*;
pub use export::*;
