//! Geodesy Module
//!
//! Everything the trajectory engine needs to know about coordinate reference
//! systems: azimuth arithmetic, the coordinate transform capability, and
//! Gauss-Krüger zone resolution.
//!
//! ## Contents
//! - `angles` - azimuth normalization and circular midpoint
//! - `zone` - 6° zone index / zone CRS resolution and meridian convergence
//! - `projection` - built-in transformer for Pulkovo 1942 / WGS 84 / GK zones
//!
//! The engine only ever talks to [`CoordinateTransformer`]; production code
//! wires in [`GaussKrugerTransformer`], tests use small deterministic fakes.

pub mod angles;
pub mod projection;
pub mod zone;

pub use angles::{circular_midpoint, normalize_azimuth};
pub use projection::{GaussKrugerTransformer, HelmertParams};
pub use zone::{GeodeticZone, GeodeticZoneResolver, ZoneScheme};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// CRS identifiers
// ============================================================================

/// EPSG code of a coordinate reference system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrsId(pub u32);

impl CrsId {
    /// WGS 84 geographic (lon/lat degrees).
    pub const WGS84: Self = Self(4326);
    /// Pulkovo 1942 geographic (lon/lat degrees). Base datum for zone math.
    pub const PULKOVO_1942: Self = Self(4284);
    /// Zone `n` of Pulkovo 1942 / Gauss-Krüger is `ZONE_CRS_BASE + n`.
    pub const ZONE_CRS_BASE: u32 = 28400;

    pub const fn code(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CrsId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

impl From<u32> for CrsId {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

// ============================================================================
// Transform capability
// ============================================================================

/// Errors raised while converting between coordinate reference systems
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Unsupported coordinate reference system: {0}")]
    UnsupportedCrs(CrsId),

    #[error("Gauss-Krüger zone {zone} is outside the supported range 1..=32")]
    ZoneOutOfRange { zone: i64 },

    #[error("Cannot transform non-finite point ({x}, {y})")]
    NonFinite { x: f64, y: f64 },

    #[error("Geodesy operator failed: {0}")]
    Operator(String),
}

/// Planar point transform between two CRS ids.
///
/// Implementations must be pure: the same input always yields the same
/// output, and equal source/target ids return the point unchanged. Cached
/// zone and correction values on a well depend on this.
pub trait CoordinateTransformer: Send + Sync {
    fn transform(
        &self,
        x: f64,
        y: f64,
        source: CrsId,
        target: CrsId,
    ) -> Result<(f64, f64), TransformError>;
}

impl<T: CoordinateTransformer + ?Sized> CoordinateTransformer for &T {
    fn transform(
        &self,
        x: f64,
        y: f64,
        source: CrsId,
        target: CrsId,
    ) -> Result<(f64, f64), TransformError> {
        (**self).transform(x, y, source, target)
    }
}

impl<T: CoordinateTransformer + ?Sized> CoordinateTransformer for std::sync::Arc<T> {
    fn transform(
        &self,
        x: f64,
        y: f64,
        source: CrsId,
        target: CrsId,
    ) -> Result<(f64, f64), TransformError> {
        (**self).transform(x, y, source, target)
    }
}
