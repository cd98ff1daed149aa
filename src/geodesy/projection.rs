//! Built-in coordinate transformer
//!
//! Covers the CRS families a survey run needs without an external GIS:
//!
//! - EPSG:4284 Pulkovo 1942 geographic (Krassowsky 1940 ellipsoid)
//! - EPSG:4326 WGS 84 geographic
//! - EPSG:28401..28432 Pulkovo 1942 / Gauss-Krüger zone N
//!   (k0 = 1, central meridian 6N-3, false easting N·10⁶ + 500 000)
//!
//! Geographic points are (lon, lat) in degrees; projected points are
//! (easting, northing) in metres. Every CRS pair is turned into one Rust
//! Geodesy operator pipeline routed through Pulkovo 1942 geographic:
//!
//! ```text
//! WGS 84  -> Pulkovo:  cart ellps=WGS84 | helmert inv ... | cart inv ellps=krass
//! Pulkovo -> zone N:   tmerc lon_0=6N-3 x_0=N·1e6+500000 k_0=1 ellps=krass
//! ```

use ::geodesy::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::zone::MAX_ZONE;
use super::{CoordinateTransformer, CrsId, TransformError};

const PULKOVO_ELLIPSOID: &str = "krass";
const WGS84_ELLIPSOID: &str = "WGS84";

// ============================================================================
// Helmert datum shift
// ============================================================================

/// Pulkovo 1942 to WGS 84 shift parameters (coordinate-frame rotation).
///
/// Defaults are the GOST R 51794-2008 values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelmertParams {
    /// Translations (metres)
    pub tx: f64,
    pub ty: f64,
    pub tz: f64,
    /// Rotations (arc-seconds)
    pub rx: f64,
    pub ry: f64,
    pub rz: f64,
    /// Scale difference (parts per million)
    pub scale_ppm: f64,
}

impl Default for HelmertParams {
    fn default() -> Self {
        Self {
            tx: 23.57,
            ty: -140.95,
            tz: -79.8,
            rx: 0.0,
            ry: -0.35,
            rz: -0.79,
            scale_ppm: -0.22,
        }
    }
}

impl HelmertParams {
    /// `helmert` operator arguments, Pulkovo 1942 to WGS 84.
    fn operator_args(&self) -> String {
        format!(
            "x={} y={} z={} rx={} ry={} rz={} s={} convention=coordinate_frame",
            self.tx, self.ty, self.tz, self.rx, self.ry, self.rz, self.scale_ppm
        )
    }
}

// ============================================================================
// Pipeline construction
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CrsKind {
    Pulkovo1942,
    Wgs84,
    GaussKruger { zone: u32 },
}

impl CrsKind {
    fn is_geographic(self) -> bool {
        !matches!(self, Self::GaussKruger { .. })
    }
}

fn tmerc(zone: u32) -> String {
    format!(
        "tmerc lon_0={} x_0={} k_0=1 ellps={PULKOVO_ELLIPSOID}",
        6 * zone - 3,
        u64::from(zone) * 1_000_000 + 500_000
    )
}

/// Transformer for Pulkovo 1942, WGS 84 and Pulkovo 1942 / Gauss-Krüger zones.
///
/// Holds only operator parameters. Each call compiles its pipeline in a
/// short-lived [`Minimal`] context, so the transformer is `Send + Sync`.
#[derive(Debug, Clone)]
pub struct GaussKrugerTransformer {
    datum_shift: HelmertParams,
    zone_crs_base: u32,
}

impl Default for GaussKrugerTransformer {
    fn default() -> Self {
        Self::new(HelmertParams::default(), CrsId::ZONE_CRS_BASE)
    }
}

impl GaussKrugerTransformer {
    pub fn new(datum_shift: HelmertParams, zone_crs_base: u32) -> Self {
        Self { datum_shift, zone_crs_base }
    }

    fn classify(&self, crs: CrsId) -> Result<CrsKind, TransformError> {
        match crs {
            CrsId::PULKOVO_1942 => Ok(CrsKind::Pulkovo1942),
            CrsId::WGS84 => Ok(CrsKind::Wgs84),
            CrsId(code) => match code.checked_sub(self.zone_crs_base) {
                Some(zone) if (1..=MAX_ZONE).contains(&zone) => Ok(CrsKind::GaussKruger { zone }),
                _ => Err(TransformError::UnsupportedCrs(crs)),
            },
        }
    }

    fn steps_to_pulkovo(&self, kind: CrsKind) -> Vec<String> {
        match kind {
            CrsKind::Pulkovo1942 => Vec::new(),
            CrsKind::Wgs84 => vec![
                format!("cart ellps={WGS84_ELLIPSOID}"),
                format!("helmert inv {}", self.datum_shift.operator_args()),
                format!("cart inv ellps={PULKOVO_ELLIPSOID}"),
            ],
            CrsKind::GaussKruger { zone } => vec![format!("{} inv", tmerc(zone))],
        }
    }

    fn steps_from_pulkovo(&self, kind: CrsKind) -> Vec<String> {
        match kind {
            CrsKind::Pulkovo1942 => Vec::new(),
            CrsKind::Wgs84 => vec![
                format!("cart ellps={PULKOVO_ELLIPSOID}"),
                format!("helmert {}", self.datum_shift.operator_args()),
                format!("cart inv ellps={WGS84_ELLIPSOID}"),
            ],
            CrsKind::GaussKruger { zone } => vec![tmerc(zone)],
        }
    }

    /// Operator pipeline for `source -> target`, or `None` for the identity.
    pub fn pipeline(&self, source: CrsId, target: CrsId) -> Result<Option<String>, TransformError> {
        let from = self.classify(source)?;
        let to = self.classify(target)?;
        if from == to {
            return Ok(None);
        }
        let mut steps = self.steps_to_pulkovo(from);
        steps.extend(self.steps_from_pulkovo(to));
        Ok(Some(steps.join(" | ")))
    }
}

impl CoordinateTransformer for GaussKrugerTransformer {
    fn transform(
        &self,
        x: f64,
        y: f64,
        source: CrsId,
        target: CrsId,
    ) -> Result<(f64, f64), TransformError> {
        if source == target {
            return Ok((x, y));
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(TransformError::NonFinite { x, y });
        }
        let Some(definition) = self.pipeline(source, target)? else {
            return Ok((x, y));
        };
        let from = self.classify(source)?;
        let to = self.classify(target)?;

        // geographic coordinates travel as radians
        let input = if from.is_geographic() {
            Coor4D::raw(x.to_radians(), y.to_radians(), 0.0, 0.0)
        } else {
            Coor4D::raw(x, y, 0.0, 0.0)
        };
        let mut data = vec![input];

        let mut ctx = Minimal::new();
        let op = ctx
            .op(&definition)
            .map_err(|e| TransformError::Operator(e.to_string()))?;
        ctx.apply(op, Direction::Fwd, &mut data)
            .map_err(|e| TransformError::Operator(e.to_string()))?;
        debug!(%source, %target, pipeline = %definition, "Applied geodesy pipeline");

        let (ox, oy) = if to.is_geographic() {
            (data[0][0].to_degrees(), data[0][1].to_degrees())
        } else {
            (data[0][0], data[0][1])
        };
        if !ox.is_finite() || !oy.is_finite() {
            return Err(TransformError::NonFinite { x: ox, y: oy });
        }
        Ok((ox, oy))
    }
}
