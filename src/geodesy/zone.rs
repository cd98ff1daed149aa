//! Gauss-Krüger zone resolution and meridian convergence
//!
//! A well head is assigned to one of the 6°-wide longitudinal bands of the
//! Pulkovo 1942 / Gauss-Krüger family. The zone is derived from the head
//! longitude in the base geographic CRS:
//!
//! ```text
//! zone_index       = floor((lon + 6) / 6)
//! zone_crs_id      = ZONE_CRS_BASE + zone_index
//! central_meridian = 6 * zone_index - 3
//! convergence      = (lon - central_meridian) * sin(lat)
//! ```
//!
//! The base-CRS head position and the zone are resolved once and cached, so
//! repeated queries never go back to the transformer.

use std::cell::OnceCell;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CoordinateTransformer, CrsId, TransformError};

/// Width of one Gauss-Krüger zone in degrees of longitude.
pub const ZONE_WIDTH_DEG: f64 = 6.0;

/// Highest zone of the Pulkovo 1942 / Gauss-Krüger family (EPSG 28401..=28432).
pub const MAX_ZONE: u32 = 32;

/// Which base CRS and zone CRS family a resolver works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneScheme {
    /// Geographic CRS the zone math is evaluated in.
    pub base_crs_id: CrsId,
    /// Zone `n` maps to CRS `zone_crs_base + n`.
    pub zone_crs_base: u32,
}

impl Default for ZoneScheme {
    fn default() -> Self {
        Self {
            base_crs_id: CrsId::PULKOVO_1942,
            zone_crs_base: CrsId::ZONE_CRS_BASE,
        }
    }
}

/// A resolved 6° zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticZone {
    pub index: u32,
    pub crs_id: CrsId,
}

impl GeodeticZone {
    /// Longitude of the zone's central meridian (degrees).
    pub fn central_meridian(&self) -> f64 {
        ZONE_WIDTH_DEG * f64::from(self.index) - 3.0
    }
}

/// Zone index for a base-CRS longitude.
pub fn zone_index_for_longitude(lon: f64) -> Result<u32, TransformError> {
    let raw = ((lon + ZONE_WIDTH_DEG) / ZONE_WIDTH_DEG).floor();
    if !raw.is_finite() {
        return Err(TransformError::NonFinite { x: lon, y: 0.0 });
    }
    #[allow(clippy::cast_possible_truncation)]
    let zone = raw as i64;
    u32::try_from(zone)
        .ok()
        .filter(|z| (1..=MAX_ZONE).contains(z))
        .ok_or(TransformError::ZoneOutOfRange { zone })
}

/// Resolves and memoizes the zone of one well head.
pub struct GeodeticZoneResolver<'t> {
    transformer: &'t dyn CoordinateTransformer,
    head: (f64, f64),
    source_crs_id: CrsId,
    scheme: ZoneScheme,
    base_head: OnceCell<(f64, f64)>,
    zone: OnceCell<GeodeticZone>,
}

impl<'t> GeodeticZoneResolver<'t> {
    pub fn new(
        transformer: &'t dyn CoordinateTransformer,
        head: (f64, f64),
        source_crs_id: CrsId,
        scheme: ZoneScheme,
    ) -> Self {
        Self {
            transformer,
            head,
            source_crs_id,
            scheme,
            base_head: OnceCell::new(),
            zone: OnceCell::new(),
        }
    }

    /// Head position in the base geographic CRS (lon, lat).
    pub fn base_head(&self) -> Result<(f64, f64), TransformError> {
        if let Some(p) = self.base_head.get() {
            return Ok(*p);
        }
        let (x, y) = self.head;
        let p = self
            .transformer
            .transform(x, y, self.source_crs_id, self.scheme.base_crs_id)?;
        Ok(*self.base_head.get_or_init(|| p))
    }

    pub fn zone(&self) -> Result<GeodeticZone, TransformError> {
        if let Some(z) = self.zone.get() {
            return Ok(*z);
        }
        let (lon, _) = self.base_head()?;
        let index = zone_index_for_longitude(lon)?;
        let zone = GeodeticZone {
            index,
            crs_id: CrsId(self.scheme.zone_crs_base + index),
        };
        debug!(zone = index, crs = %zone.crs_id, lon, "Resolved Gauss-Krüger zone");
        Ok(*self.zone.get_or_init(|| zone))
    }

    pub fn zone_index(&self) -> Result<u32, TransformError> {
        Ok(self.zone()?.index)
    }

    pub fn zone_crs_id(&self) -> Result<CrsId, TransformError> {
        Ok(self.zone()?.crs_id)
    }

    /// Convergence of meridians at the head, degrees.
    pub fn meridian_correction(&self) -> Result<f64, TransformError> {
        let zone = self.zone()?;
        let (lon, lat) = self.base_head()?;
        Ok((lon - zone.central_meridian()) * lat.to_radians().sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Treats every CRS as geographic and counts calls.
    struct CountingIdentity {
        calls: AtomicUsize,
    }

    impl CoordinateTransformer for CountingIdentity {
        fn transform(
            &self,
            x: f64,
            y: f64,
            _source: CrsId,
            _target: CrsId,
        ) -> Result<(f64, f64), TransformError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((x, y))
        }
    }

    fn counting() -> CountingIdentity {
        CountingIdentity { calls: AtomicUsize::new(0) }
    }

    #[test]
    fn test_zone_index_bands() {
        assert_eq!(zone_index_for_longitude(0.0), Ok(1));
        assert_eq!(zone_index_for_longitude(5.999), Ok(1));
        assert_eq!(zone_index_for_longitude(37.6), Ok(7));
        assert_eq!(zone_index_for_longitude(54.0), Ok(10));
        assert_eq!(zone_index_for_longitude(179.9), Ok(30));
    }

    #[test]
    fn test_zone_index_stops_at_last_epsg_zone() {
        assert_eq!(zone_index_for_longitude(191.9), Ok(MAX_ZONE));
        assert_eq!(
            zone_index_for_longitude(192.0),
            Err(TransformError::ZoneOutOfRange { zone: 33 })
        );
        assert_eq!(
            zone_index_for_longitude(350.0),
            Err(TransformError::ZoneOutOfRange { zone: 59 })
        );
    }

    #[test]
    fn test_zone_index_west_of_greenwich_rejected() {
        assert_eq!(
            zone_index_for_longitude(-10.0),
            Err(TransformError::ZoneOutOfRange { zone: -1 })
        );
    }

    #[test]
    fn test_zone_crs_id_offset() {
        let t = counting();
        let r = GeodeticZoneResolver::new(&t, (37.6, 55.7), CrsId::PULKOVO_1942, ZoneScheme::default());
        assert_eq!(r.zone_crs_id().expect("zone"), CrsId(28407));
    }

    #[test]
    fn test_zone_is_memoized() {
        let t = counting();
        let r = GeodeticZoneResolver::new(&t, (37.6, 55.7), CrsId::WGS84, ZoneScheme::default());
        let first = r.zone().expect("zone");
        let second = r.zone().expect("zone");
        assert_eq!(first, second);
        assert_eq!(r.zone_index().expect("idx"), 7);
        let _ = r.meridian_correction().expect("gamma");
        assert_eq!(t.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_meridian_correction_formula() {
        let t = counting();
        let r = GeodeticZoneResolver::new(&t, (40.5, 30.0), CrsId::PULKOVO_1942, ZoneScheme::default());
        // zone 7, central meridian 39, sin(30°) = 0.5
        let gamma = r.meridian_correction().expect("gamma");
        assert!((gamma - 0.75).abs() < 1e-12, "got {gamma}");
    }

    #[test]
    fn test_meridian_correction_zero_on_central_meridian() {
        let t = counting();
        let r = GeodeticZoneResolver::new(&t, (39.0, 61.0), CrsId::PULKOVO_1942, ZoneScheme::default());
        assert!(r.meridian_correction().expect("gamma").abs() < 1e-12);
    }
}
