//! Well - one processed trajectory
//!
//! Construction does all the work: validate the input, fill the station
//! table, resolve the Gauss-Krüger zone, run the integration matching the
//! processing mode. A `Well` value is always fully processed and only offers
//! read access afterwards.

use tracing::{debug, info};

use crate::geodesy::{
    normalize_azimuth, zone::ZoneScheme, CoordinateTransformer, CrsId, GeodeticZone,
    GeodeticZoneResolver,
};
use crate::types::{
    ExportRow, ExportTable, HorizontalTrace, PointInterpolation, StationRecord, TrajectoryPoint,
    WellHead,
};

use super::{
    calculator::{integrate_displacements, integrate_survey_angles, HeadFrame},
    ProcessingMode, TrajectoryError, TrajectoryInterpolator, TrajectoryStore,
};

/// Immutable inputs of a well.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WellSetup {
    pub head: WellHead,
    /// CRS the head coordinates are given in
    pub crs_id: CrsId,
    /// Magnetic to true north (degrees). Ignored in displacement mode.
    pub magnetic_declination: f64,
    pub mode: ProcessingMode,
    pub zones: ZoneScheme,
}

impl WellSetup {
    pub fn new(head: WellHead, crs_id: CrsId, magnetic_declination: f64, mode: ProcessingMode) -> Self {
        Self {
            head,
            crs_id,
            magnetic_declination,
            mode,
            zones: ZoneScheme::default(),
        }
    }

    #[must_use]
    pub fn with_zones(mut self, zones: ZoneScheme) -> Self {
        self.zones = zones;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Well {
    head: WellHead,
    source_crs_id: CrsId,
    mode: ProcessingMode,
    magnetic_declination: f64,
    zone: GeodeticZone,
    meridian_correction: f64,
    head_in_zone: (f64, f64),
    store: TrajectoryStore,
}

impl Well {
    /// Process a survey into a trajectory.
    pub fn new(
        setup: WellSetup,
        stations: &[[f64; 3]],
        transformer: &dyn CoordinateTransformer,
    ) -> Result<Self, TrajectoryError> {
        if stations.is_empty() {
            return Err(TrajectoryError::EmptySurvey);
        }
        check_finite(stations)?;
        if setup.mode == ProcessingMode::SurveyAngles {
            check_md_order(stations)?;
        }

        let magnetic_declination = match setup.mode {
            ProcessingMode::SurveyAngles => setup.magnetic_declination,
            ProcessingMode::Displacement => 0.0,
        };
        let mut store = TrajectoryStore::from_raw(setup.mode, stations, setup.head.altitude);

        let resolver = GeodeticZoneResolver::new(
            transformer,
            (setup.head.x, setup.head.y),
            setup.crs_id,
            setup.zones,
        );
        let zone = resolver.zone()?;
        let meridian_correction = resolver.meridian_correction()?;
        let head_in_zone = transformer.transform(setup.head.x, setup.head.y, setup.crs_id, zone.crs_id)?;

        let frame = HeadFrame {
            x_global: head_in_zone.0,
            y_global: head_in_zone.1,
            altitude: setup.head.altitude,
        };
        match setup.mode {
            ProcessingMode::SurveyAngles => {
                integrate_survey_angles(&mut store, frame, magnetic_declination - meridian_correction);
            }
            ProcessingMode::Displacement => {
                integrate_displacements(&mut store, frame, meridian_correction);
            }
        }

        info!(
            mode = %setup.mode,
            stations = store.len(),
            zone = zone.index,
            crs = %zone.crs_id,
            meridian_correction,
            "Well trajectory processed"
        );

        Ok(Self {
            head: setup.head,
            source_crs_id: setup.crs_id,
            mode: setup.mode,
            magnetic_declination,
            zone,
            meridian_correction,
            head_in_zone,
            store,
        })
    }

    /// Same as [`Well::new`] with the mode given by name (`MD` / `XYZ`).
    ///
    /// An unknown name fails before the transformer is touched.
    pub fn from_mode_name(
        head: WellHead,
        crs_id: CrsId,
        magnetic_declination: f64,
        mode_name: &str,
        stations: &[[f64; 3]],
        transformer: &dyn CoordinateTransformer,
    ) -> Result<Self, TrajectoryError> {
        let mode: ProcessingMode = mode_name.parse()?;
        Self::new(WellSetup::new(head, crs_id, magnetic_declination, mode), stations, transformer)
    }

    // === Accessors ===

    pub fn processing_mode(&self) -> ProcessingMode {
        self.mode
    }

    pub fn head(&self) -> WellHead {
        self.head
    }

    pub fn source_crs_id(&self) -> CrsId {
        self.source_crs_id
    }

    /// Effective declination; always zero in displacement mode.
    pub fn magnetic_declination(&self) -> f64 {
        self.magnetic_declination
    }

    pub fn zone_index(&self) -> u32 {
        self.zone.index
    }

    pub fn zone_crs_id(&self) -> CrsId {
        self.zone.crs_id
    }

    /// Convergence of meridians at the head (degrees).
    pub fn meridian_correction(&self) -> f64 {
        self.meridian_correction
    }

    pub fn total_angle_correction(&self) -> f64 {
        self.magnetic_declination - self.meridian_correction
    }

    /// Head (x, y) in the zone CRS.
    pub fn head_in_zone(&self) -> (f64, f64) {
        self.head_in_zone
    }

    pub fn stations(&self) -> &[StationRecord] {
        self.store.rows()
    }

    // === Queries ===

    pub fn interpolate(&self, md: f64) -> Option<TrajectoryPoint> {
        TrajectoryInterpolator::new(&self.store).interpolate(md)
    }

    pub fn interpolate_points<S: AsRef<str>>(&self, points: &[(S, f64)]) -> Vec<PointInterpolation> {
        let located = TrajectoryInterpolator::new(&self.store).interpolate_points(points);
        debug!(requested = points.len(), located = located.len(), "Interpolated MD points");
        located
    }

    /// Inclination table for export.
    ///
    /// In survey-angle mode the exported azimuth is rebuilt from the stored
    /// grid azimuth as `internal - total_correction + declination`.
    pub fn export_table(&self) -> ExportTable {
        let total = self.total_angle_correction();
        let rows = self
            .store
            .rows()
            .iter()
            .map(|r| {
                let azimuth_deg = match self.mode {
                    ProcessingMode::SurveyAngles => {
                        normalize_azimuth(r.azimuth_deg - total + self.magnetic_declination)
                    }
                    ProcessingMode::Displacement => r.azimuth_deg,
                };
                ExportRow {
                    measured_depth: r.measured_depth,
                    inclination_deg: r.inclination_deg,
                    azimuth_deg,
                    x_global: r.x_global,
                    y_global: r.y_global,
                    depth: r.depth,
                    altitude: r.altitude,
                }
            })
            .collect();
        ExportTable {
            zone_index: self.zone.index,
            meridian_correction: self.meridian_correction,
            magnetic_declination: self.magnetic_declination,
            rows,
        }
    }

    /// Plan-view polyline in the zone CRS.
    pub fn horizontal_trace(&self, name: &str) -> HorizontalTrace {
        HorizontalTrace {
            name: name.to_string(),
            crs_id: self.zone.crs_id,
            points: self.store.rows().iter().map(|r| (r.x_global, r.y_global)).collect(),
        }
    }
}

fn check_finite(stations: &[[f64; 3]]) -> Result<(), TrajectoryError> {
    for (index, station) in stations.iter().enumerate() {
        if let Some(&value) = station.iter().find(|v| !v.is_finite()) {
            return Err(TrajectoryError::NonFiniteStation { index, value });
        }
    }
    Ok(())
}

fn check_md_order(stations: &[[f64; 3]]) -> Result<(), TrajectoryError> {
    for (i, pair) in stations.windows(2).enumerate() {
        let (previous, current) = (pair[0][0], pair[1][0]);
        if current < previous {
            return Err(TrajectoryError::UnorderedStations { index: i + 1, previous, current });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::TransformError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Geographic CRSs pass through; a zone CRS maps (lon, lat) to
    /// (lon·1000, lat·1000).
    struct FakeTransformer {
        calls: AtomicUsize,
    }

    impl FakeTransformer {
        fn new() -> Self {
            Self { calls: AtomicUsize::new(0) }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl CoordinateTransformer for FakeTransformer {
        fn transform(&self, x: f64, y: f64, source: CrsId, target: CrsId) -> Result<(f64, f64), TransformError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if source == target || target.code() < CrsId::ZONE_CRS_BASE {
                Ok((x, y))
            } else {
                Ok((x * 1000.0, y * 1000.0))
            }
        }
    }

    fn head() -> WellHead {
        WellHead::new(40.5, 30.0, 200.0)
    }

    fn survey_well(stations: &[[f64; 3]], declination: f64, t: &FakeTransformer) -> Well {
        let setup = WellSetup::new(head(), CrsId::PULKOVO_1942, declination, ProcessingMode::SurveyAngles);
        Well::new(setup, stations, t).expect("well")
    }

    #[test]
    fn test_zone_and_corrections() {
        let t = FakeTransformer::new();
        let well = survey_well(&[[0.0, 0.0, 0.0]], 5.0, &t);
        assert_eq!(well.zone_index(), 7);
        assert_eq!(well.zone_crs_id(), CrsId(28407));
        assert!((well.meridian_correction() - 0.75).abs() < 1e-12);
        assert!((well.total_angle_correction() - 4.25).abs() < 1e-12);
        assert_eq!(well.head_in_zone(), (40_500.0, 30_000.0));
    }

    #[test]
    fn test_head_invariants() {
        let t = FakeTransformer::new();
        let well = survey_well(&[[0.0, 0.0, 0.0], [100.0, 3.0, 45.0]], 0.0, &t);
        let r0 = well.stations()[0];
        assert_eq!(r0.altitude, 200.0);
        assert_eq!((r0.x_global, r0.y_global), well.head_in_zone());
    }

    #[test]
    fn test_transformer_calls_bounded() {
        let t = FakeTransformer::new();
        let well = survey_well(&[[0.0, 0.0, 0.0], [10.0, 1.0, 1.0]], 0.0, &t);
        // base-CRS head once, zone-CRS head once
        assert_eq!(t.calls(), 2);
        let _ = (well.zone_index(), well.zone_crs_id(), well.meridian_correction(), well.export_table());
        assert_eq!(t.calls(), 2);
    }

    #[test]
    fn test_invalid_mode_before_numeric_work() {
        let t = FakeTransformer::new();
        let err = Well::from_mode_name(head(), CrsId::PULKOVO_1942, 0.0, "TVD", &[[0.0, 0.0, 0.0]], &t)
            .expect_err("mode must be rejected");
        assert_eq!(err, TrajectoryError::InvalidProcessingMode("TVD".to_string()));
        assert_eq!(t.calls(), 0);
    }

    #[test]
    fn test_empty_and_unordered_survey_rejected() {
        let t = FakeTransformer::new();
        let setup = WellSetup::new(head(), CrsId::PULKOVO_1942, 0.0, ProcessingMode::SurveyAngles);
        assert_eq!(Well::new(setup, &[], &t).expect_err("empty"), TrajectoryError::EmptySurvey);
        let err = Well::new(setup, &[[0.0, 0.0, 0.0], [50.0, 0.0, 0.0], [40.0, 0.0, 0.0]], &t)
            .expect_err("unordered");
        assert!(matches!(err, TrajectoryError::UnorderedStations { index: 2, .. }));
        assert_eq!(t.calls(), 0);
    }

    #[test]
    fn test_non_finite_station_rejected_before_transform() {
        let t = FakeTransformer::new();
        let setup = WellSetup::new(head(), CrsId::PULKOVO_1942, 0.0, ProcessingMode::SurveyAngles);
        // NaN compares false both ways, so the order check alone would let it through
        let err = Well::new(setup, &[[0.0, 0.0, 0.0], [f64::NAN, 0.0, 0.0], [50.0, 0.0, 0.0]], &t)
            .expect_err("nan md");
        assert!(matches!(err, TrajectoryError::NonFiniteStation { index: 1, value } if value.is_nan()));

        let setup = WellSetup::new(head(), CrsId::PULKOVO_1942, 0.0, ProcessingMode::Displacement);
        let err = Well::new(setup, &[[0.0, 0.0, 0.0], [1.0, f64::INFINITY, 2.0]], &t)
            .expect_err("infinite offset");
        assert_eq!(err, TrajectoryError::NonFiniteStation { index: 1, value: f64::INFINITY });
        assert_eq!(t.calls(), 0);
    }

    #[test]
    fn test_displacement_forces_zero_declination() {
        let t = FakeTransformer::new();
        let setup = WellSetup::new(head(), CrsId::PULKOVO_1942, 12.0, ProcessingMode::Displacement);
        let well = Well::new(setup, &[[5.0, 5.0, 1.0], [8.0, 9.0, 1.0]], &t).expect("well");
        assert_eq!(well.magnetic_declination(), 0.0);
        assert!((well.total_angle_correction() + 0.75).abs() < 1e-12);
        assert!((well.stations()[1].measured_depth - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_export_azimuth_returns_survey_plus_declination() {
        let t = FakeTransformer::new();
        let well = survey_well(&[[0.0, 2.0, 358.0], [30.0, 4.0, 10.0]], 5.0, &t);
        let table = well.export_table();
        assert!((table.rows[0].azimuth_deg - 3.0).abs() < 1e-9);
        assert!((table.rows[1].azimuth_deg - 15.0).abs() < 1e-9);
        assert_eq!(table.magnetic_declination, 5.0);
        assert_eq!(table.zone_index, 7);
        // stored azimuths are grid referenced
        assert!((well.stations()[1].azimuth_deg - 14.25).abs() < 1e-9);
    }

    #[test]
    fn test_horizontal_trace() {
        let t = FakeTransformer::new();
        let well = survey_well(&[[0.0, 0.0, 0.0], [10.0, 90.0, 90.0]], 0.0, &t);
        let trace = well.horizontal_trace("W-1");
        assert_eq!(trace.name, "W-1");
        assert_eq!(trace.crs_id, CrsId(28407));
        assert_eq!(trace.points.len(), 2);
        assert_eq!(trace.points[0], (40_500.0, 30_000.0));
    }

    #[test]
    fn test_interpolate_delegates() {
        let t = FakeTransformer::new();
        let well = survey_well(&[[0.0, 0.0, 0.0], [100.0, 0.0, 0.0]], 0.0, &t);
        let p = well.interpolate(25.0).expect("in range");
        assert!((p.depth - 25.0).abs() < 1e-9);
        assert!((p.altitude - 175.0).abs() < 1e-9);
        assert!(well.interpolate(100.5).is_none());
        assert_eq!(well.interpolate_points(&[("a", 50.0), ("b", -1.0)]).len(), 1);
    }
}
