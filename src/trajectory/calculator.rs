//! Station-to-station integration
//!
//! Two ways of filling the derived columns of a [`TrajectoryStore`]:
//!
//! - **Survey angles** (average-angle method): each interval is projected
//!   using the mean inclination and the circular-mean azimuth of its two
//!   stations.
//!   ```text
//!   dx = ΔMD · sin(Ī) · sin(Ā)
//!   dy = ΔMD · sin(Ī) · cos(Ā)
//!   dz = ΔMD · cos(Ī)
//!   ```
//! - **Displacements**: local offsets are given; MD is accumulated as the
//!   straight-line length of each interval and the plan offsets are rotated
//!   onto grid north by the meridian convergence.
//!
//! Both leave row 0 at the head and set `altitude = head_altitude - depth`.

use tracing::debug;

use crate::geodesy::{circular_midpoint, normalize_azimuth};

use super::TrajectoryStore;

/// Well head expressed in the zone CRS.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadFrame {
    pub x_global: f64,
    pub y_global: f64,
    pub altitude: f64,
}

/// Average-angle integration of (MD, inclination, azimuth) stations.
///
/// `total_angle_correction` (declination minus convergence, degrees) is added
/// to every azimuth before integration, so the stored azimuths end up grid
/// referenced.
pub fn integrate_survey_angles(store: &mut TrajectoryStore, head: HeadFrame, total_angle_correction: f64) {
    let rows = store.rows_mut();
    for row in rows.iter_mut() {
        row.azimuth_deg = normalize_azimuth(row.azimuth_deg + total_angle_correction);
    }

    let Some(first) = rows.first_mut() else {
        return;
    };
    first.x_global = head.x_global;
    first.y_global = head.y_global;

    for i in 1..rows.len() {
        let prev = rows[i - 1];
        let cur = &mut rows[i];

        let mid_az = circular_midpoint(prev.azimuth_deg, cur.azimuth_deg).to_radians();
        let mid_incl = ((prev.inclination_deg + cur.inclination_deg) / 2.0).to_radians();
        let delta_md = cur.measured_depth - prev.measured_depth;

        let dx = delta_md * mid_incl.sin() * mid_az.sin();
        let dy = delta_md * mid_incl.sin() * mid_az.cos();
        let dz = delta_md * mid_incl.cos();

        cur.x_local = prev.x_local + dx;
        cur.y_local = prev.y_local + dy;
        cur.depth = prev.depth + dz;
        cur.x_global = cur.x_local + head.x_global;
        cur.y_global = cur.y_local + head.y_global;
        cur.altitude = head.altitude - cur.depth;
    }

    if let Some(last) = rows.last() {
        debug!(
            stations = rows.len(),
            final_md = last.measured_depth,
            final_depth = last.depth,
            "Survey-angle integration complete"
        );
    }
}

/// Integration of (x, y, depth) displacement stations.
///
/// `meridian_correction` is the convergence angle in degrees; plan offsets
/// are rotated by it before being placed on the head's zone coordinates.
pub fn integrate_displacements(store: &mut TrajectoryStore, head: HeadFrame, meridian_correction: f64) {
    let rows = store.rows_mut();
    let Some(&origin) = rows.first() else {
        return;
    };
    for row in rows.iter_mut() {
        row.x_local -= origin.x_local;
        row.y_local -= origin.y_local;
        row.depth -= origin.depth;
    }

    let first = &mut rows[0];
    first.x_global = head.x_global;
    first.y_global = head.y_global;
    first.measured_depth = 0.0;

    let (sin_r, cos_r) = meridian_correction.to_radians().sin_cos();
    for i in 1..rows.len() {
        let prev = rows[i - 1];
        let cur = &mut rows[i];

        let dx = cur.x_local - prev.x_local;
        let dy = cur.y_local - prev.y_local;
        let dz = cur.depth - prev.depth;
        cur.measured_depth = prev.measured_depth + (dx * dx + dy * dy + dz * dz).sqrt();

        let x_rot = cur.x_local * cos_r - cur.y_local * sin_r;
        let y_rot = cur.x_local * sin_r + cur.y_local * cos_r;
        cur.x_global = head.x_global + x_rot;
        cur.y_global = head.y_global + y_rot;
        cur.altitude = head.altitude - cur.depth;
    }

    if let Some(last) = rows.last() {
        debug!(
            stations = rows.len(),
            total_md = last.measured_depth,
            final_depth = last.depth,
            "Displacement integration complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::ProcessingMode;

    const EPS: f64 = 1e-9;

    fn head() -> HeadFrame {
        HeadFrame { x_global: 7_413_000.0, y_global: 6_181_000.0, altitude: 150.0 }
    }

    fn survey(stations: &[[f64; 3]]) -> TrajectoryStore {
        TrajectoryStore::from_raw(ProcessingMode::SurveyAngles, stations, head().altitude)
    }

    fn displacement(stations: &[[f64; 3]]) -> TrajectoryStore {
        TrajectoryStore::from_raw(ProcessingMode::Displacement, stations, head().altitude)
    }

    #[test]
    fn test_single_station_only_places_head() {
        let mut store = survey(&[[0.0, 0.0, 0.0]]);
        integrate_survey_angles(&mut store, head(), 0.0);
        let r0 = store.rows()[0];
        assert_eq!(r0.x_global, head().x_global);
        assert_eq!(r0.y_global, head().y_global);
        assert_eq!(r0.altitude, 150.0);
        assert_eq!((r0.x_local, r0.y_local, r0.depth), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_vertical_hole() {
        let mut store = survey(&[[0.0, 0.0, 0.0], [120.0, 0.0, 0.0]]);
        integrate_survey_angles(&mut store, head(), 0.0);
        let r1 = store.rows()[1];
        assert!(r1.x_local.abs() < EPS && r1.y_local.abs() < EPS);
        assert!((r1.depth - 120.0).abs() < EPS);
        assert!((r1.altitude - 30.0).abs() < EPS);
        assert!((r1.x_global - head().x_global).abs() < EPS);
    }

    #[test]
    fn test_horizontal_due_east() {
        let mut store = survey(&[[0.0, 90.0, 90.0], [50.0, 90.0, 90.0]]);
        integrate_survey_angles(&mut store, head(), 0.0);
        let r1 = store.rows()[1];
        assert!((r1.x_local - 50.0).abs() < EPS);
        assert!(r1.y_local.abs() < EPS);
        assert!(r1.depth.abs() < EPS);
        assert!((r1.altitude - 150.0).abs() < EPS);
    }

    #[test]
    fn test_interval_uses_mean_inclination() {
        // 0° to 60° gives a 30° interval
        let mut store = survey(&[[0.0, 0.0, 0.0], [100.0, 60.0, 0.0]]);
        integrate_survey_angles(&mut store, head(), 0.0);
        let r1 = store.rows()[1];
        assert!((r1.y_local - 50.0).abs() < EPS, "north {}", r1.y_local);
        assert!((r1.depth - 100.0 * 30f64.to_radians().cos()).abs() < EPS);
    }

    #[test]
    fn test_azimuth_across_north_goes_north() {
        let mut store = survey(&[[0.0, 90.0, 350.0], [10.0, 90.0, 10.0]]);
        integrate_survey_angles(&mut store, head(), 0.0);
        let r1 = store.rows()[1];
        assert!((r1.y_local - 10.0).abs() < EPS);
        assert!(r1.x_local.abs() < EPS);
    }

    #[test]
    fn test_correction_applied_to_stored_azimuth() {
        let mut store = survey(&[[0.0, 10.0, 355.0], [10.0, 10.0, 5.0]]);
        integrate_survey_angles(&mut store, head(), 10.0);
        assert!((store.rows()[0].azimuth_deg - 5.0).abs() < EPS);
        assert!((store.rows()[1].azimuth_deg - 15.0).abs() < EPS);
    }

    #[test]
    fn test_displacement_zero_shift() {
        let mut store = displacement(&[[100.0, 200.0, 5.0], [103.0, 204.0, 5.0]]);
        integrate_displacements(&mut store, head(), 0.0);
        let r0 = store.rows()[0];
        assert_eq!((r0.x_local, r0.y_local, r0.depth), (0.0, 0.0, 0.0));
        assert_eq!(r0.measured_depth, 0.0);
        assert_eq!(r0.x_global, head().x_global);
        let r1 = store.rows()[1];
        assert!((r1.measured_depth - 5.0).abs() < EPS);
        assert!((r1.x_global - (head().x_global + 3.0)).abs() < EPS);
        assert!((r1.y_global - (head().y_global + 4.0)).abs() < EPS);
    }

    #[test]
    fn test_displacement_md_accumulates() {
        let mut store = displacement(&[[0.0, 0.0, 0.0], [3.0, 4.0, 0.0], [3.0, 4.0, 12.0]]);
        integrate_displacements(&mut store, head(), 0.0);
        assert!((store.rows()[2].measured_depth - 17.0).abs() < EPS);
        assert!((store.rows()[2].altitude - 138.0).abs() < EPS);
    }

    #[test]
    fn test_displacement_rotation() {
        let mut store = displacement(&[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]]);
        integrate_displacements(&mut store, head(), 90.0);
        let r1 = store.rows()[1];
        assert!((r1.x_global - head().x_global).abs() < 1e-6);
        assert!((r1.y_global - (head().y_global + 10.0)).abs() < 1e-6);
        // locals stay unrotated
        assert_eq!(r1.x_local, 10.0);
        assert_eq!(r1.inclination_deg, 0.0);
        assert_eq!(r1.azimuth_deg, 0.0);
    }

    #[test]
    fn test_empty_store_is_noop() {
        let mut store = survey(&[]);
        integrate_survey_angles(&mut store, head(), 1.0);
        integrate_displacements(&mut store, head(), 1.0);
        assert!(store.is_empty());
    }
}
