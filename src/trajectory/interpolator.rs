//! Measured-depth interpolation over a populated station table

use tracing::debug;

use crate::types::{PointInterpolation, StationRecord, TrajectoryPoint};

use super::TrajectoryStore;

/// Read-only MD lookup over processed stations.
#[derive(Debug, Clone, Copy)]
pub struct TrajectoryInterpolator<'a> {
    store: &'a TrajectoryStore,
    rows: &'a [StationRecord],
}

impl<'a> TrajectoryInterpolator<'a> {
    pub fn new(store: &'a TrajectoryStore) -> Self {
        Self { store, rows: store.rows() }
    }

    /// Position at `md`, or `None` when `md` lies outside the surveyed span.
    ///
    /// Rows are scanned in table order: the last row shallower than `md` is
    /// the top of the bracket, the first row deeper is the bottom. A row
    /// exactly at `md` is returned as-is.
    pub fn interpolate(&self, md: f64) -> Option<TrajectoryPoint> {
        let (min_md, max_md) = self.store.md_range()?;
        if !(min_md..=max_md).contains(&md) {
            return None;
        }

        let mut top = 0;
        let mut bottom = 0;
        for (i, row) in self.rows.iter().enumerate() {
            if row.measured_depth < md {
                top = i;
            } else if row.measured_depth == md {
                top = i;
                bottom = i;
                break;
            } else {
                bottom = i;
                break;
            }
        }

        let top_row = &self.rows[top];
        if top == bottom {
            return Some(top_row.point());
        }
        let bottom_row = &self.rows[bottom];
        let t = (md - top_row.measured_depth) / (bottom_row.measured_depth - top_row.measured_depth);
        Some(top_row.point().lerp(&bottom_row.point(), t))
    }

    /// Locate labelled MD points; points outside the span are dropped.
    pub fn interpolate_points<S: AsRef<str>>(&self, points: &[(S, f64)]) -> Vec<PointInterpolation> {
        points
            .iter()
            .filter_map(|(label, md)| match self.interpolate(*md) {
                Some(point) => Some(PointInterpolation { label: label.as_ref().to_string(), point }),
                None => {
                    debug!(label = label.as_ref(), md, "MD point outside trajectory, skipped");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::ProcessingMode;

    const EPS: f64 = 1e-9;

    /// Hand-filled table: MD 0/10/30, straight segments.
    fn table() -> TrajectoryStore {
        let mut store = TrajectoryStore::from_raw(
            ProcessingMode::SurveyAngles,
            &[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [30.0, 0.0, 0.0]],
            100.0,
        );
        let rows = store.rows_mut();
        for (row, (x, y, d)) in rows.iter_mut().zip([(0.0, 0.0, 0.0), (2.0, 4.0, 8.0), (12.0, 4.0, 20.0)]) {
            row.x_global = 1000.0 + x;
            row.y_global = 2000.0 + y;
            row.depth = d;
            row.altitude = 100.0 - d;
        }
        store
    }

    #[test]
    fn test_exact_station_passthrough() {
        let store = table();
        let interp = TrajectoryInterpolator::new(&store);
        for row in store.rows() {
            assert_eq!(interp.interpolate(row.measured_depth), Some(row.point()));
        }
    }

    #[test]
    fn test_between_stations_is_linear() {
        let store = table();
        let interp = TrajectoryInterpolator::new(&store);
        let p = interp.interpolate(20.0).expect("in range");
        assert!((p.measured_depth - 20.0).abs() < EPS);
        assert!((p.x_global - 1007.0).abs() < EPS);
        assert!((p.y_global - 2004.0).abs() < EPS);
        assert!((p.depth - 14.0).abs() < EPS);
        assert!((p.altitude - 86.0).abs() < EPS);
    }

    #[test]
    fn test_linearity_over_segment() {
        let store = table();
        let interp = TrajectoryInterpolator::new(&store);
        let a = store.rows()[0].point();
        let b = store.rows()[1].point();
        for k in 0..=10 {
            let alpha = f64::from(k) / 10.0;
            let md = alpha * a.measured_depth + (1.0 - alpha) * b.measured_depth;
            let p = interp.interpolate(md).expect("in range");
            let expected = b.lerp(&a, alpha);
            assert!((p.x_global - expected.x_global).abs() < EPS);
            assert!((p.y_global - expected.y_global).abs() < EPS);
            assert!((p.depth - expected.depth).abs() < EPS);
            assert!((p.altitude - expected.altitude).abs() < EPS);
        }
    }

    #[test]
    fn test_out_of_range_is_none() {
        let store = table();
        let interp = TrajectoryInterpolator::new(&store);
        assert_eq!(interp.interpolate(-0.1), None);
        assert_eq!(interp.interpolate(30.0001), None);
        assert_eq!(interp.interpolate(f64::NAN), None);
    }

    #[test]
    fn test_empty_table_is_none() {
        let store = TrajectoryStore::from_raw(ProcessingMode::SurveyAngles, &[], 0.0);
        assert_eq!(TrajectoryInterpolator::new(&store).interpolate(0.0), None);
    }

    #[test]
    fn test_duplicate_md_takes_first_exact_row() {
        let mut store = TrajectoryStore::from_raw(
            ProcessingMode::SurveyAngles,
            &[[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [10.0, 0.0, 0.0], [20.0, 0.0, 0.0]],
            0.0,
        );
        store.rows_mut()[1].x_global = 1.0;
        store.rows_mut()[2].x_global = 2.0;
        let interp = TrajectoryInterpolator::new(&store);
        assert_eq!(interp.interpolate(10.0).expect("exact").x_global, 1.0);
    }

    #[test]
    fn test_points_outside_range_omitted() {
        let store = table();
        let interp = TrajectoryInterpolator::new(&store);
        let result = interp.interpolate_points(&[("top", 0.0), ("deep", 99.0), ("mid", 20.0)]);
        let labels: Vec<&str> = result.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["top", "mid"]);
    }
}
