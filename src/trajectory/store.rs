//! Fixed-size station table
//!
//! Sized once from the raw survey and never resized or reordered. The
//! integration pass writes derived columns through `rows_mut`, which is
//! crate-private so a processed well can only hand out shared slices.

use crate::types::StationRecord;

use super::ProcessingMode;

#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryStore {
    rows: Vec<StationRecord>,
}

impl TrajectoryStore {
    /// Build the table from raw triples, routing columns by mode.
    ///
    /// Row 0 altitude is set to the head altitude; all other derived
    /// columns stay zero until the integration pass.
    pub fn from_raw(mode: ProcessingMode, stations: &[[f64; 3]], head_altitude: f64) -> Self {
        let mut rows: Vec<StationRecord> = stations
            .iter()
            .map(|&[a, b, c]| match mode {
                ProcessingMode::SurveyAngles => StationRecord {
                    measured_depth: a,
                    inclination_deg: b,
                    azimuth_deg: c,
                    ..StationRecord::default()
                },
                ProcessingMode::Displacement => StationRecord {
                    x_local: a,
                    y_local: b,
                    depth: c,
                    ..StationRecord::default()
                },
            })
            .collect();
        if let Some(first) = rows.first_mut() {
            first.altitude = head_altitude;
        }
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[StationRecord] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [StationRecord] {
        &mut self.rows
    }

    /// (min, max) measured depth, or `None` for an empty table.
    pub fn md_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.rows.iter().map(|r| r.measured_depth);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), md| (lo.min(md), hi.max(md))))
    }
}
