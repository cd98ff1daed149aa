//! Export-ready projections of a processed well

use serde::{Deserialize, Serialize};

use crate::geodesy::CrsId;

/// One line of the inclination table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub measured_depth: f64,
    pub inclination_deg: f64,
    /// Geographic azimuth as written to the table
    pub azimuth_deg: f64,
    pub x_global: f64,
    pub y_global: f64,
    pub depth: f64,
    pub altitude: f64,
}

impl ExportRow {
    pub fn values(&self) -> [f64; 7] {
        [
            self.measured_depth,
            self.inclination_deg,
            self.azimuth_deg,
            self.x_global,
            self.y_global,
            self.depth,
            self.altitude,
        ]
    }
}

/// Inclination table plus the two scalars written in its preamble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportTable {
    pub zone_index: u32,
    pub meridian_correction: f64,
    pub magnetic_declination: f64,
    pub rows: Vec<ExportRow>,
}

impl ExportTable {
    /// Column headers; the global columns carry the zone number.
    pub fn header(&self) -> [String; 7] {
        [
            "MD".to_string(),
            "Incl".to_string(),
            "Geo_Az".to_string(),
            format!("x_GK{}", self.zone_index),
            format!("y_GK{}", self.zone_index),
            "Vert_Depth".to_string(),
            "Altitude".to_string(),
        ]
    }
}

/// Plan-view trace of the hole, one vertex per station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizontalTrace {
    pub name: String,
    pub crs_id: CrsId,
    pub points: Vec<(f64, f64)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_carries_zone() {
        let t = ExportTable { zone_index: 7, meridian_correction: 0.0, magnetic_declination: 0.0, rows: vec![] };
        let h = t.header();
        assert_eq!(h[3], "x_GK7");
        assert_eq!(h[4], "y_GK7");
        assert_eq!(h.join("\t"), "MD\tIncl\tGeo_Az\tx_GK7\ty_GK7\tVert_Depth\tAltitude");
    }
}
