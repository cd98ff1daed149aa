//! Survey station and trajectory point types

use serde::{Deserialize, Serialize};

/// One survey station: raw survey columns plus everything the integration
/// pass derives from them.
///
/// All fields start at `0.0`; which ones are raw input depends on the
/// processing mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    /// Along-hole distance from the well head (m)
    pub measured_depth: f64,
    /// Angle from vertical (degrees, 0-180)
    pub inclination_deg: f64,
    /// Heading (degrees, 0-360). Grid-corrected once processed in survey-angle mode.
    pub azimuth_deg: f64,

    // === Well-local frame (offsets from the first station) ===
    pub x_local: f64,
    pub y_local: f64,
    /// Vertical depth below the first station (m)
    pub depth: f64,

    /// Head altitude minus depth (m)
    pub altitude: f64,

    // === Zone CRS frame ===
    pub x_global: f64,
    pub y_global: f64,
}

impl StationRecord {
    /// The five columns exported and interpolated along the hole.
    pub fn point(&self) -> TrajectoryPoint {
        TrajectoryPoint {
            measured_depth: self.measured_depth,
            x_global: self.x_global,
            y_global: self.y_global,
            depth: self.depth,
            altitude: self.altitude,
        }
    }
}

/// Position along the hole in the zone CRS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub measured_depth: f64,
    pub x_global: f64,
    pub y_global: f64,
    pub depth: f64,
    pub altitude: f64,
}

impl TrajectoryPoint {
    /// `self + t * (other - self)`, column-wise.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let mix = |a: f64, b: f64| a + t * (b - a);
        Self {
            measured_depth: mix(self.measured_depth, other.measured_depth),
            x_global: mix(self.x_global, other.x_global),
            y_global: mix(self.y_global, other.y_global),
            depth: mix(self.depth, other.depth),
            altitude: mix(self.altitude, other.altitude),
        }
    }
}

/// A named MD point located on the trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointInterpolation {
    pub label: String,
    pub point: TrajectoryPoint,
}

/// Well-head position in the source CRS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WellHead {
    pub x: f64,
    pub y: f64,
    /// Elevation of the head (m)
    pub altitude: f64,
}

impl WellHead {
    pub const fn new(x: f64, y: f64, altitude: f64) -> Self {
        Self { x, y, altitude }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_is_zeroed() {
        let r = StationRecord::default();
        assert_eq!(r.measured_depth, 0.0);
        assert_eq!(r.x_global, 0.0);
        assert_eq!(r.altitude, 0.0);
    }

    #[test]
    fn test_lerp_endpoints_and_middle() {
        let a = TrajectoryPoint { measured_depth: 0.0, x_global: 10.0, y_global: 20.0, depth: 0.0, altitude: 100.0 };
        let b = TrajectoryPoint { measured_depth: 10.0, x_global: 14.0, y_global: 28.0, depth: 8.0, altitude: 92.0 };
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid.measured_depth, 5.0);
        assert_eq!(mid.x_global, 12.0);
        assert_eq!(mid.altitude, 96.0);
    }
}
