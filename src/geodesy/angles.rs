//! Azimuth arithmetic on the 0-360° circle

/// Wrap any angle (degrees) into `[0, 360)`.
pub fn normalize_azimuth(value: f64) -> f64 {
    let mut r = value % 360.0;
    if r < 0.0 {
        r += 360.0;
    }
    // -1e-14 + 360.0 rounds to 360.0
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Midpoint of two azimuths along the shorter arc.
///
/// When the two headings straddle north (e.g. 10° and 350°) the naive mean
/// points the opposite way, so the seam case walks back from the smaller
/// angle by half the short arc instead.
pub fn circular_midpoint(alpha: f64, beta: f64) -> f64 {
    let diff = (alpha - beta).abs();
    if diff <= 180.0 {
        return (alpha + beta) / 2.0;
    }
    normalize_azimuth(alpha.min(beta) - (360.0 - diff) / 2.0)
}
