//! Spherical projection of offsets onto the equirectangular panorama.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::DVec3;

/// Spherical coordinates of an offset from the viewer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphericalCoords {
    /// Angle in the horizontal plane, counter-clockwise from `+x`, in `(-π, π]`.
    pub azimuth: f64,
    /// Angle above the horizontal plane, in `[-π/2, π/2]`.
    pub elevation: f64,
    /// Euclidean length of the offset.
    pub distance: f64,
}

/// Convert an offset into spherical coordinates.
///
/// Uses two-argument arctangents throughout, so offsets straight up or down
/// (and the zero offset) are well defined.
pub fn project(offset: DVec3) -> SphericalCoords {
    let horizontal = offset.x.hypot(offset.y);
    SphericalCoords {
        azimuth: offset.y.atan2(offset.x),
        elevation: offset.z.atan2(horizontal),
        distance: offset.length(),
    }
}

impl SphericalCoords {
    /// Angle down from the zenith, in `[0, π]`.
    pub fn zenith_angle(&self) -> f64 {
        FRAC_PI_2 - self.elevation
    }

    /// Fractional image row: the zenith maps to row 0, the horizon to
    /// `height / 2`.
    pub fn row(&self, height: u32) -> f64 {
        let h = f64::from(height);
        (h * self.zenith_angle().rem_euclid(PI) / PI).rem_euclid(h)
    }

    /// Fractional image column: azimuth −π maps to column 0 and one full
    /// revolution spans `width` columns.
    pub fn column(&self, width: u32) -> f64 {
        let w = f64::from(width);
        (w * (PI + self.azimuth).rem_euclid(TAU) / TAU).rem_euclid(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_distance_is_norm() {
        let c = project(DVec3::new(3.0, 4.0, 12.0));
        assert!((c.distance - 13.0).abs() < EPS);
    }

    #[test]
    fn test_cardinal_azimuths() {
        assert!(project(DVec3::X).azimuth.abs() < EPS);
        assert!((project(DVec3::Y).azimuth - FRAC_PI_2).abs() < EPS);
        assert!((project(DVec3::NEG_X).azimuth - PI).abs() < EPS);
        assert!((project(DVec3::NEG_Y).azimuth + FRAC_PI_2).abs() < EPS);
    }

    #[test]
    fn test_vertical_offsets_are_stable() {
        let up = project(DVec3::new(0.0, 0.0, 2.0));
        let down = project(DVec3::new(0.0, 0.0, -2.0));
        assert!((up.elevation - FRAC_PI_2).abs() < EPS);
        assert!((down.elevation + FRAC_PI_2).abs() < EPS);
        assert!(up.azimuth.is_finite() && down.azimuth.is_finite());

        let zero = project(DVec3::ZERO);
        assert_eq!(zero.distance, 0.0);
        assert!(zero.elevation.is_finite());
    }

    #[test]
    fn test_elevation_of_diagonal() {
        let c = project(DVec3::new(1.0, 0.0, 1.0));
        assert!((c.elevation - PI / 4.0).abs() < EPS);
    }

    #[test]
    fn test_rows_zenith_horizon_nadir_side() {
        let height = 10;
        assert!(project(DVec3::new(1e-9, 0.0, 1.0)).row(height) < 1e-6);
        assert!((project(DVec3::X).row(height) - 5.0).abs() < EPS);
        let below = project(DVec3::new(1.0, 0.0, -1.0));
        assert!((below.row(height) - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_columns_span_one_revolution() {
        let width = 36;
        assert!((project(DVec3::X).column(width) - 18.0).abs() < EPS);
        assert!((project(DVec3::Y).column(width) - 27.0).abs() < EPS);
        assert!((project(DVec3::NEG_Y).column(width) - 9.0).abs() < EPS);
        // Straight behind wraps to the first column.
        assert!(project(DVec3::NEG_X).column(width).abs() < EPS);
    }

    #[test]
    fn test_pixel_positions_stay_in_range() {
        for i in 0..64 {
            let a = i as f64 * 0.37;
            let offset = DVec3::new(a.cos(), a.sin(), (a * 1.3).sin());
            let c = project(offset);
            let row = c.row(20);
            let column = c.column(40);
            assert!((0.0..20.0).contains(&row), "row {row}");
            assert!((0.0..40.0).contains(&column), "column {column}");
        }
    }
}
