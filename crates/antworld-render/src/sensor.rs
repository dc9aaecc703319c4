//! The direction grid sampled by the eye for the sky half of a panorama.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use antworld_sky::SkyDirection;

/// One direction per pixel of the upper half of a `width × height` panorama.
///
/// Directions are azimuth-major: all elevations of the first column, then
/// all elevations of the second, and so on.
#[derive(Clone, Debug)]
pub struct SensorGrid {
    columns: u32,
    rows: u32,
    directions: Vec<SkyDirection>,
}

impl SensorGrid {
    /// Azimuths start at −π in steps of 2π/width (π itself is excluded).
    /// Elevations start at the zenith in steps of π/height (the horizon is
    /// excluded).
    pub fn new(width: u32, height: u32) -> Self {
        let rows = height / 2;
        let azimuth_step = TAU / f64::from(width.max(1));
        let elevation_step = FRAC_PI_2 / f64::from(rows.max(1));

        let mut directions = Vec::with_capacity(width as usize * rows as usize);
        for column in 0..width {
            let azimuth = -PI + f64::from(column) * azimuth_step;
            for row in 0..rows {
                let elevation = FRAC_PI_2 - f64::from(row) * elevation_step;
                directions.push(SkyDirection::new(azimuth, elevation));
            }
        }

        Self {
            columns: width,
            rows,
            directions,
        }
    }

    pub fn directions(&self) -> &[SkyDirection] {
        &self.directions
    }

    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of sky rows, `height / 2`.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// `(column, row)` of the pixel fed by direction `index`.
    pub fn pixel(&self, index: usize) -> (u32, u32) {
        let rows = self.rows.max(1) as usize;
        ((index / rows) as u32, (index % rows) as u32)
    }
}
