//! Compound-eye sampler: one sky sample per ommatidium.

use crate::clock::wrap_angle;
use crate::model::{SkyDirection, SkyModel};
use crate::SkyError;

/// A set of ommatidia looking at the sky.
///
/// Ommatidium directions are in the eye frame. An ommatidium at eye azimuth
/// `a` samples the sky at world azimuth `a - facing_direction`.
#[derive(Clone, Debug)]
pub struct CompoundEye {
    ommatidia: Vec<SkyDirection>,
    pol_filters: bool,
    facing_direction: f64,
}

impl CompoundEye {
    /// Build an eye over the given directions, filters on, facing 0.
    pub fn new(ommatidia: Vec<SkyDirection>) -> Self {
        Self {
            ommatidia,
            pol_filters: true,
            facing_direction: 0.0,
        }
    }

    /// Switch the polarisation filters on or off.
    pub fn activate_pol_filters(&mut self, enabled: bool) {
        self.pol_filters = enabled;
    }

    pub fn pol_filters(&self) -> bool {
        self.pol_filters
    }

    pub fn set_facing_direction(&mut self, facing: f64) {
        self.facing_direction = facing;
    }

    pub fn facing_direction(&self) -> f64 {
        self.facing_direction
    }

    pub fn len(&self) -> usize {
        self.ommatidia.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ommatidia.is_empty()
    }

    /// Sample `sky` once per ommatidium, in construction order.
    ///
    /// With filters on, half of the polarised fraction of the light is
    /// rejected.
    pub fn sample(&self, sky: &dyn SkyModel) -> Result<Vec<[f32; 3]>, SkyError> {
        self.ommatidia
            .iter()
            .map(|omm| {
                let world = SkyDirection::new(
                    wrap_angle(omm.azimuth - self.facing_direction),
                    omm.elevation,
                );
                let mut color = sky.radiance(world)?;
                if self.pol_filters {
                    let transmitted = 1.0 - 0.5 * sky.degree_of_polarisation(world);
                    for channel in &mut color {
                        *channel *= transmitted;
                    }
                }
                Ok(color)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Observer, SkyClock};

    /// Sky whose red channel encodes the sampled azimuth.
    struct AzimuthSky {
        observer: Observer,
        dop: f32,
    }

    impl SkyModel for AzimuthSky {
        fn generate(&mut self) {}
        fn observer(&self) -> &Observer {
            &self.observer
        }
        fn set_clock(&mut self, clock: SkyClock) {
            self.observer.clock = clock;
        }
        fn radiance(&self, direction: SkyDirection) -> Result<[f32; 3], SkyError> {
            Ok([direction.azimuth as f32, 1.0, 1.0])
        }
        fn degree_of_polarisation(&self, _direction: SkyDirection) -> f32 {
            self.dop
        }
    }

    fn sky(dop: f32) -> AzimuthSky {
        AzimuthSky {
            observer: Observer::seville(SkyClock::new(1, 12.0)),
            dop,
        }
    }

    #[test]
    fn test_one_sample_per_ommatidium_in_order() {
        let eye = CompoundEye::new(vec![
            SkyDirection::new(0.1, 0.5),
            SkyDirection::new(0.2, 0.5),
            SkyDirection::new(0.3, 0.5),
        ]);
        let mut eye = eye;
        eye.activate_pol_filters(false);
        let samples = eye.sample(&sky(0.0)).unwrap();
        assert_eq!(samples.len(), 3);
        assert!((samples[0][0] - 0.1).abs() < 1e-6);
        assert!((samples[2][0] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_facing_direction_rotates_samples() {
        let mut eye = CompoundEye::new(vec![SkyDirection::new(0.5, 0.2)]);
        eye.activate_pol_filters(false);
        eye.set_facing_direction(-0.25);
        let samples = eye.sample(&sky(0.0)).unwrap();
        assert!((samples[0][0] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_pol_filters_attenuate() {
        let mut eye = CompoundEye::new(vec![SkyDirection::new(0.0, 0.2)]);
        let filtered = eye.sample(&sky(0.5)).unwrap()[0];
        eye.activate_pol_filters(false);
        let unfiltered = eye.sample(&sky(0.5)).unwrap()[0];
        assert!((filtered[1] - 0.75).abs() < 1e-6);
        assert_eq!(unfiltered[1], 1.0);
    }

    #[test]
    fn test_empty_eye_samples_nothing() {
        let eye = CompoundEye::new(Vec::new());
        assert!(eye.is_empty());
        assert!(eye.sample(&sky(0.0)).unwrap().is_empty());
    }
}
