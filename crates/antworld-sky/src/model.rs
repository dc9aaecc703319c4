//! Sky models: per-direction colour and polarisation.

use std::f64::consts::FRAC_PI_2;

use antworld_config::SkyConfig;
use glam::{DVec3, Vec3};
use tracing::debug;

use crate::clock::{Observer, SkyClock, SunPosition, solar_position, sun_intensity_curve};
use crate::scatter::{
    AtmosphereParams, ScatterSamples, compute_single_scatter, rayleigh_degree_of_polarisation,
};
use crate::SkyError;

/// A viewing direction on the sky sphere.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyDirection {
    /// Counter-clockwise angle from `+x` (east) in radians.
    pub azimuth: f64,
    /// Angle above the horizon in radians.
    pub elevation: f64,
}

impl SkyDirection {
    pub fn new(azimuth: f64, elevation: f64) -> Self {
        Self { azimuth, elevation }
    }

    /// Unit vector in the world frame (`z` up).
    pub fn to_vector(self) -> DVec3 {
        let (sin_e, cos_e) = self.elevation.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        DVec3::new(cos_e * cos_a, cos_e * sin_a, sin_e)
    }

    /// Angular distance from the zenith.
    pub fn zenith_angle(self) -> f64 {
        FRAC_PI_2 - self.elevation
    }
}

/// A source of sky colour for arbitrary directions.
///
/// `generate` recomputes internal state from the observer's clock; sampling
/// only needs shared access, so a model can be read from several renders at
/// once while clock changes require exclusive access.
pub trait SkyModel: Send + Sync {
    /// Recompute the sky state from the observer's current clock.
    fn generate(&mut self);

    /// The observer this sky is computed for.
    fn observer(&self) -> &Observer;

    /// Replace the observation time. Call [`SkyModel::generate`] afterwards.
    fn set_clock(&mut self, clock: SkyClock);

    /// Colour towards `direction`, each channel in `[0, 1]`.
    fn radiance(&self, direction: SkyDirection) -> Result<[f32; 3], SkyError>;

    /// Degree of linear polarisation towards `direction`, in `[0, 1]`.
    fn degree_of_polarisation(&self, direction: SkyDirection) -> f32;

    /// Move the clock to `clock` and regenerate.
    fn refresh(&mut self, clock: SkyClock) {
        self.set_clock(clock);
        self.generate();
    }
}

/// Physically based sky: solar position plus single scattering.
#[derive(Clone, Debug)]
pub struct ScatteringSky {
    observer: Observer,
    params: AtmosphereParams,
    samples: ScatterSamples,
    exposure: f32,
    dop_max: f32,
    sun: SunPosition,
    sun_direction: Vec3,
    sun_factor: f32,
}

/// Sensor altitude above the surface, in meters.
const SENSOR_HEIGHT_M: f32 = 1.7;

impl ScatteringSky {
    /// Create a sky for `observer` and generate it.
    pub fn new(observer: Observer) -> Self {
        let mut sky = Self {
            observer,
            params: AtmosphereParams::default(),
            samples: ScatterSamples::default(),
            exposure: 1.5,
            dop_max: 0.75,
            sun: SunPosition {
                azimuth: 0.0,
                elevation: 0.0,
            },
            sun_direction: Vec3::Z,
            sun_factor: 1.0,
        };
        sky.generate();
        sky
    }

    /// Build the observer and sky from configuration.
    ///
    /// Unset day or time fall back to the system clock.
    pub fn from_config(config: &SkyConfig) -> Result<Self, SkyError> {
        let now = SkyClock::now();
        let clock = SkyClock::new(
            config.day_of_year.unwrap_or(now.day_of_year),
            config.utc_hours.unwrap_or(now.utc_hours),
        );
        let observer = Observer::new(config.latitude_deg, config.longitude_deg, clock)?;
        Ok(Self::new(observer)
            .with_exposure(config.exposure)
            .with_samples(ScatterSamples {
                view: config.scatter_samples.max(1),
                light: config.light_samples.max(1),
            }))
    }

    pub fn with_exposure(mut self, exposure: f32) -> Self {
        self.exposure = exposure;
        self
    }

    pub fn with_samples(mut self, samples: ScatterSamples) -> Self {
        self.samples = samples;
        self
    }

    /// Sun position computed by the last [`SkyModel::generate`].
    pub fn sun(&self) -> SunPosition {
        self.sun
    }
}

impl SkyModel for ScatteringSky {
    fn generate(&mut self) {
        self.sun = solar_position(&self.observer);
        let direction = self.sun.direction();
        self.sun_direction = direction.as_vec3().normalize();
        self.sun_factor = sun_intensity_curve(direction);
        debug!(
            azimuth_deg = self.sun.azimuth.to_degrees(),
            elevation_deg = self.sun.elevation.to_degrees(),
            day = self.observer.clock.day_of_year,
            utc_hours = self.observer.clock.utc_hours,
            "sky generated"
        );
    }

    fn observer(&self) -> &Observer {
        &self.observer
    }

    fn set_clock(&mut self, clock: SkyClock) {
        self.observer.clock = clock;
    }

    fn radiance(&self, direction: SkyDirection) -> Result<[f32; 3], SkyError> {
        let look = direction.to_vector().as_vec3();
        let camera = Vec3::new(0.0, 0.0, self.params.planet_radius + SENSOR_HEIGHT_M);
        let raw = compute_single_scatter(camera, look, self.sun_direction, &self.params, self.samples);

        let mut color = [0.0_f32; 3];
        for (out, value) in color.iter_mut().zip(raw) {
            let mapped = 1.0 - (-value * self.sun_factor * self.exposure).exp();
            if !mapped.is_finite() {
                return Err(SkyError::NonFiniteRadiance {
                    azimuth: direction.azimuth,
                    elevation: direction.elevation,
                });
            }
            *out = mapped.clamp(0.0, 1.0);
        }
        Ok(color)
    }

    fn degree_of_polarisation(&self, direction: SkyDirection) -> f32 {
        let look = direction.to_vector().as_vec3();
        rayleigh_degree_of_polarisation(look, self.sun_direction, self.dop_max)
    }
}

/// A sky of one flat colour with no polarisation.
#[derive(Clone, Debug)]
pub struct UniformSky {
    observer: Observer,
    color: [f32; 3],
}

impl UniformSky {
    pub fn new(observer: Observer, color: [f32; 3]) -> Self {
        Self { observer, color }
    }
}

impl SkyModel for UniformSky {
    fn generate(&mut self) {}

    fn observer(&self) -> &Observer {
        &self.observer
    }

    fn set_clock(&mut self, clock: SkyClock) {
        self.observer.clock = clock;
    }

    fn radiance(&self, _direction: SkyDirection) -> Result<[f32; 3], SkyError> {
        Ok(self.color)
    }

    fn degree_of_polarisation(&self, _direction: SkyDirection) -> f32 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noon_sky() -> ScatteringSky {
        ScatteringSky::new(Observer::seville(SkyClock::new(172, 12.4)))
    }

    #[test]
    fn test_direction_vector_axes() {
        let east = SkyDirection::new(0.0, 0.0).to_vector();
        let north = SkyDirection::new(FRAC_PI_2, 0.0).to_vector();
        let up = SkyDirection::new(1.234, FRAC_PI_2).to_vector();
        assert!((east - DVec3::X).length() < 1e-12);
        assert!((north - DVec3::Y).length() < 1e-12);
        assert!((up - DVec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_radiance_is_normalised() {
        let sky = noon_sky();
        for elevation in [0.05, 0.5, 1.0, 1.5] {
            let c = sky.radiance(SkyDirection::new(0.3, elevation)).unwrap();
            assert!(c.iter().all(|v| (0.0..=1.0).contains(v)), "{c:?}");
        }
    }

    #[test]
    fn test_daytime_zenith_is_blue() {
        let c = noon_sky().radiance(SkyDirection::new(0.0, FRAC_PI_2 - 0.1)).unwrap();
        assert!(c[2] > c[0], "zenith should be bluer than red: {c:?}");
        assert!(c[2] > 0.05, "zenith should not be black: {c:?}");
    }

    #[test]
    fn test_night_sky_is_dark() {
        let sky = ScatteringSky::new(Observer::seville(SkyClock::new(172, 0.5)));
        let c = sky.radiance(SkyDirection::new(0.0, 1.0)).unwrap();
        assert!(c.iter().all(|v| *v < 1e-3), "{c:?}");
    }

    #[test]
    fn test_refresh_moves_the_sun() {
        let mut sky = noon_sky();
        let before = sky.sun();
        sky.refresh(SkyClock::new(172, 18.0));
        assert_eq!(sky.observer().clock.utc_hours, 18.0);
        assert!(sky.sun().elevation < before.elevation);
    }

    #[test]
    fn test_from_config_uses_fixed_clock() {
        let config = SkyConfig {
            day_of_year: Some(100),
            utc_hours: Some(9.0),
            ..SkyConfig::default()
        };
        let sky = ScatteringSky::from_config(&config).unwrap();
        assert_eq!(sky.observer().clock, SkyClock::new(100, 9.0));
    }

    #[test]
    fn test_from_config_rejects_bad_latitude() {
        let config = SkyConfig {
            latitude_deg: 123.0,
            ..SkyConfig::default()
        };
        assert!(ScatteringSky::from_config(&config).is_err());
    }

    #[test]
    fn test_uniform_sky_is_constant() {
        let sky = UniformSky::new(Observer::seville(SkyClock::new(1, 0.0)), [0.1, 0.2, 0.3]);
        assert_eq!(sky.radiance(SkyDirection::new(2.0, 0.2)).unwrap(), [0.1, 0.2, 0.3]);
        assert_eq!(sky.degree_of_polarisation(SkyDirection::new(2.0, 0.2)), 0.0);
    }
}
