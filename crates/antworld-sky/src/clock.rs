//! Observer clock and solar position.
//!
//! World frame: `x` east, `y` north, `z` up. Solar azimuths from the
//! astronomical formulas are measured clockwise from north and converted
//! into this frame before leaving the module.

use std::f64::consts::{PI, TAU};

use chrono::{DateTime, Datelike, Timelike, Utc};
use glam::DVec3;

use crate::SkyError;

/// Date and time of an observation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyClock {
    /// Day of the year, 1-based.
    pub day_of_year: u32,
    /// Time of day in UTC hours, `[0, 24)`.
    pub utc_hours: f64,
}

impl SkyClock {
    pub fn new(day_of_year: u32, utc_hours: f64) -> Self {
        Self {
            day_of_year,
            utc_hours: utc_hours.rem_euclid(24.0),
        }
    }

    /// Read the system clock.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Clock for a UTC instant.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        let seconds = f64::from(at.second()) + f64::from(at.nanosecond()) * 1e-9;
        let utc_hours = f64::from(at.hour()) + f64::from(at.minute()) / 60.0 + seconds / 3_600.0;
        Self::new(at.ordinal(), utc_hours)
    }
}

/// Where the observer stands and when.
#[derive(Clone, Debug, PartialEq)]
pub struct Observer {
    /// Latitude in degrees, north positive.
    pub latitude_deg: f64,
    /// Longitude in degrees, east positive.
    pub longitude_deg: f64,
    /// Current observation time.
    pub clock: SkyClock,
}

impl Observer {
    pub fn new(latitude_deg: f64, longitude_deg: f64, clock: SkyClock) -> Result<Self, SkyError> {
        if !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(SkyError::InvalidLatitude(latitude_deg));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
            clock,
        })
    }

    /// Seville, Spain: where the recorded ant routes were collected.
    pub fn seville(clock: SkyClock) -> Self {
        Self {
            latitude_deg: 37.392,
            longitude_deg: -5.984,
            clock,
        }
    }
}

/// Sun position as seen by an observer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunPosition {
    /// Azimuth in radians, clockwise from north.
    pub azimuth: f64,
    /// Elevation above the horizon in radians.
    pub elevation: f64,
}

impl SunPosition {
    /// Unit vector towards the sun in the world frame.
    pub fn direction(&self) -> DVec3 {
        let (sin_e, cos_e) = self.elevation.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        DVec3::new(cos_e * sin_a, cos_e * cos_a, sin_e)
    }
}

/// Low-precision solar position (declination + equation of time).
///
/// Accurate to a fraction of a degree, which is well below the angular
/// resolution of any panorama this crate renders.
pub fn solar_position(observer: &Observer) -> SunPosition {
    let day = f64::from(observer.clock.day_of_year);
    let hours = observer.clock.utc_hours;

    let gamma = TAU / 365.0 * (day - 1.0 + (hours - 12.0) / 24.0);
    let eq_time = 229.18
        * (0.000075 + 0.001868 * gamma.cos()
            - 0.032077 * gamma.sin()
            - 0.014615 * (2.0 * gamma).cos()
            - 0.040849 * (2.0 * gamma).sin());
    let declination = 0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin()
        - 0.006758 * (2.0 * gamma).cos()
        + 0.000907 * (2.0 * gamma).sin()
        - 0.002697 * (3.0 * gamma).cos()
        + 0.00148 * (3.0 * gamma).sin();

    let solar_minutes = hours * 60.0 + eq_time + 4.0 * observer.longitude_deg;
    let hour_angle = (solar_minutes / 4.0 - 180.0).to_radians();
    let lat = observer.latitude_deg.to_radians();

    let sin_elevation =
        lat.sin() * declination.sin() + lat.cos() * declination.cos() * hour_angle.cos();
    let elevation = sin_elevation.clamp(-1.0, 1.0).asin();

    let azimuth = (-hour_angle.sin())
        .atan2(lat.cos() * declination.tan() - lat.sin() * hour_angle.cos())
        .rem_euclid(TAU);

    SunPosition { azimuth, elevation }
}

/// Sun intensity multiplier from its elevation.
///
/// 1.0 above 15°, 0.0 below −10°, smooth through twilight.
pub fn sun_intensity_curve(sun_direction: DVec3) -> f32 {
    let sin_elevation = sun_direction.z as f32;
    let low = (-10.0_f32).to_radians().sin();
    let high = (15.0_f32).to_radians().sin();
    smoothstep(low, high, sin_elevation)
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Wrap an angle into `(-π, π]`.
pub(crate) fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn equator(day: u32, hours: f64) -> Observer {
        Observer::new(0.0, 0.0, SkyClock::new(day, hours)).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_unix_epoch_is_first_of_january() {
        let clock = SkyClock::from_datetime(DateTime::from_timestamp(0, 0).unwrap());
        assert_eq!(clock.day_of_year, 1);
        assert_eq!(clock.utc_hours, 0.0);
    }

    #[test]
    fn test_day_of_year_in_leap_year() {
        let clock = SkyClock::from_datetime(utc(2024, 3, 1, 6, 30));
        assert_eq!(clock.day_of_year, 61);
        assert!((clock.utc_hours - 6.5).abs() < 1e-9);
    }

    #[test]
    fn test_last_day_of_common_year() {
        assert_eq!(SkyClock::from_datetime(utc(2023, 12, 31, 0, 0)).day_of_year, 365);
        assert_eq!(SkyClock::from_datetime(utc(2000, 12, 31, 23, 59)).day_of_year, 366);
    }

    #[test]
    fn test_now_is_within_calendar() {
        let clock = SkyClock::now();
        assert!((1..=366).contains(&clock.day_of_year));
        assert!((0.0..24.0).contains(&clock.utc_hours));
    }

    #[test]
    fn test_clock_wraps_hours() {
        assert_eq!(SkyClock::new(10, 25.5).utc_hours, 1.5);
    }

    #[test]
    fn test_invalid_latitude_rejected() {
        assert!(matches!(
            Observer::new(91.0, 0.0, SkyClock::new(1, 0.0)),
            Err(SkyError::InvalidLatitude(_))
        ));
    }

    #[test]
    fn test_equinox_noon_sun_is_near_zenith_at_equator() {
        let sun = solar_position(&equator(80, 12.0));
        assert!(
            sun.elevation > 80_f64.to_radians(),
            "elevation {}",
            sun.elevation.to_degrees()
        );
    }

    #[test]
    fn test_midnight_sun_is_below_horizon() {
        let sun = solar_position(&equator(80, 0.0));
        assert!(sun.elevation < -60_f64.to_radians());
        assert_eq!(sun_intensity_curve(sun.direction()), 0.0);
    }

    #[test]
    fn test_morning_sun_is_in_the_east() {
        let sun = solar_position(&Observer::seville(SkyClock::new(172, 7.0)));
        let dir = sun.direction();
        assert!(sun.elevation > 0.0);
        assert!(dir.x > 0.5, "morning sun should be east, got {dir:?}");
    }

    #[test]
    fn test_northern_summer_noon_sun_is_south() {
        let sun = solar_position(&Observer::seville(SkyClock::new(172, 12.4)));
        assert!(sun.direction().y < 0.0);
        assert!(sun.elevation > 70_f64.to_radians());
    }

    #[test]
    fn test_sun_direction_is_unit() {
        for hours in [0.0, 6.0, 9.5, 12.0, 18.25] {
            let d = solar_position(&equator(200, hours)).direction();
            assert!((d.length() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_intensity_curve_bounds() {
        assert_eq!(sun_intensity_curve(DVec3::Z), 1.0);
        assert_eq!(sun_intensity_curve(DVec3::NEG_Z), 0.0);
        let horizon = sun_intensity_curve(DVec3::X);
        assert!(horizon > 0.0 && horizon < 1.0);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-12);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-12);
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-12);
    }
}
