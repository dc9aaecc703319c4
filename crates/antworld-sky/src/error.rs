//! Sky error types.

/// Errors raised by sky models and the compound eye.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SkyError {
    /// Observer latitude outside [-90, 90] degrees.
    #[error("latitude {0} is outside [-90, 90] degrees")]
    InvalidLatitude(f64),

    /// The model produced NaN or infinity for a direction.
    #[error("non-finite radiance at azimuth {azimuth:.4}, elevation {elevation:.4}")]
    NonFiniteRadiance { azimuth: f64, elevation: f64 },
}
