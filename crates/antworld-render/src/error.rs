//! Render error types.

use antworld_sky::SkyError;

/// Errors that abort a render or world construction.
///
/// A polygon that collapses to fewer than three screen vertices is not an
/// error; the renderers skip it.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RenderError {
    /// A requested or stored dimension is unusable.
    #[error("invalid dimensions {width}x{length}x{height}: {reason}")]
    InvalidDimensions {
        width: u32,
        length: u32,
        height: u32,
        reason: &'static str,
    },

    /// A viewpoint coordinate or heading is NaN or infinite.
    #[error("invalid viewpoint: {0} is not finite")]
    InvalidViewpoint(&'static str),

    /// The world was built from an empty polygon set.
    #[error("world has no polygons")]
    EmptyGeometry,

    /// Every polygon coordinate is zero, so nothing can be normalised.
    #[error("all polygon coordinates are zero; normalisation scale would be zero")]
    ZeroScale,

    /// The eye returned a different number of samples than directions.
    #[error("sky sampler returned {actual} samples for {expected} directions")]
    SampleCountMismatch { expected: usize, actual: usize },

    /// The sky model failed while sampling.
    #[error("sky sampling failed: {0}")]
    Sky(#[from] SkyError),
}

impl RenderError {
    /// `true` for errors caused by the caller's configuration rather than
    /// by a collaborator.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RenderError::InvalidDimensions { .. }
                | RenderError::InvalidViewpoint(_)
                | RenderError::EmptyGeometry
                | RenderError::ZeroScale
        )
    }
}
