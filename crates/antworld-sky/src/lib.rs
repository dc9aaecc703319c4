//! Sky for the ant world: observer clock, solar position, single-scattering
//! skylight with polarisation, and the compound eye that samples it.

pub mod clock;
mod error;
mod eye;
mod model;
pub mod scatter;

pub use clock::{Observer, SkyClock, SunPosition, solar_position};
pub use error::SkyError;
pub use eye::CompoundEye;
pub use model::{ScatteringSky, SkyDirection, SkyModel, UniformSky};
