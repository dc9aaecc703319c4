//! Renderers for the ant world.
//!
//! [`OrthographicRenderer`] draws a top-down map of the polygons and routes.
//! [`PanoramicRenderer`] draws the 360° view an agent would see from a point
//! in the world, with the sky sampled through a compound eye.
//!
//! Both rasterise on the CPU into an [`image::RgbImage`] and return the list
//! of [`DrawOp`]s they issued alongside the pixels.

pub mod color;
mod error;
mod ortho;
pub mod panorama;
pub mod projection;
pub mod raster;
mod sensor;
mod world;

pub use error::RenderError;
pub use ortho::OrthographicRenderer;
pub use panorama::{PanoramaRequest, PanoramicRenderer, Viewpoint};
pub use raster::{DrawOp, Frame};
pub use sensor::SensorGrid;
pub use world::{Dims, ViewSize, WorldState};
