//! Geometry containers for the ant world: coloured polygons and agent routes.
//!
//! Coordinates are world units (metres in recorded data) with `z` pointing up.
//! Every transform returns a new container; stored geometry is never mutated.

mod error;
pub mod io;
mod polygon;
mod route;

pub use error::GeometryError;
pub use polygon::{Polygon, PolygonSet};
pub use route::Route;
