//! Top-down view of the world with routes overlaid.

use tracing::{debug, trace};

use crate::color::RoutePalette;
use crate::raster::{Canvas, Frame};
use crate::world::{ViewSize, WorldState};
use crate::RenderError;

/// Draws the `x`/`y` projection of the world onto a `width × length` image.
///
/// Polygons are painted in list order over the ground colour, so later
/// polygons cover earlier ones. Routes are drawn last as one-pixel
/// polylines.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrthographicRenderer;

impl OrthographicRenderer {
    pub fn render(&self, world: &WorldState, size: ViewSize) -> Result<Frame, RenderError> {
        let dims = size.resolve(world.dims());
        dims.validate()?;

        let mut canvas = Canvas::new(dims.width, dims.length, world.palette().ground);

        for polygon in world.scaled_polygons(dims).iter() {
            if polygon.len() < 3 {
                trace!(vertices = polygon.len(), "skipping degenerate polygon");
                continue;
            }
            canvas.fill_polygon(&polygon.xy(), polygon.color);
        }

        let routes = world.scaled_routes(dims);
        let palette = RoutePalette::from_routes(&routes);
        for route in &routes {
            canvas.draw_polyline(&route.xy(), palette.color(route));
        }

        debug!(
            width = dims.width,
            length = dims.length,
            polygons = world.polygons().len(),
            routes = routes.len(),
            "top view rendered"
        );
        Ok(canvas.finish())
    }
}
