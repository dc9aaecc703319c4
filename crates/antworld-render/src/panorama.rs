//! 360° equirectangular view from a point in the world.
//!
//! The upper half of the image is sky, sampled through a compound eye with
//! one ommatidium per pixel (or a flat colour when the world asks for a
//! uniform sky). Polygons are projected onto the sphere around the viewer
//! and painted far to near over it.

use glam::{DMat3, DVec2, DVec3};
use tracing::{debug, trace};

use antworld_geometry::PolygonSet;
use antworld_sky::{CompoundEye, SkyClock};

use crate::projection::project;
use crate::raster::{Canvas, DrawOp, Frame};
use crate::sensor::SensorGrid;
use crate::world::{Dims, ViewSize, WorldState};
use crate::RenderError;

/// Viewer position in world units. Unset coordinates default to the centre
/// of the target image in `x`/`y` and to slightly above half height in `z`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewpoint {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

impl Viewpoint {
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }
}

/// Everything a panoramic render needs beyond the world itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanoramaRequest {
    pub viewpoint: Viewpoint,
    /// Rotation about the vertical axis in radians, counter-clockwise.
    pub heading: f64,
    pub size: ViewSize,
    /// Move the sky to the current time before sampling it.
    pub refresh_sky: bool,
}

impl Default for PanoramaRequest {
    fn default() -> Self {
        Self {
            viewpoint: Viewpoint::default(),
            heading: 0.0,
            size: ViewSize::default(),
            refresh_sky: true,
        }
    }
}

impl PanoramaRequest {
    pub fn new(viewpoint: Viewpoint, heading: f64) -> Self {
        Self {
            viewpoint,
            heading,
            ..Self::default()
        }
    }

    pub fn with_size(mut self, size: ViewSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_sky_refresh(mut self, refresh: bool) -> Self {
        self.refresh_sky = refresh;
        self
    }
}

/// A polygon's vertices in image space.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedPolygon {
    pub rows: Vec<f64>,
    pub columns: Vec<f64>,
    /// Norm of the vector of per-vertex distances; the depth sort key.
    pub distance: f64,
    pub color: [u8; 3],
}

/// Column sets for a polygon after checking the left/right image seam.
#[derive(Clone, Debug, PartialEq)]
pub enum SeamSplit {
    /// The polygon does not cross the seam.
    Whole(Vec<f64>),
    /// The polygon straddles the seam; draw it twice, once shifted right by
    /// one image width and once shifted left.
    Split { right: Vec<f64>, left: Vec<f64> },
}

/// Decide whether `columns` wrap around the image edge.
///
/// A column spread of at least half the width means the polygon crosses
/// the seam. Each copy moves the vertices on one side of the midline by
/// a full width, so both copies agree with the original modulo `width`.
pub fn split_at_seam(columns: &[f64], width: u32) -> SeamSplit {
    let w = f64::from(width);
    let half = w / 2.0;
    let (min, max) = columns
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &c| {
            (lo.min(c), hi.max(c))
        });
    if columns.is_empty() || max - min < half {
        return SeamSplit::Whole(columns.to_vec());
    }
    let right = columns
        .iter()
        .map(|&c| if c < half { c + w } else { c })
        .collect();
    let left = columns
        .iter()
        .map(|&c| if c >= half { c - w } else { c })
        .collect();
    SeamSplit::Split { right, left }
}

/// Eye position in target units.
///
/// Supplied coordinates are world units and go through the same scaling as
/// the polygons. Defaults are already in target units.
pub fn eye_position(world: &WorldState, viewpoint: Viewpoint, dims: Dims) -> Result<DVec3, RenderError> {
    let factors = world.scale_factors(dims);
    let extent = dims.as_dvec3();
    let eye = DVec3::new(
        viewpoint.x.map_or(extent.x / 2.0, |x| x * factors.x),
        viewpoint.y.map_or(extent.y / 2.0, |y| y * factors.y),
        viewpoint
            .z
            .map_or(extent.z / 2.0 + world.eye_height_fraction() * extent.z, |z| {
                z * factors.z
            }),
    );
    if !eye.x.is_finite() {
        return Err(RenderError::InvalidViewpoint("x"));
    }
    if !eye.y.is_finite() {
        return Err(RenderError::InvalidViewpoint("y"));
    }
    if !eye.z.is_finite() {
        return Err(RenderError::InvalidViewpoint("z"));
    }
    Ok(eye)
}

/// Project already scaled polygons around `eye`, rotated by `-heading`.
///
/// Polygons with fewer than three vertices are dropped. Output keeps
/// input order.
pub fn project_polygons(
    polygons: &PolygonSet,
    eye: DVec3,
    heading: f64,
    dims: Dims,
) -> Vec<ProjectedPolygon> {
    let rotation = DMat3::from_rotation_z(-heading);
    let mut projected = Vec::with_capacity(polygons.len());

    for (index, polygon) in polygons.iter().enumerate() {
        if polygon.len() < 3 {
            trace!(index, vertices = polygon.len(), "skipping degenerate polygon");
            continue;
        }
        let mut rows = Vec::with_capacity(polygon.len());
        let mut columns = Vec::with_capacity(polygon.len());
        let mut distance_sq = 0.0;
        for vertex in &polygon.vertices {
            let coords = project(rotation * (*vertex - eye));
            rows.push(coords.row(dims.height));
            columns.push(coords.column(dims.width));
            distance_sq += coords.distance * coords.distance;
        }
        projected.push(ProjectedPolygon {
            rows,
            columns,
            distance: distance_sq.sqrt(),
            color: polygon.color,
        });
    }
    projected
}

/// Order for painting: farthest first. Equal distances keep their order.
pub fn sort_far_to_near(polygons: &mut [ProjectedPolygon]) {
    polygons.sort_by(|a, b| b.distance.total_cmp(&a.distance));
}

/// Renders panoramas of a [`WorldState`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PanoramicRenderer;

impl PanoramicRenderer {
    /// Render, first moving a non-uniform sky to the current time when the
    /// request asks for it.
    pub fn render(&self, world: &mut WorldState, request: &PanoramaRequest) -> Result<Frame, RenderError> {
        validate_dims(request.size.resolve(world.dims()))?;
        if request.refresh_sky && !world.uniform_sky() {
            world.refresh_sky(SkyClock::now());
        }
        self.render_with_sky(world, request)
    }

    /// Render with the sky as it currently is. `request.refresh_sky` is
    /// ignored.
    pub fn render_with_sky(&self, world: &WorldState, request: &PanoramaRequest) -> Result<Frame, RenderError> {
        let dims = request.size.resolve(world.dims());
        validate_dims(dims)?;
        if !request.heading.is_finite() {
            return Err(RenderError::InvalidViewpoint("heading"));
        }
        let eye = eye_position(world, request.viewpoint, dims)?;

        // Sample before drawing so a failing sky leaves nothing half drawn.
        let sky_pixels = if world.uniform_sky() {
            None
        } else {
            let grid = SensorGrid::new(dims.width, dims.height);
            let mut compound_eye = CompoundEye::new(grid.directions().to_vec());
            compound_eye.activate_pol_filters(world.pol_filters());
            compound_eye.set_facing_direction(-request.heading);
            let samples = compound_eye.sample(world.sky())?;
            Some(sky_pixels(&grid, &samples)?)
        };

        let palette = world.palette();
        let mut canvas = Canvas::new(dims.width, dims.height, palette.ground);
        match sky_pixels {
            None => canvas.fill_rect(0, 0, dims.width, dims.height / 2, palette.sky),
            Some(pixels) => {
                let count = pixels.len();
                for (x, y, color) in pixels {
                    canvas.put_pixel(i64::from(x), i64::from(y), color);
                }
                canvas.log(DrawOp::SkySamples { count });
            }
        }

        let mut projected = project_polygons(&world.scaled_polygons(dims), eye, request.heading, dims);
        sort_far_to_near(&mut projected);

        let mut wrapped = 0usize;
        for polygon in &projected {
            match split_at_seam(&polygon.columns, dims.width) {
                SeamSplit::Whole(columns) => {
                    canvas.fill_polygon(&image_points(&columns, &polygon.rows), polygon.color);
                }
                SeamSplit::Split { right, left } => {
                    wrapped += 1;
                    canvas.fill_polygon(&image_points(&right, &polygon.rows), polygon.color);
                    canvas.fill_polygon(&image_points(&left, &polygon.rows), polygon.color);
                }
            }
        }

        debug!(
            width = dims.width,
            height = dims.height,
            heading = request.heading,
            polygons = projected.len(),
            wrapped,
            "panorama rendered"
        );
        Ok(canvas.finish())
    }
}

fn validate_dims(dims: Dims) -> Result<(), RenderError> {
    dims.validate()?;
    if dims.width % 2 != 0 {
        return Err(dims.invalid("panorama width must be even"));
    }
    Ok(())
}

/// Pair each sample with its pixel, scaling channels to bytes.
fn sky_pixels(grid: &SensorGrid, samples: &[[f32; 3]]) -> Result<Vec<(u32, u32, [u8; 3])>, RenderError> {
    if samples.len() != grid.len() {
        return Err(RenderError::SampleCountMismatch {
            expected: grid.len(),
            actual: samples.len(),
        });
    }
    Ok(samples
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let (x, y) = grid.pixel(i);
            (x, y, c.map(|v| (255.0 * v).clamp(0.0, 255.0) as u8))
        })
        .collect())
}

fn image_points(columns: &[f64], rows: &[f64]) -> Vec<DVec2> {
    columns
        .iter()
        .zip(rows)
        .map(|(&x, &y)| DVec2::new(x, y))
        .collect()
}
