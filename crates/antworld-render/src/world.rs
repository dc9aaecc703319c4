//! The world to be rendered: geometry, routes, sky and render settings.

use std::fmt;

use antworld_config::{PaletteConfig, WorldConfig};
use antworld_geometry::{PolygonSet, Route};
use antworld_sky::{SkyClock, SkyModel};
use glam::DVec3;
use tracing::{debug, info};

use crate::RenderError;

/// Target image dimensions. `width`/`length` span the `x`/`y` extents of the
/// world; `height` spans `z` and, for panoramas, the image rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dims {
    pub width: u32,
    pub length: u32,
    pub height: u32,
}

impl Dims {
    pub fn new(width: u32, length: u32, height: u32) -> Self {
        Self {
            width,
            length,
            height,
        }
    }

    /// Every dimension must be non-zero.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.width == 0 || self.length == 0 || self.height == 0 {
            return Err(self.invalid("every dimension must be positive"));
        }
        Ok(())
    }

    pub(crate) fn invalid(&self, reason: &'static str) -> RenderError {
        RenderError::InvalidDimensions {
            width: self.width,
            length: self.length,
            height: self.height,
            reason,
        }
    }

    pub fn as_dvec3(&self) -> DVec3 {
        DVec3::new(
            f64::from(self.width),
            f64::from(self.length),
            f64::from(self.height),
        )
    }
}

impl From<&WorldConfig> for Dims {
    fn from(config: &WorldConfig) -> Self {
        Self::new(config.width, config.length, config.height)
    }
}

/// Per-call dimension overrides; unset fields use the world's stored dims.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewSize {
    pub width: Option<u32>,
    pub length: Option<u32>,
    pub height: Option<u32>,
}

impl ViewSize {
    /// Override all three dimensions.
    pub fn exact(dims: Dims) -> Self {
        Self {
            width: Some(dims.width),
            length: Some(dims.length),
            height: Some(dims.height),
        }
    }

    /// Square image of `size × size` with the stored height.
    pub fn square(size: u32) -> Self {
        Self {
            width: Some(size),
            length: Some(size),
            height: None,
        }
    }

    pub fn resolve(&self, stored: Dims) -> Dims {
        Dims {
            width: self.width.unwrap_or(stored.width),
            length: self.length.unwrap_or(stored.length),
            height: self.height.unwrap_or(stored.height),
        }
    }
}

/// Polygons, routes, sky and settings shared by both renderers.
///
/// Geometry is stored in world units; renderers draw from scaled copies.
pub struct WorldState {
    polygons: PolygonSet,
    routes: Vec<Route>,
    normalization_scale: f64,
    dims: Dims,
    uniform_sky: bool,
    pol_filters: bool,
    eye_height_fraction: f64,
    palette: PaletteConfig,
    sky: Box<dyn SkyModel>,
}

impl WorldState {
    /// Build a world from `polygons`, taking dims, flags and palette from
    /// `config`.
    ///
    /// Fails on an empty polygon set, on geometry whose coordinates are all
    /// zero, and on zero dimensions.
    pub fn new(
        polygons: PolygonSet,
        sky: Box<dyn SkyModel>,
        config: &WorldConfig,
    ) -> Result<Self, RenderError> {
        if polygons.is_empty() {
            return Err(RenderError::EmptyGeometry);
        }
        let normalization_scale = polygons.max_abs_coordinate();
        if !(normalization_scale > 0.0 && normalization_scale.is_finite()) {
            return Err(RenderError::ZeroScale);
        }
        let dims = Dims::from(config);
        dims.validate()?;

        info!(
            polygons = polygons.len(),
            scale = normalization_scale,
            width = dims.width,
            length = dims.length,
            height = dims.height,
            "world loaded"
        );

        Ok(Self {
            polygons,
            routes: Vec::new(),
            normalization_scale,
            dims,
            uniform_sky: config.uniform_sky,
            pol_filters: config.pol_filters,
            eye_height_fraction: config.eye_height_fraction,
            palette: config.palette.clone(),
            sky,
        })
    }

    pub fn add_route(&mut self, route: Route) {
        debug!(
            agent = route.agent_id(),
            route = route.route_id(),
            positions = route.len(),
            "route added"
        );
        self.routes.push(route);
    }

    pub fn polygons(&self) -> &PolygonSet {
        &self.polygons
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Largest absolute coordinate of the stored geometry.
    pub fn normalization_scale(&self) -> f64 {
        self.normalization_scale
    }

    /// World units per unit of normalised geometry.
    pub fn ratio_to_meters(&self) -> f64 {
        self.normalization_scale
    }

    pub fn dims(&self) -> Dims {
        self.dims
    }

    pub fn set_dims(&mut self, dims: Dims) -> Result<(), RenderError> {
        dims.validate()?;
        self.dims = dims;
        Ok(())
    }

    pub fn uniform_sky(&self) -> bool {
        self.uniform_sky
    }

    pub fn set_uniform_sky(&mut self, uniform: bool) {
        self.uniform_sky = uniform;
    }

    pub fn pol_filters(&self) -> bool {
        self.pol_filters
    }

    pub fn set_pol_filters(&mut self, enabled: bool) {
        self.pol_filters = enabled;
    }

    /// Default eye height above the vertical midpoint, as a fraction of the
    /// target height.
    pub fn eye_height_fraction(&self) -> f64 {
        self.eye_height_fraction
    }

    pub fn palette(&self) -> &PaletteConfig {
        &self.palette
    }

    pub fn sky(&self) -> &dyn SkyModel {
        self.sky.as_ref()
    }

    /// Move the sky to `clock` and regenerate it.
    pub fn refresh_sky(&mut self, clock: SkyClock) {
        self.sky.refresh(clock);
    }

    /// Factors mapping world units onto `dims`: `dims / scale` per axis.
    pub fn scale_factors(&self, dims: Dims) -> DVec3 {
        dims.as_dvec3() / self.normalization_scale
    }

    /// Polygons normalised and stretched to `dims`.
    pub fn scaled_polygons(&self, dims: Dims) -> PolygonSet {
        self.polygons.scale(self.scale_factors(dims))
    }

    /// Routes normalised and stretched to `dims`.
    pub fn scaled_routes(&self, dims: Dims) -> Vec<Route> {
        let factors = self.scale_factors(dims);
        self.routes.iter().map(|r| r.scale(factors)).collect()
    }
}

impl fmt::Debug for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldState")
            .field("polygons", &self.polygons.len())
            .field("routes", &self.routes.len())
            .field("normalization_scale", &self.normalization_scale)
            .field("dims", &self.dims)
            .field("uniform_sky", &self.uniform_sky)
            .field("pol_filters", &self.pol_filters)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use antworld_geometry::Polygon;
    use antworld_sky::{Observer, UniformSky};

    fn sky() -> Box<dyn SkyModel> {
        Box::new(UniformSky::new(
            Observer::seville(SkyClock::new(172, 12.0)),
            [0.1, 0.5, 0.8],
        ))
    }

    fn triangle(scale: f64) -> Polygon {
        Polygon::new(
            vec![
                DVec3::new(0.0, 0.0, 0.0),
                DVec3::new(scale, 0.0, 0.0),
                DVec3::new(0.0, -scale / 2.0, scale / 4.0),
            ],
            [1, 2, 3],
        )
    }

    fn world() -> WorldState {
        let polygons = PolygonSet::new(vec![triangle(4.0)]);
        WorldState::new(polygons, sky(), &WorldConfig::default()).unwrap()
    }

    #[test]
    fn test_scale_is_max_abs_coordinate() {
        let world = world();
        assert_eq!(world.normalization_scale(), 4.0);
        assert_eq!(world.ratio_to_meters(), 4.0);
        assert_eq!(world.dims(), Dims::new(36, 36, 10));
    }

    #[test]
    fn test_scaling_round_trips() {
        let world = world();
        let dims = Dims::new(50, 40, 10);
        let scaled = world.scaled_polygons(dims);
        let back = scaled.scale(DVec3::splat(world.normalization_scale()) / dims.as_dvec3());
        for (a, b) in back.iter().zip(world.polygons()) {
            for (va, vb) in a.vertices.iter().zip(&b.vertices) {
                assert!((*va - *vb).length() < 1e-12);
            }
        }
        // Largest coordinate lands on the target extent.
        assert!((scaled.as_slice()[0].vertices[1].x - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_scaled_routes_follow_polygons() {
        let mut world = world();
        world.add_route(Route::new(vec![DVec3::new(2.0, 1.0, 0.0)], 1, 1, 0.1).unwrap());
        let routes = world.scaled_routes(Dims::new(8, 4, 2));
        assert_eq!(routes[0].positions()[0], DVec3::new(4.0, 1.0, 0.0));
        assert_eq!(world.routes()[0].positions()[0], DVec3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_empty_geometry_rejected() {
        let result = WorldState::new(PolygonSet::default(), sky(), &WorldConfig::default());
        assert!(matches!(result, Err(RenderError::EmptyGeometry)));
    }

    #[test]
    fn test_all_zero_geometry_rejected() {
        let polygons = PolygonSet::new(vec![Polygon::new(vec![DVec3::ZERO; 3], [0, 0, 0])]);
        let result = WorldState::new(polygons, sky(), &WorldConfig::default());
        assert!(matches!(result, Err(RenderError::ZeroScale)));
    }

    #[test]
    fn test_zero_dims_rejected() {
        let config = WorldConfig {
            height: 0,
            ..WorldConfig::default()
        };
        let result = WorldState::new(PolygonSet::new(vec![triangle(1.0)]), sky(), &config);
        assert!(matches!(result, Err(RenderError::InvalidDimensions { .. })));

        let mut world = world();
        assert!(world.set_dims(Dims::new(0, 5, 5)).is_err());
        assert_eq!(world.dims(), Dims::new(36, 36, 10));
    }

    #[test]
    fn test_settings_and_refresh() {
        let mut world = world();
        assert!(world.pol_filters());
        world.set_pol_filters(false);
        world.set_uniform_sky(true);
        assert!(!world.pol_filters());
        assert!(world.uniform_sky());

        world.refresh_sky(SkyClock::new(10, 6.0));
        assert_eq!(world.sky().observer().clock, SkyClock::new(10, 6.0));
    }

    #[test]
    fn test_view_size_resolution() {
        let stored = Dims::new(36, 36, 10);
        assert_eq!(ViewSize::default().resolve(stored), stored);
        assert_eq!(ViewSize::square(500).resolve(stored), Dims::new(500, 500, 10));
        let exact = Dims::new(1, 2, 3);
        assert_eq!(ViewSize::exact(exact).resolve(stored), exact);
    }
}
