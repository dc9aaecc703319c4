//! Flat-coloured polygons and ordered polygon sets.

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// A planar or non-planar polygon with a single fill colour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Vertices in drawing order.
    pub vertices: Vec<DVec3>,
    /// Intrinsic 8-bit RGB colour.
    pub color: [u8; 3],
}

impl Polygon {
    /// Create a polygon from its vertices and colour.
    pub fn new(vertices: Vec<DVec3>, color: [u8; 3]) -> Self {
        Self { vertices, color }
    }

    /// Multiply every vertex component-wise by `factors`.
    pub fn scale(&self, factors: DVec3) -> Self {
        Self {
            vertices: self.vertices.iter().map(|v| *v * factors).collect(),
            color: self.color,
        }
    }

    /// The polygon flattened onto the ground plane.
    pub fn xy(&self) -> Vec<DVec2> {
        self.vertices.iter().map(|v| v.truncate()).collect()
    }

    /// Largest absolute coordinate over all vertices, 0 for an empty polygon.
    pub fn max_abs_coordinate(&self) -> f64 {
        self.vertices
            .iter()
            .map(|v| v.abs().max_element())
            .fold(0.0, f64::max)
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// An ordered collection of polygons. Order is drawing order in flat views.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolygonSet {
    polygons: Vec<Polygon>,
}

impl PolygonSet {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    pub fn push(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Polygon> {
        self.polygons.iter()
    }

    pub fn as_slice(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Scale every polygon component-wise, keeping order and colours.
    pub fn scale(&self, factors: DVec3) -> Self {
        self.polygons.iter().map(|p| p.scale(factors)).collect()
    }

    /// Largest absolute coordinate over the whole set.
    pub fn max_abs_coordinate(&self) -> f64 {
        self.polygons
            .iter()
            .map(Polygon::max_abs_coordinate)
            .fold(0.0, f64::max)
    }
}

impl FromIterator<Polygon> for PolygonSet {
    fn from_iter<I: IntoIterator<Item = Polygon>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for PolygonSet {
    type Item = Polygon;
    type IntoIter = std::vec::IntoIter<Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.into_iter()
    }
}

impl<'a> IntoIterator for &'a PolygonSet {
    type Item = &'a Polygon;
    type IntoIter = std::slice::Iter<'a, Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.iter()
    }
}
