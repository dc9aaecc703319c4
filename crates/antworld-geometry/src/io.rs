//! RON persistence for polygon sets and routes.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{GeometryError, PolygonSet, Route};

/// Load a polygon set from a RON file.
pub fn load_polygons(path: &Path) -> Result<PolygonSet, GeometryError> {
    load(path)
}

/// Save a polygon set as a RON file.
pub fn save_polygons(polygons: &PolygonSet, path: &Path) -> Result<(), GeometryError> {
    save(polygons, path)
}

/// Load a route from a RON file.
pub fn load_route(path: &Path) -> Result<Route, GeometryError> {
    load(path)
}

/// Save a route as a RON file.
pub fn save_route(route: &Route, path: &Path) -> Result<(), GeometryError> {
    save(route, path)
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T, GeometryError> {
    let contents = std::fs::read_to_string(path).map_err(GeometryError::Read)?;
    ron::from_str(&contents).map_err(GeometryError::Parse)
}

fn save<T: Serialize>(value: &T, path: &Path) -> Result<(), GeometryError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(GeometryError::Write)?;
    }
    let pretty = ron::ser::PrettyConfig::new().depth_limit(2);
    let serialized = ron::ser::to_string_pretty(value, pretty).map_err(GeometryError::Serialize)?;
    std::fs::write(path, serialized).map_err(GeometryError::Write)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Polygon;
    use glam::DVec3;

    #[test]
    fn test_polygons_survive_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.ron");
        let polygons = PolygonSet::new(vec![Polygon::new(
            vec![DVec3::ZERO, DVec3::X, DVec3::new(0.5, 1.0, 0.25)],
            [0, 255, 0],
        )]);

        save_polygons(&polygons, &path).unwrap();
        assert_eq!(load_polygons(&path).unwrap(), polygons);
    }

    #[test]
    fn test_route_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routes").join("homing-1-2.ron");
        let route = Route::new(vec![DVec3::ZERO, DVec3::new(0.1, 0.2, 0.0)], 1, 2, 0.1).unwrap();

        save_route(&route, &path).unwrap();
        assert_eq!(load_route(&path).unwrap(), route);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_route(&dir.path().join("missing.ron"));
        assert!(matches!(result, Err(GeometryError::Read(_))));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ron");
        std::fs::write(&path, "(positions: oops").unwrap();
        assert!(matches!(load_polygons(&path), Err(GeometryError::Parse(_))));
    }
}
