//! Route colours.

use antworld_geometry::Route;

/// Brightness shared by every route colour.
pub const ROUTE_VALUE: f64 = 0.5;

/// HSV to RGB, all components in `[0, 1]`.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [f64; 3] {
    if s == 0.0 {
        return [v, v, v];
    }
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match (sector as i64).rem_euclid(6) {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

/// Scale to `0..=255`, truncating.
pub fn to_rgb8(rgb: [f64; 3]) -> [u8; 3] {
    rgb.map(|c| (c * 255.0).clamp(0.0, 255.0) as u8)
}

/// Route colours keyed on agent and route IDs.
///
/// Hue follows the agent's rank among the distinct agent IDs and
/// saturation follows the route's rank among the distinct route IDs, both
/// spread evenly over `[0, 1]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoutePalette {
    agents: Vec<u32>,
    routes: Vec<u32>,
}

impl RoutePalette {
    pub fn from_routes<'a>(routes: impl IntoIterator<Item = &'a Route>) -> Self {
        let mut agents = Vec::new();
        let mut ids = Vec::new();
        for route in routes {
            agents.push(route.agent_id());
            ids.push(route.route_id());
        }
        agents.sort_unstable();
        agents.dedup();
        ids.sort_unstable();
        ids.dedup();
        Self {
            agents,
            routes: ids,
        }
    }

    pub fn color(&self, route: &Route) -> [u8; 3] {
        let hue = normalized_rank(&self.agents, route.agent_id());
        let saturation = normalized_rank(&self.routes, route.route_id());
        to_rgb8(hsv_to_rgb(hue, saturation, ROUTE_VALUE))
    }
}

/// Rank of `id` in sorted `ids` mapped onto `[0, 1]`; 0 for a single ID.
fn normalized_rank(ids: &[u32], id: u32) -> f64 {
    if ids.len() < 2 {
        return 0.0;
    }
    let rank = ids.binary_search(&id).unwrap_or_else(|insert| insert);
    rank as f64 / (ids.len() - 1) as f64
}
