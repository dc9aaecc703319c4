//! Seeded synthetic world: a ground square scattered with grass tussocks,
//! plus one foraging trip of a single agent.

use std::f64::consts::TAU;

use antworld_config::PaletteConfig;
use antworld_geometry::{GeometryError, Polygon, PolygonSet, Route};
use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Side of the ground square in metres.
pub const WORLD_SIZE_M: f64 = 10.0;

/// Seconds between recorded route positions.
pub const ROUTE_DT: f64 = 0.1;

const ROUTE_STEPS: usize = 120;
const BLADES_PER_TUSSOCK: usize = 5;
const ANT_HEIGHT_M: f64 = 0.01;

pub const NEST: DVec3 = DVec3::new(5.0, 1.5, ANT_HEIGHT_M);
pub const FEEDER: DVec3 = DVec3::new(5.0, 8.5, ANT_HEIGHT_M);

/// Ground square followed by `tussocks` clumps of upright grass blades.
/// The same seed always gives the same world.
pub fn synthetic_world(seed: u64, tussocks: usize, palette: &PaletteConfig) -> PolygonSet {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut polygons = PolygonSet::new(vec![Polygon::new(
        vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(WORLD_SIZE_M, 0.0, 0.0),
            DVec3::new(WORLD_SIZE_M, WORLD_SIZE_M, 0.0),
            DVec3::new(0.0, WORLD_SIZE_M, 0.0),
        ],
        palette.ground,
    )]);

    for _ in 0..tussocks {
        let centre = DVec3::new(
            rng.random_range(0.5..WORLD_SIZE_M - 0.5),
            rng.random_range(0.5..WORLD_SIZE_M - 0.5),
            0.0,
        );
        let height = rng.random_range(0.15..0.6);
        let spread = rng.random_range(0.05..0.2);
        for _ in 0..BLADES_PER_TUSSOCK {
            let angle = rng.random::<f64>() * TAU;
            let base = centre + DVec3::new(angle.cos(), angle.sin(), 0.0) * spread * rng.random::<f64>();
            let across = DVec3::new(-angle.sin(), angle.cos(), 0.0) * 0.03;
            let lean = DVec3::new(angle.cos(), angle.sin(), 0.0) * spread;
            let tip = base + lean + DVec3::Z * height * rng.random_range(0.6..1.0);
            polygons.push(Polygon::new(vec![base - across, base + across, tip], palette.grass));
        }
    }
    polygons
}

/// Outbound route (1) winding from nest to feeder, and the straight homing
/// route (2) back, both for agent 1.
pub fn foraging_trip(seed: u64) -> Result<[Route; 2], GeometryError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    let phase = rng.random::<f64>() * TAU;
    let amplitude = rng.random_range(0.5..1.5);

    let learned = (0..=ROUTE_STEPS)
        .map(|i| {
            let t = i as f64 / ROUTE_STEPS as f64;
            let wiggle = amplitude * (t * TAU * 1.5 + phase).sin() * (t * std::f64::consts::PI).sin();
            NEST.lerp(FEEDER, t) + DVec3::X * (wiggle + rng.random_range(-0.05..0.05))
        })
        .collect();

    let homing = (0..=ROUTE_STEPS / 2)
        .map(|i| FEEDER.lerp(NEST, i as f64 / (ROUTE_STEPS / 2) as f64))
        .collect();

    Ok([
        Route::new(learned, 1, 1, ROUTE_DT)?,
        Route::new(homing, 1, 2, ROUTE_DT)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_is_deterministic() {
        let palette = PaletteConfig::default();
        assert_eq!(synthetic_world(7, 10, &palette), synthetic_world(7, 10, &palette));
        assert_ne!(synthetic_world(7, 10, &palette), synthetic_world(8, 10, &palette));
    }

    #[test]
    fn test_world_layout() {
        let palette = PaletteConfig::default();
        let world = synthetic_world(3, 4, &palette);
        assert_eq!(world.len(), 1 + 4 * BLADES_PER_TUSSOCK);
        assert_eq!(world.as_slice()[0].color, palette.ground);
        assert!(world.iter().skip(1).all(|p| p.color == palette.grass && p.len() == 3));
        assert_eq!(world.max_abs_coordinate(), WORLD_SIZE_M);
    }

    #[test]
    fn test_trip_runs_between_nest_and_feeder() {
        let [learned, homing] = foraging_trip(42).unwrap();
        assert_eq!((learned.agent_id(), learned.route_id()), (1, 1));
        assert_eq!((homing.agent_id(), homing.route_id()), (1, 2));
        assert!((learned.positions()[0] - NEST).length() < 0.1);
        assert!((learned.positions()[ROUTE_STEPS] - FEEDER).length() < 0.1);
        assert_eq!(homing.positions()[0], FEEDER);
        assert!((learned.duration() - ROUTE_STEPS as f64 * ROUTE_DT).abs() < 1e-9);
    }
}
