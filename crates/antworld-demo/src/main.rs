//! Renders the ant world to PNG files.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p antworld-demo` to render the seeded synthetic world.
//! Run with `cargo run -p antworld-demo -- --world polygons.ron --route r1.ron`
//! to render recorded data instead.

mod scene;

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use antworld_config::{CliArgs, Config, ConfigError};
use antworld_geometry::{GeometryError, PolygonSet, Route, io};
use antworld_render::{
    Frame, OrthographicRenderer, PanoramaRequest, PanoramicRenderer, RenderError, ViewSize,
    Viewpoint, WorldState,
};
use antworld_sky::{ScatteringSky, SkyError};
use clap::Parser;
use tracing::info;

/// Demo command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "antworld-demo", about = "Render top-down and panoramic views of the ant world")]
struct DemoArgs {
    #[command(flatten)]
    cli: CliArgs,

    /// Agent heading for the panorama, in degrees counter-clockwise from +x.
    #[arg(long, default_value_t = 90.0, allow_hyphen_values = true)]
    heading: f64,

    /// Seed for the synthetic world.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of grass tussocks in the synthetic world.
    #[arg(long, default_value_t = 60)]
    tussocks: usize,

    /// Polygon file (RON) to render instead of the synthetic world.
    #[arg(long)]
    world: Option<PathBuf>,

    /// Route files (RON) to overlay; repeatable.
    #[arg(long = "route")]
    routes: Vec<PathBuf>,

    /// Write the draw logs next to the images as JSON.
    #[arg(long)]
    dump_ops: bool,
}

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("no config directory available; pass --config")]
    NoConfigDir,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Sky(#[from] SkyError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to write image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode draw ops: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() {
    let args = DemoArgs::parse();
    if let Err(e) = run(args) {
        eprintln!("antworld-demo: {e}");
        std::process::exit(1);
    }
}

fn run(args: DemoArgs) -> Result<(), DemoError> {
    let config_dir = args
        .cli
        .config
        .clone()
        .or_else(Config::default_dir)
        .ok_or(DemoError::NoConfigDir)?;

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args.cli);
    config.validate()?;

    let log_dir = config_dir.join("logs");
    let file_logging = cfg!(debug_assertions) || config.debug.file_logging;
    antworld_log::init_logging(Some(&log_dir), file_logging, Some(&config));

    let out_dir = config.output.directory.clone();
    fs::create_dir_all(&out_dir).map_err(|source| DemoError::Io {
        path: out_dir.clone(),
        source,
    })?;

    let (polygons, routes) = load_scene(&args, &config, &out_dir)?;
    for route in &routes {
        info!(
            agent = route.agent_id(),
            route = route.route_id(),
            positions = route.len(),
            duration_s = route.duration(),
            "route"
        );
    }

    let sky = ScatteringSky::from_config(&config.sky)?;
    let mut world = WorldState::new(polygons, Box::new(sky), &config.world)?;
    // The panorama is taken where the last route ends.
    let end = routes.last().and_then(|r| r.positions().last().copied());
    for route in routes {
        world.add_route(route);
    }
    info!(ratio_to_meters = world.ratio_to_meters(), "world ready");

    let top = OrthographicRenderer.render(&world, ViewSize::square(config.output.top_view_size))?;
    let dump_ops = args.dump_ops || config.output.dump_draw_ops;
    write_frame(&top, &out_dir.join("top_view.png"), dump_ops)?;

    let viewpoint = match end {
        Some(p) => Viewpoint {
            x: Some(p.x),
            y: Some(p.y),
            z: None,
        },
        None => Viewpoint::default(),
    };
    let clock_pinned = config.sky.day_of_year.is_some() || config.sky.utc_hours.is_some();
    let request = PanoramaRequest::new(viewpoint, args.heading.to_radians())
        .with_sky_refresh(!clock_pinned);
    let panorama = PanoramicRenderer.render(&mut world, &request)?;
    write_frame(&panorama, &out_dir.join("panorama.png"), dump_ops)?;

    info!(directory = %out_dir.display(), "renders written");
    Ok(())
}

/// Polygons and routes from files when given, otherwise the synthetic
/// scene, which is also saved to `out_dir` for later reuse.
fn load_scene(
    args: &DemoArgs,
    config: &Config,
    out_dir: &Path,
) -> Result<(PolygonSet, Vec<Route>), DemoError> {
    let routes = args
        .routes
        .iter()
        .map(|path| io::load_route(path))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(path) = &args.world {
        let polygons = io::load_polygons(path)?;
        info!(path = %path.display(), polygons = polygons.len(), "world loaded from file");
        return Ok((polygons, routes));
    }

    let polygons = scene::synthetic_world(args.seed, args.tussocks, &config.world.palette);
    io::save_polygons(&polygons, &out_dir.join("world.ron"))?;

    let routes = if routes.is_empty() {
        let trip = scene::foraging_trip(args.seed)?;
        for route in &trip {
            let name = format!("route_{}_{}.ron", route.agent_id(), route.route_id());
            io::save_route(route, &out_dir.join(name))?;
        }
        trip.into()
    } else {
        routes
    };
    info!(seed = args.seed, polygons = polygons.len(), "synthetic world generated");
    Ok((polygons, routes))
}

fn write_frame(frame: &Frame, path: &Path, dump_ops: bool) -> Result<(), DemoError> {
    frame.image.save(path).map_err(|source| DemoError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        width = frame.width(),
        height = frame.height(),
        ops = frame.ops.len(),
        "image written"
    );

    if dump_ops {
        let ops_path = path.with_extension("ops.json");
        let file = File::create(&ops_path).map_err(|source| DemoError::Io {
            path: ops_path.clone(),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), &frame.ops)?;
        info!(path = %ops_path.display(), "draw log written");
    }
    Ok(())
}
