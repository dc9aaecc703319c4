//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Renderer command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "antworld", about = "Top-down and panoramic renders of the ant world")]
pub struct CliArgs {
    /// World width in pixels.
    #[arg(long)]
    pub width: Option<u32>,

    /// World length in pixels.
    #[arg(long)]
    pub length: Option<u32>,

    /// World height in pixels.
    #[arg(long)]
    pub height: Option<u32>,

    /// Paint a flat sky instead of sampling the sky model.
    #[arg(long)]
    pub uniform_sky: Option<bool>,

    /// Enable the polarisation filters of the eye.
    #[arg(long)]
    pub pol_filters: Option<bool>,

    /// Observer latitude in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub latitude: Option<f64>,

    /// Observer longitude in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub longitude: Option<f64>,

    /// Day of the year (1-366).
    #[arg(long)]
    pub day_of_year: Option<u32>,

    /// UTC time in hours.
    #[arg(long)]
    pub utc_hours: Option<f64>,

    /// Output directory for images.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.world.width = w;
        }
        if let Some(l) = args.length {
            self.world.length = l;
        }
        if let Some(h) = args.height {
            self.world.height = h;
        }
        if let Some(uniform) = args.uniform_sky {
            self.world.uniform_sky = uniform;
        }
        if let Some(pol) = args.pol_filters {
            self.world.pol_filters = pol;
        }
        if let Some(lat) = args.latitude {
            self.sky.latitude_deg = lat;
        }
        if let Some(lon) = args.longitude {
            self.sky.longitude_deg = lon;
        }
        if args.day_of_year.is_some() {
            self.sky.day_of_year = args.day_of_year;
        }
        if args.utc_hours.is_some() {
            self.sky.utc_hours = args.utc_hours;
        }
        if let Some(ref dir) = args.output {
            self.output.directory = dir.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
