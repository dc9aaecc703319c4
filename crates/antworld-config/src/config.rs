//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// An 8-bit RGB triple.
pub type Rgb8 = [u8; 3];

/// Top-level renderer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World dimensions, sky flags and colours.
    pub world: WorldConfig,
    /// Observer and sky-model settings.
    pub sky: SkyConfig,
    /// Where and how the demo writes its images.
    pub output: OutputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// World configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Default target width in pixels (x axis).
    pub width: u32,
    /// Default target length in pixels (y axis).
    pub length: u32,
    /// Default target height in pixels (z axis, panorama rows).
    pub height: u32,
    /// Paint a flat sky instead of sampling the sky model.
    pub uniform_sky: bool,
    /// Enable the polarisation filters of the compound eye.
    pub pol_filters: bool,
    /// Eye height above mid-height, as a fraction of the height.
    pub eye_height_fraction: f64,
    /// Fixed colours.
    pub palette: PaletteConfig,
}

/// Fixed colours.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaletteConfig {
    /// Background of both views below the horizon.
    pub ground: Rgb8,
    /// Vegetation colour used when generating worlds.
    pub grass: Rgb8,
    /// Flat sky colour used when `uniform_sky` is set.
    pub sky: Rgb8,
}

/// Observer and sky-model settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SkyConfig {
    /// Observer latitude in degrees (north positive).
    pub latitude_deg: f64,
    /// Observer longitude in degrees (east positive).
    pub longitude_deg: f64,
    /// Fixed day of the year (1..=366). `None` uses the system clock.
    pub day_of_year: Option<u32>,
    /// Fixed UTC time in hours. `None` uses the system clock.
    pub utc_hours: Option<f64>,
    /// Exposure applied before tone-mapping radiance into [0, 1].
    pub exposure: f32,
    /// Primary ray-march samples per direction.
    pub scatter_samples: u32,
    /// Secondary (towards the sun) samples per primary sample.
    pub light_samples: u32,
}

/// Output settings for the demo driver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory where images are written.
    pub directory: PathBuf,
    /// Top-view image size in pixels (square).
    pub top_view_size: u32,
    /// Also write the draw-operation logs as JSON.
    pub dump_draw_ops: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write JSON logs next to the images.
    pub file_logging: bool,
}

// --- Default implementations ---

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 36,
            length: 36,
            height: 10,
            uniform_sky: false,
            pol_filters: true,
            eye_height_fraction: 0.06,
            palette: PaletteConfig::default(),
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            ground: [229, 183, 90],
            grass: [0, 255, 0],
            sky: [13, 135, 201],
        }
    }
}

impl Default for SkyConfig {
    fn default() -> Self {
        // Seville, where the recorded routes come from.
        Self {
            latitude_deg: 37.392,
            longitude_deg: -5.984,
            day_of_year: None,
            utc_hours: None,
            exposure: 1.5,
            scatter_samples: 16,
            light_samples: 8,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("renders"),
            top_view_size: 500,
            dump_draw_ops: false,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            file_logging: false,
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Platform config directory (`~/.config/antworld` on Linux).
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("antworld"))
    }

    /// Reject settings the renderers cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        if world.width == 0 || world.length == 0 || world.height == 0 {
            return Err(ConfigError::InvalidValue {
                field: "world",
                reason: "width, length and height must be positive",
            });
        }
        if !world.eye_height_fraction.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "world.eye_height_fraction",
                reason: "must be finite",
            });
        }
        if !(-90.0..=90.0).contains(&self.sky.latitude_deg) {
            return Err(ConfigError::InvalidValue {
                field: "sky.latitude_deg",
                reason: "must lie in [-90, 90]",
            });
        }
        if let Some(day) = self.sky.day_of_year
            && !(1..=366).contains(&day)
        {
            return Err(ConfigError::InvalidValue {
                field: "sky.day_of_year",
                reason: "must lie in [1, 366]",
            });
        }
        if self.sky.exposure <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "sky.exposure",
                reason: "must be positive",
            });
        }
        if self.sky.scatter_samples == 0 || self.sky.light_samples == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sky",
                reason: "sample counts must be positive",
            });
        }
        Ok(())
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(false)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }
}
