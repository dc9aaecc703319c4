//! Configuration for the antworld renderers.
//!
//! Settings persist to disk as RON files, can be overridden from the command
//! line via clap, and tolerate missing or unknown fields so older files keep
//! loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, OutputConfig, PaletteConfig, Rgb8, SkyConfig, WorldConfig,
};
pub use error::ConfigError;
