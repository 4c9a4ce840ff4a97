//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Fauna using clap.

pub mod commands;

use crate::config::{load_config, load_config_or_default, FaunaConfig};
use clap::{Parser, Subcommand};

/// Configuration file read when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "fauna.toml";

/// Fauna - resilient ETL for the animal service
#[derive(Parser, Debug)]
#[command(name = "fauna")]
#[command(version, about, long_about = None)]
#[command(author = "Fauna Contributors")]
pub struct Cli {
    /// Path to configuration file [default: fauna.toml, optional]
    #[arg(short, long, env = "FAUNA_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "FAUNA_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Path of the configuration file in effect
    pub fn config_path(&self) -> &str {
        self.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH)
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract, transform and load every animal
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Check that the animal service is reachable
    Health(commands::health::HealthArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Load the configuration for a command
///
/// An explicitly named file must exist. Without one, `fauna.toml` is read if
/// present, otherwise defaults plus `FAUNA_*` overrides are used.
pub fn resolve_config(explicit_path: Option<&str>) -> crate::domain::Result<FaunaConfig> {
    match explicit_path {
        Some(path) => load_config(path),
        None => load_config_or_default(DEFAULT_CONFIG_PATH),
    }
}
