pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::CONFIG_FILENAME;

#[derive(Parser)]
#[command(name = "windy-reporter")]
#[command(about = "Report Signal K wind observations to Windy.com")]
#[command(version)]
pub struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate telemetry and submit reports until interrupted
    Run(RunArgs),
    /// Write a new configuration file
    Init(InitArgs),
    /// Validate the configuration and print effective settings
    Check(CheckArgs),
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Path to the configuration file
    #[arg(long, default_value = CONFIG_FILENAME)]
    pub config: PathBuf,

    /// Windy API key (overrides the configuration file)
    #[arg(long, env = "WINDY_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Signal K server URL (overrides the configuration file)
    #[arg(long)]
    pub server_url: Option<String>,
}

#[derive(clap::Args)]
pub struct InitArgs {
    /// Path to write the configuration file
    #[arg(long, default_value = CONFIG_FILENAME)]
    pub config: PathBuf,

    /// Windy API key (obtain from stations.windy.com)
    #[arg(long, env = "WINDY_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Windy station ID
    #[arg(long, default_value = "100")]
    pub station_id: u64,

    /// Minutes between submissions
    #[arg(long, default_value = "5")]
    pub submit_interval: u64,

    /// Only accept positions from this source
    #[arg(long)]
    pub gps_source: Option<String>,

    /// Derive wind direction from heading and apparent wind angle
    #[arg(long)]
    pub calculate_direction: bool,

    /// Signal K server URL
    #[arg(long)]
    pub server_url: Option<String>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Path to the configuration file
    #[arg(long, default_value = CONFIG_FILENAME)]
    pub config: PathBuf,
}
