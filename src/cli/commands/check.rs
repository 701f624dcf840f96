use anyhow::{Context, Result};

use crate::cli::CheckArgs;
use crate::config::load_config_from_path;

pub fn execute_check(args: CheckArgs) -> Result<()> {
    let config = load_config_from_path(&args.config)?;
    config
        .validate()
        .with_context(|| format!("Invalid configuration in {}", args.config.display()))?;

    let paths = config.telemetry_paths();
    println!("Configuration OK: {}", args.config.display());
    println!("  station_id: {}", config.station_id);
    println!("  submit_interval: {} minutes", config.submit_interval);
    println!("  server_url: {}", config.server_url);
    println!("  wind speed path: {}", paths.wind_speed);
    println!("  wind direction path: {}", paths.wind_direction);
    println!("  direction mode: {:?}", config.direction_mode());
    match config.engine_settings().gps_source {
        Some(source) => println!("  position source: {}", source),
        None => println!("  position source: any"),
    }

    Ok(())
}
