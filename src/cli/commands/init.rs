use anyhow::{bail, Result};

use crate::cli::InitArgs;
use crate::config::Config;

pub fn execute_init(args: InitArgs) -> Result<()> {
    // Check if config already exists
    if args.config.exists() && !args.force {
        bail!(
            "{} already exists. Use --force to overwrite.",
            args.config.display()
        );
    }

    let mut config = Config {
        api_key: args.api_key,
        station_id: args.station_id,
        submit_interval: args.submit_interval,
        gps_source: args.gps_source,
        calculate_direction: args.calculate_direction,
        ..Default::default()
    };
    if let Some(server_url) = args.server_url {
        config.server_url = server_url;
    }
    config.validate()?;
    config.save_to(&args.config)?;

    eprintln!("Created {}", args.config.display());
    eprintln!("  station_id: {}", config.station_id);
    eprintln!("  submit_interval: {} minutes", config.submit_interval);
    eprintln!("  server_url: {}", config.server_url);
    eprintln!();
    eprintln!("Next: windy-reporter run --config {}", args.config.display());

    Ok(())
}
