use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::aggregator::AggregationEngine;
use crate::cli::RunArgs;
use crate::config::{load_config_from_path, Config};
use crate::scheduler::SubmissionScheduler;
use crate::service::Reporter;
use crate::signalk::{fetch_vessel_name, run_stream, StreamSettings};
use crate::submit::WindyClient;

const NAME_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn execute_run(args: RunArgs) -> Result<()> {
    let mut config = load_config_from_path(&args.config)?;
    if let Some(api_key) = args.api_key {
        config.api_key = api_key;
    }
    if let Some(server_url) = args.server_url {
        config.server_url = server_url;
    }
    config.validate().context("Refusing to start")?;

    let name = resolve_station_name(&config).await;
    let client = WindyClient::new(config.api_base.clone(), config.api_key.clone())
        .map_err(anyhow::Error::msg)?;
    let scheduler = SubmissionScheduler::new(config.station_info(name), Arc::new(client));
    let engine = AggregationEngine::new(config.engine_settings());
    let reporter = Reporter::new(
        engine,
        scheduler,
        config.submit_every(),
        config.status_every(),
    );

    let (tx, rx) = mpsc::unbounded_channel();
    let stream_settings = StreamSettings::new(
        config.server_url.clone(),
        config.telemetry_paths(),
        config.poll_every(),
    );
    let stream = tokio::spawn(run_stream(stream_settings, tx));

    info!(
        interval_minutes = config.submit_interval,
        station_id = config.station_id,
        "starting submission process"
    );
    reporter.run(rx, shutdown_signal()).await;
    stream.abort();

    Ok(())
}

/// Configured name, else the vessel name from the server, else empty.
async fn resolve_station_name(config: &Config) -> String {
    if let Some(name) = config.name.as_deref().filter(|n| !n.trim().is_empty()) {
        return name.to_string();
    }

    let client = match reqwest::Client::builder()
        .timeout(NAME_LOOKUP_TIMEOUT)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "failed to build HTTP client for vessel name lookup");
            return String::new();
        }
    };

    match fetch_vessel_name(&client, &config.server_url).await {
        Ok(Some(name)) => {
            info!(name = %name, "using vessel name as station name");
            name
        }
        Ok(None) => String::new(),
        Err(e) => {
            warn!(error = %e, "could not read vessel name");
            String::new()
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
