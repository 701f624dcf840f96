use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::aggregator::{DirectionMode, EngineSettings};
use crate::submit::client::DEFAULT_API_BASE;
use crate::submit::StationInfo;
use crate::telemetry::{TelemetryPaths, DEFAULT_WIND_DIRECTION_PATH, DEFAULT_WIND_SPEED_PATH};

pub const CONFIG_FILENAME: &str = "windy-reporter.toml";

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

/// One week
pub const MAX_SUBMIT_INTERVAL: u64 = 7 * 24 * 60;

fn default_submit_interval() -> u64 {
    5
}

fn default_station_id() -> u64 {
    100
}

fn default_wind_speed_path() -> String {
    DEFAULT_WIND_SPEED_PATH.to_string()
}

fn default_wind_direction_path() -> String {
    DEFAULT_WIND_DIRECTION_PATH.to_string()
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_status_interval() -> u64 {
    10
}

fn default_poll_period() -> u64 {
    1000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Windy station API key (obtain from stations.windy.com)
    #[serde(default)]
    pub api_key: String,
    /// Minutes between submissions
    #[serde(default = "default_submit_interval")]
    pub submit_interval: u64,
    #[serde(default = "default_station_id")]
    pub station_id: u64,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub url: String,
    /// Only accept positions from this source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gps_source: Option<String>,
    #[serde(default = "default_wind_speed_path")]
    pub wind_speed_path: String,
    #[serde(default = "default_wind_direction_path")]
    pub wind_direction_path: String,
    /// Derive direction from heading and apparent wind angle
    #[serde(default)]
    pub calculate_direction: bool,
    /// Station name; looked up from the server when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Seconds between status updates
    #[serde(default = "default_status_interval")]
    pub status_interval: u64,
    /// Subscription period in milliseconds
    #[serde(default = "default_poll_period")]
    pub poll_period: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            submit_interval: default_submit_interval(),
            station_id: default_station_id(),
            provider: String::new(),
            url: String::new(),
            gps_source: None,
            wind_speed_path: default_wind_speed_path(),
            wind_direction_path: default_wind_direction_path(),
            calculate_direction: false,
            name: None,
            server_url: default_server_url(),
            api_base: default_api_base(),
            status_interval: default_status_interval(),
            poll_period: default_poll_period(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        load_config_from_path(CONFIG_FILENAME)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write {}", path.as_ref().display()))?;
        Ok(())
    }

    /// Startup preconditions. A failure here means the reporter must not run.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            bail!("API key is required");
        }
        if self.submit_interval == 0 {
            bail!("submit_interval must be at least 1 minute");
        }
        if self.submit_interval > MAX_SUBMIT_INTERVAL {
            bail!(
                "submit_interval must be at most {} minutes",
                MAX_SUBMIT_INTERVAL
            );
        }
        if self.status_interval == 0 {
            bail!("status_interval must be at least 1 second");
        }
        if self.poll_period == 0 {
            bail!("poll_period must be positive");
        }
        Ok(())
    }

    pub fn direction_mode(&self) -> DirectionMode {
        if self.calculate_direction {
            DirectionMode::Computed
        } else {
            DirectionMode::Direct
        }
    }

    /// Telemetry paths, falling back to defaults for blank entries
    pub fn telemetry_paths(&self) -> TelemetryPaths {
        let pick = |value: &str, default: &str| {
            if value.trim().is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };
        TelemetryPaths::new(
            pick(&self.wind_speed_path, DEFAULT_WIND_SPEED_PATH),
            pick(&self.wind_direction_path, DEFAULT_WIND_DIRECTION_PATH),
        )
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            paths: self.telemetry_paths(),
            gps_source: self
                .gps_source
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            direction_mode: self.direction_mode(),
        }
    }

    pub fn station_info(&self, name: impl Into<String>) -> StationInfo {
        StationInfo {
            id: self.station_id,
            name: name.into(),
            provider: self.provider.clone(),
            url: self.url.clone(),
        }
    }

    pub fn submit_every(&self) -> Duration {
        Duration::from_secs(self.submit_interval.saturating_mul(60))
    }

    pub fn status_every(&self) -> Duration {
        Duration::from_secs(self.status_interval)
    }

    pub fn poll_every(&self) -> Duration {
        Duration::from_millis(self.poll_period)
    }
}

pub fn load_config_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let content = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.as_ref().display()))?;
    Ok(config)
}
