// src/submit/record.rs
//! Wire types for the Windy station update API.

use serde::{Deserialize, Serialize};

use crate::aggregator::ReadySnapshot;

pub const SHARE_OPTION: &str = "Open";
pub const STATION_TYPE: &str = "Signal K Windy Reporter";
pub const STATION_ELEVATION: f64 = 1.0;

/// Station identity, fixed for the lifetime of the process
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StationInfo {
    pub id: u64,
    pub name: String,
    pub provider: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub station: u64,
    pub name: String,
    pub share_option: String,
    #[serde(rename = "type")]
    pub station_type: String,
    pub provider: String,
    pub url: String,
    pub lat: f64,
    pub lon: f64,
    pub elevation: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub station: u64,
    /// Median wind speed, m/s
    pub wind: f64,
    pub gust: f64,
    pub winddir: u16,
}

/// Body of one update request. Built per submission and dropped afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub stations: Vec<Station>,
    pub observations: Vec<Observation>,
}

impl SubmissionRecord {
    pub fn build(info: &StationInfo, snapshot: &ReadySnapshot) -> Self {
        let station = Station {
            station: info.id,
            name: info.name.clone(),
            share_option: SHARE_OPTION.to_string(),
            station_type: STATION_TYPE.to_string(),
            provider: info.provider.clone(),
            url: info.url.clone(),
            lat: snapshot.position.latitude,
            lon: snapshot.position.longitude,
            elevation: STATION_ELEVATION,
        };
        let observation = Observation {
            station: info.id,
            wind: snapshot.wind,
            gust: snapshot.gust,
            winddir: snapshot.direction,
        };
        Self {
            stations: vec![station],
            observations: vec![observation],
        }
    }

    pub fn observation(&self) -> Option<&Observation> {
        self.observations.first()
    }
}
