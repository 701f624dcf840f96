//! Decoding of Signal K delta messages into flat path/value/source updates.

use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

/// Vessel position in decimal degrees
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, serde::Serialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// A single path/value/source update
#[derive(Clone, Debug, PartialEq)]
pub struct Delta {
    pub path: String,
    pub value: JsonValue,
    pub source: Option<String>,
}

impl Delta {
    pub fn new(path: impl Into<String>, value: JsonValue, source: Option<&str>) -> Self {
        Self {
            path: path.into(),
            value,
            source: source.map(str::to_string),
        }
    }

    /// Numeric payload, if the value is a finite number
    pub fn as_number(&self) -> Option<f64> {
        self.value.as_f64().filter(|v| v.is_finite())
    }

    /// Position payload, if the value carries latitude and longitude
    pub fn as_position(&self) -> Option<Position> {
        let latitude = self.value.get("latitude")?.as_f64()?;
        let longitude = self.value.get("longitude")?.as_f64()?;
        Some(Position {
            latitude,
            longitude,
        })
    }
}

/// Receiver of telemetry updates, one call per path/value/source.
pub trait TelemetrySubscriber {
    fn on_update(&mut self, path: &str, value: JsonValue, source: Option<&str>);

    fn on_delta(&mut self, delta: Delta) {
        self.on_update(&delta.path, delta.value, delta.source.as_deref());
    }
}

#[derive(Debug, Default, Deserialize)]
struct DeltaMessage {
    #[serde(default)]
    updates: Vec<Update>,
}

#[derive(Debug, Default, Deserialize)]
struct Update {
    #[serde(rename = "$source", default)]
    source_ref: Option<String>,
    #[serde(default)]
    source: Option<JsonValue>,
    #[serde(default)]
    values: Vec<PathValue>,
}

#[derive(Debug, Deserialize)]
struct PathValue {
    path: String,
    #[serde(default)]
    value: JsonValue,
}

impl Update {
    /// `$source` is the canonical reference; older servers only send a
    /// `source.label`.
    fn source_label(&self) -> Option<String> {
        self.source_ref.clone().or_else(|| {
            self.source
                .as_ref()
                .and_then(|s| s.get("label"))
                .and_then(|l| l.as_str())
                .map(str::to_string)
        })
    }
}

/// Decode one stream message into deltas.
///
/// Messages that are not deltas (the server hello, malformed JSON, updates
/// without values) decode to an empty list.
pub fn decode_message(text: &str) -> Vec<Delta> {
    let message: DeltaMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => {
            debug!(error = %e, "ignoring undecodable stream message");
            return Vec::new();
        }
    };

    let mut deltas = Vec::new();
    for update in message.updates {
        let source = update.source_label();
        for pv in update.values {
            if pv.value.is_null() {
                continue;
            }
            deltas.push(Delta {
                path: pv.path,
                value: pv.value,
                source: source.clone(),
            });
        }
    }
    deltas
}
