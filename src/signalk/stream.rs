// src/signalk/stream.rs
use anyhow::Result;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value as JsonValue};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use super::websocket_base;
use crate::delta::{decode_message, Delta};
use crate::telemetry::TelemetryPaths;

const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Silence longer than this many subscription periods drops the connection
const IDLE_PERIODS: u32 = 10;

const MIN_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for the delta stream
#[derive(Clone, Debug)]
pub struct StreamSettings {
    pub server_url: String,
    pub paths: TelemetryPaths,
    pub period: Duration,
    pub reconnect_delay: Duration,
    /// A connection with no frames for this long is treated as closed
    pub idle_timeout: Duration,
}

impl StreamSettings {
    pub fn new(server_url: impl Into<String>, paths: TelemetryPaths, period: Duration) -> Self {
        Self {
            server_url: server_url.into(),
            paths,
            period,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
            idle_timeout: period.saturating_mul(IDLE_PERIODS).max(MIN_IDLE_TIMEOUT),
        }
    }
}

enum StreamEnd {
    /// The server closed the connection
    Closed,
    /// Nobody is listening for deltas any more
    ReceiverClosed,
}

/// Stream endpoint without the default subscription; the reporter sends
/// its own subscribe message after connecting.
pub fn stream_url(server_url: &str) -> String {
    format!(
        "{}/signalk/v1/stream?subscribe=none",
        websocket_base(server_url)
    )
}

pub fn subscription_message(paths: &TelemetryPaths, period: Duration) -> JsonValue {
    let period_ms = period.as_millis() as u64;
    let subscribe: Vec<JsonValue> = paths
        .subscription_paths()
        .into_iter()
        .map(|path| json!({ "path": path, "period": period_ms }))
        .collect();
    json!({
        "context": "vessels.self",
        "subscribe": subscribe,
    })
}

async fn stream_once(settings: &StreamSettings, tx: &UnboundedSender<Delta>) -> Result<StreamEnd> {
    let url = stream_url(&settings.server_url);
    debug!(url = %url, "connecting to delta stream");

    let (ws_stream, _) = connect_async(&url).await?;
    let (mut write, mut read) = ws_stream.split();

    let subscribe = subscription_message(&settings.paths, settings.period);
    write.send(Message::Text(subscribe.to_string())).await?;
    info!(url = %url, "subscribed to delta stream");

    loop {
        let msg = match tokio::time::timeout(settings.idle_timeout, read.next()).await {
            Ok(Some(msg)) => msg,
            Ok(None) => return Ok(StreamEnd::Closed),
            Err(_) => {
                warn!(
                    idle_ms = settings.idle_timeout.as_millis() as u64,
                    "no data on delta stream"
                );
                return Ok(StreamEnd::Closed);
            }
        };
        match msg? {
            Message::Text(text) => {
                for delta in decode_message(&text) {
                    if tx.send(delta).is_err() {
                        return Ok(StreamEnd::ReceiverClosed);
                    }
                }
            }
            Message::Close(_) => return Ok(StreamEnd::Closed),
            _ => {}
        }
    }
}

/// Forward deltas from the server until the receiver is dropped,
/// reconnecting after errors or server-side closes.
pub async fn run_stream(settings: StreamSettings, tx: UnboundedSender<Delta>) {
    loop {
        match stream_once(&settings, &tx).await {
            Ok(StreamEnd::ReceiverClosed) => return,
            Ok(StreamEnd::Closed) => warn!("delta stream closed by server"),
            Err(e) => warn!(error = %e, "delta stream error"),
        }
        if tx.is_closed() {
            return;
        }
        debug!(
            delay_ms = settings.reconnect_delay.as_millis() as u64,
            "reconnecting to delta stream"
        );
        tokio::time::sleep(settings.reconnect_delay).await;
    }
}
