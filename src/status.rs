//! Human-readable status line, refreshed on its own timer.

use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;
use tracing::info;

use crate::aggregator::AggregationEngine;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

const WAITING: &str = "Waiting for wind data";

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

/// Format an elapsed time in the largest whole unit, e.g. "3 hours".
pub fn time_since(elapsed: Duration) -> String {
    let seconds = elapsed.num_seconds().max(0);
    let units = [
        (YEAR, "year"),
        (MONTH, "month"),
        (DAY, "day"),
        (HOUR, "hour"),
        (MINUTE, "minute"),
    ];
    for (size, unit) in units {
        if seconds >= size {
            return plural(seconds / size, unit);
        }
    }
    plural(seconds, "second")
}

/// Render the status line for the current engine state.
pub fn render(engine: &AggregationEngine, now: DateTime<Utc>) -> String {
    let mut message = String::new();
    if let Some(last) = engine.last_success() {
        message.push_str(&format!(
            "Successful submission {} ago. ",
            time_since(now - last)
        ));
    }

    let samples = engine.samples();
    if let (Some(latest), Some(gust)) = (samples.latest(), samples.gust()) {
        let direction = engine
            .direction()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        message.push_str(&format!(
            "Wind speed is {}m/s and max gust is {}m/s. Direction is {}",
            latest, gust, direction
        ));
    }

    let message = message.trim_end();
    if message.is_empty() {
        WAITING.to_string()
    } else {
        message.to_string()
    }
}

/// Publishes the status line. Only ever reads the engine.
pub struct StatusReporter {
    tx: watch::Sender<String>,
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusReporter {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(WAITING.to_string());
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> String {
        self.tx.borrow().clone()
    }

    /// Replace the status with a fixed message (startup, shutdown).
    pub fn set(&self, message: impl Into<String>) {
        let message = message.into();
        info!(status = %message, "status");
        self.tx.send_replace(message);
    }

    pub fn tick(&self, engine: &AggregationEngine, now: DateTime<Utc>) -> String {
        let message = render(engine, now);
        self.set(message.clone());
        message
    }
}
