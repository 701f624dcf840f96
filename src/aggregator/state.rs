// src/aggregator/state.rs
//! The owned aggregation state that deltas are applied to.

use chrono::{DateTime, Utc};
use std::fmt;
use tracing::debug;

use super::direction::{DirectionMode, DirectionResolver};
use super::samples::SampleBuffer;
use crate::delta::{Delta, Position, TelemetrySubscriber};
use crate::telemetry::{TelemetryKind, TelemetryPaths};

/// Static engine settings, taken from configuration at startup.
#[derive(Clone, Debug, Default)]
pub struct EngineSettings {
    pub paths: TelemetryPaths,
    /// Only position updates from this source are accepted when set
    pub gps_source: Option<String>,
    pub direction_mode: DirectionMode,
}

/// Coarse view of how much of an observation has been collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Partial,
    Ready,
}

/// Which inputs are still missing for a submission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MissingData {
    pub position: bool,
    pub speed: bool,
    pub direction: bool,
}

impl MissingData {
    pub fn is_none(&self) -> bool {
        !(self.position || self.speed || self.direction)
    }
}

impl fmt::Display for MissingData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields = Vec::with_capacity(3);
        if self.position {
            fields.push("position");
        }
        if self.speed {
            fields.push("wind speed");
        }
        if self.direction {
            fields.push("wind direction");
        }
        if fields.is_empty() {
            write!(f, "nothing missing")
        } else {
            write!(f, "no {} data", fields.join(", no "))
        }
    }
}

/// Everything needed to build one observation, read in a single step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReadySnapshot {
    pub position: Position,
    /// Median wind speed, m/s, two decimals
    pub wind: f64,
    pub gust: f64,
    pub direction: u16,
    pub receipt: SubmissionReceipt,
}

/// Marks how much of the series a submission covered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub sample_count: usize,
}

/// Per-window aggregation state.
///
/// Owned by a single task; every mutation goes through `&mut self`.
#[derive(Debug)]
pub struct AggregationEngine {
    paths: TelemetryPaths,
    gps_source: Option<String>,
    resolver: DirectionResolver,

    position: Option<Position>,
    samples: SampleBuffer,
    direction: Option<u16>,

    // Latest navigation readings. These are not part of the window and
    // survive resets.
    heading: Option<f64>,
    apparent_angle: Option<f64>,

    last_success: Option<DateTime<Utc>>,
}

impl AggregationEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            paths: settings.paths,
            gps_source: settings.gps_source,
            resolver: DirectionResolver::new(settings.direction_mode),
            position: None,
            samples: SampleBuffer::new(),
            direction: None,
            heading: None,
            apparent_angle: None,
            last_success: None,
        }
    }

    pub fn paths(&self) -> &TelemetryPaths {
        &self.paths
    }

    /// Apply one delta. Unknown paths and malformed values are no-ops.
    pub fn apply(&mut self, delta: &Delta) {
        let kind = self.paths.resolve(&delta.path);
        match kind {
            TelemetryKind::Position => match delta.as_position() {
                Some(position) => {
                    self.apply_position_update(position, delta.source.as_deref());
                }
                None => debug!(path = %delta.path, "ignoring malformed position"),
            },
            TelemetryKind::Unknown => {
                debug!(path = %delta.path, "unknown path");
            }
            _ => match delta.as_number() {
                Some(value) => self.apply_number(kind, value),
                None => debug!(path = %delta.path, "ignoring non-numeric value"),
            },
        }
    }

    fn apply_number(&mut self, kind: TelemetryKind, value: f64) {
        match kind {
            TelemetryKind::WindSpeed => self.apply_speed_update(value),
            TelemetryKind::WindDirection => self.apply_direction_update(value),
            TelemetryKind::Heading => self.apply_heading_update(value),
            TelemetryKind::ApparentAngle => self.apply_apparent_angle_update(value),
            TelemetryKind::Position | TelemetryKind::Unknown => {}
        }
    }

    /// Overwrite the position unless a source filter rejects it.
    /// Returns whether the update was taken.
    pub fn apply_position_update(&mut self, position: Position, source: Option<&str>) -> bool {
        if let Some(filter) = &self.gps_source {
            if source != Some(filter.as_str()) {
                debug!(source = ?source, filter = %filter, "position from filtered source");
                return false;
            }
        }
        self.position = Some(position);
        true
    }

    /// Record a wind speed sample. In computed mode this also refreshes the
    /// direction from the latest heading and apparent angle.
    pub fn apply_speed_update(&mut self, value: f64) {
        self.samples.add_sample(value);

        if self.resolver.mode() == DirectionMode::Computed {
            debug!(
                heading = ?self.heading,
                apparent_angle = ?self.apparent_angle,
                "computing wind direction"
            );
            if let Some(direction) = self.resolver.from_heading(self.heading, self.apparent_angle)
            {
                self.direction = Some(direction);
            }
        }
    }

    /// Sensor direction in radians; ignored in computed mode.
    pub fn apply_direction_update(&mut self, radians: f64) {
        if let Some(direction) = self.resolver.from_sensor(radians) {
            self.direction = Some(direction);
        }
    }

    pub fn apply_heading_update(&mut self, radians: f64) {
        self.heading = Some(radians);
    }

    pub fn apply_apparent_angle_update(&mut self, radians: f64) {
        self.apparent_angle = Some(radians);
    }

    pub fn missing(&self) -> MissingData {
        MissingData {
            position: self.position.is_none(),
            speed: self.samples.is_empty(),
            direction: self.direction.is_none(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.missing().is_none()
    }

    pub fn phase(&self) -> Phase {
        let missing = self.missing();
        if missing.is_none() {
            Phase::Ready
        } else if missing.position && missing.speed && missing.direction {
            Phase::Empty
        } else {
            Phase::Partial
        }
    }

    /// Read and reduce the window for submission.
    pub fn snapshot(&self) -> Result<ReadySnapshot, MissingData> {
        let missing = self.missing();
        match (self.position, self.samples.reduce(), self.direction) {
            (Some(position), Some(reduction), Some(direction)) => Ok(ReadySnapshot {
                position,
                wind: reduction.median,
                gust: reduction.gust,
                direction,
                receipt: SubmissionReceipt {
                    sample_count: self.samples.len(),
                },
            }),
            _ => Err(missing),
        }
    }

    /// Clear the window. The last success time is kept.
    pub fn reset(&mut self) {
        self.position = None;
        self.samples.clear();
        self.direction = None;
    }

    /// Close the window after a confirmed submission.
    ///
    /// Samples that arrived after the snapshot was taken are kept for the
    /// next window; when none did, this is the same as `reset`.
    pub fn acknowledge(&mut self, receipt: SubmissionReceipt, at: DateTime<Utc>) {
        self.samples.drain_front(receipt.sample_count);
        self.position = None;
        self.direction = None;
        self.last_success = Some(at);
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn direction(&self) -> Option<u16> {
        self.direction
    }

    pub fn samples(&self) -> &SampleBuffer {
        &self.samples
    }

    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        self.last_success
    }
}

impl TelemetrySubscriber for AggregationEngine {
    fn on_update(&mut self, path: &str, value: serde_json::Value, source: Option<&str>) {
        self.apply(&Delta::new(path, value, source));
    }

    fn on_delta(&mut self, delta: Delta) {
        self.apply(&delta);
    }
}
