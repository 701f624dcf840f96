// src/lib.rs
pub mod aggregator;
pub mod cli;
pub mod config;
pub mod delta;
mod logging;
pub mod scheduler;
pub mod service;
pub mod signalk;
pub mod status;
pub mod submit;
pub mod telemetry;

pub use aggregator::{AggregationEngine, EngineSettings, MissingData, ReadySnapshot};
pub use config::Config;
pub use delta::{Delta, Position, TelemetrySubscriber};
pub use logging::init_tracing;
pub use scheduler::{SubmissionScheduler, TickOutcome};
pub use service::Reporter;
pub use submit::{ObservationSender, SendError, SubmissionRecord, WindyClient};
