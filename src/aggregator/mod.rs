// src/aggregator/mod.rs
//! Wind aggregation between submissions: sample series, direction
//! resolution and the owning engine.

mod direction;
mod samples;
mod state;

pub use direction::{radians_to_degrees, true_wind_heading, DirectionMode, DirectionResolver};
pub use samples::{round_to_hundredths, Reduction, SampleBuffer};
pub use state::{
    AggregationEngine, EngineSettings, MissingData, Phase, ReadySnapshot, SubmissionReceipt,
};
