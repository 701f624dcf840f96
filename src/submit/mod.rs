// src/submit/mod.rs
pub mod client;
pub mod record;
pub mod sender;

pub use client::WindyClient;
pub use record::{Observation, Station, StationInfo, SubmissionRecord};
pub use sender::{ObservationSender, SendError};
