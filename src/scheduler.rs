//! Periodic submission: readiness check, reduction, hand-off to the
//! transport and closing the window on success.

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::aggregator::{AggregationEngine, MissingData, SubmissionReceipt};
use crate::submit::{ObservationSender, SendError, StationInfo, SubmissionRecord};

/// A record ready to hand to the transport, plus what it covers.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingSubmission {
    pub record: SubmissionRecord,
    pub receipt: SubmissionReceipt,
}

/// Transport result for one pending submission.
#[derive(Debug)]
pub struct CompletedSubmission {
    pub receipt: SubmissionReceipt,
    pub result: Result<u16, SendError>,
}

/// What a submission tick ended up doing.
#[derive(Debug, PartialEq)]
pub enum TickOutcome {
    /// Not enough data; nothing was sent
    Skipped(MissingData),
    /// The endpoint acknowledged the record and the window was closed
    Submitted { status: u16 },
    /// The transport failed; aggregation state is untouched
    Failed(SendError),
}

pub struct SubmissionScheduler {
    station: StationInfo,
    sender: Arc<dyn ObservationSender>,
}

impl SubmissionScheduler {
    pub fn new(station: StationInfo, sender: Arc<dyn ObservationSender>) -> Self {
        Self { station, sender }
    }

    pub fn station(&self) -> &StationInfo {
        &self.station
    }

    /// Read and reduce the engine in one step. Missing inputs are normal and
    /// only logged.
    pub fn prepare(&self, engine: &AggregationEngine) -> Result<PendingSubmission, MissingData> {
        match engine.snapshot() {
            Ok(snapshot) => Ok(PendingSubmission {
                record: SubmissionRecord::build(&self.station, &snapshot),
                receipt: snapshot.receipt,
            }),
            Err(missing) => {
                debug!(%missing, "no submission");
                Err(missing)
            }
        }
    }

    /// Start the transport call. The returned future does not borrow the
    /// engine, so deltas can keep flowing while it runs.
    pub fn send(&self, pending: PendingSubmission) -> BoxFuture<'static, CompletedSubmission> {
        let sender = Arc::clone(&self.sender);
        async move {
            let result = sender.submit(&pending.record).await;
            CompletedSubmission {
                receipt: pending.receipt,
                result,
            }
        }
        .boxed()
    }

    /// Apply the transport result. Failures are dropped: no retry, no requeue.
    pub fn finish(
        &self,
        engine: &mut AggregationEngine,
        completed: CompletedSubmission,
        now: DateTime<Utc>,
    ) -> TickOutcome {
        match completed.result {
            Ok(status) => {
                info!(
                    status,
                    samples = completed.receipt.sample_count,
                    "weather report successfully submitted"
                );
                engine.acknowledge(completed.receipt, now);
                TickOutcome::Submitted { status }
            }
            Err(e) => {
                warn!(error = %e, "error submitting weather report");
                TickOutcome::Failed(e)
            }
        }
    }

    /// Run one full tick against the engine.
    pub async fn tick(&self, engine: &mut AggregationEngine) -> TickOutcome {
        let pending = match self.prepare(engine) {
            Ok(pending) => pending,
            Err(missing) => return TickOutcome::Skipped(missing),
        };
        let completed = self.send(pending).await;
        self.finish(engine, completed, Utc::now())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::aggregator::EngineSettings;
    use crate::delta::TelemetrySubscriber;
    use serde_json::json;
    use std::f64::consts::FRAC_PI_2;
    use std::sync::Mutex;

    /// Sender that records every submission and answers with a fixed result.
    pub(crate) struct MockSender {
        pub(crate) records: Mutex<Vec<SubmissionRecord>>,
        response: Result<u16, SendError>,
        delay: Option<std::time::Duration>,
    }

    impl MockSender {
        pub(crate) fn succeeding() -> Self {
            Self {
                records: Mutex::new(Vec::new()),
                response: Ok(200),
                delay: None,
            }
        }

        /// Succeeds after `delay` of (tokio) time
        pub(crate) fn slow(delay: std::time::Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::succeeding()
            }
        }

        pub(crate) fn failing(error: SendError) -> Self {
            Self {
                records: Mutex::new(Vec::new()),
                response: Err(error),
                delay: None,
            }
        }

        pub(crate) fn submitted(&self) -> Vec<SubmissionRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ObservationSender for MockSender {
        async fn submit(&self, record: &SubmissionRecord) -> Result<u16, SendError> {
            self.records.lock().unwrap().push(record.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.response.clone()
        }
    }

    pub(crate) fn fill(engine: &mut AggregationEngine) {
        engine.on_update(
            "navigation.position",
            json!({"latitude": 10.0, "longitude": 20.0}),
            None,
        );
        for speed in [2.0, 4.0, 3.0] {
            engine.on_update("environment.wind.speedOverGround", json!(speed), None);
        }
        engine.on_update("environment.wind.angleTrueGround", json!(FRAC_PI_2), None);
    }

    fn scheduler(sender: Arc<MockSender>) -> SubmissionScheduler {
        SubmissionScheduler::new(
            StationInfo {
                id: 100,
                name: "Aurora".to_string(),
                ..Default::default()
            },
            sender,
        )
    }

    #[tokio::test]
    async fn successful_tick_submits_and_resets() {
        let sender = Arc::new(MockSender::succeeding());
        let scheduler = scheduler(sender.clone());
        let mut engine = AggregationEngine::new(EngineSettings::default());
        fill(&mut engine);

        let outcome = scheduler.tick(&mut engine).await;
        assert_eq!(outcome, TickOutcome::Submitted { status: 200 });

        let submitted = sender.submitted();
        assert_eq!(submitted.len(), 1);
        let observation = submitted[0].observation().unwrap();
        assert_eq!(observation.wind, 3.0);
        assert_eq!(observation.gust, 4.0);
        assert_eq!(observation.winddir, 90);
        assert_eq!(submitted[0].stations[0].lat, 10.0);
        assert_eq!(submitted[0].stations[0].lon, 20.0);

        assert!(!engine.is_ready());
        assert!(engine.samples().is_empty());
        assert_eq!(engine.samples().gust(), None);
        assert_eq!(engine.direction(), None);
        assert_eq!(engine.position(), None);
        assert!(engine.last_success().is_some());
    }

    #[tokio::test]
    async fn failed_tick_leaves_state_intact() {
        let sender = Arc::new(MockSender::failing(SendError::Http { status: 500 }));
        let scheduler = scheduler(sender.clone());
        let mut engine = AggregationEngine::new(EngineSettings::default());
        fill(&mut engine);

        let outcome = scheduler.tick(&mut engine).await;
        assert_eq!(outcome, TickOutcome::Failed(SendError::Http { status: 500 }));

        assert!(engine.is_ready());
        assert_eq!(engine.samples().samples(), &[2.0, 4.0, 3.0]);
        assert_eq!(engine.last_success(), None);
    }

    #[tokio::test]
    async fn incomplete_data_never_reaches_transport() {
        let sender = Arc::new(MockSender::succeeding());
        let scheduler = scheduler(sender.clone());
        let mut engine = AggregationEngine::new(EngineSettings::default());
        engine.on_update("environment.wind.speedOverGround", json!(3.0), None);

        let outcome = scheduler.tick(&mut engine).await;
        match outcome {
            TickOutcome::Skipped(missing) => {
                assert!(missing.position);
                assert!(!missing.speed);
                assert!(missing.direction);
            }
            other => panic!("expected skip, got {:?}", other),
        }
        assert!(sender.submitted().is_empty());
        assert_eq!(engine.samples().len(), 1);
    }

    #[tokio::test]
    async fn deltas_during_flight_survive_acknowledgement() {
        let sender = Arc::new(MockSender::succeeding());
        let scheduler = scheduler(sender.clone());
        let mut engine = AggregationEngine::new(EngineSettings::default());
        fill(&mut engine);

        let pending = scheduler.prepare(&engine).unwrap();
        let in_flight = scheduler.send(pending);
        engine.on_update("environment.wind.speedOverGround", json!(6.0), None);
        let completed = in_flight.await;

        scheduler.finish(&mut engine, completed, Utc::now());
        assert_eq!(engine.samples().samples(), &[6.0]);
        assert_eq!(sender.submitted()[0].observation().unwrap().gust, 4.0);
    }
}
