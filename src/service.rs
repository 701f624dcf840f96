//! Single-owner event loop: deltas, submission timer, status timer and the
//! one in-flight submission all run on one task.

use chrono::Utc;
use futures::future::BoxFuture;
use std::future::Future;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::aggregator::AggregationEngine;
use crate::delta::{Delta, TelemetrySubscriber};
use crate::scheduler::{CompletedSubmission, SubmissionScheduler};
use crate::status::StatusReporter;

pub struct Reporter {
    engine: AggregationEngine,
    scheduler: SubmissionScheduler,
    status: StatusReporter,
    submit_every: Duration,
    status_every: Duration,
}

impl Reporter {
    pub fn new(
        engine: AggregationEngine,
        scheduler: SubmissionScheduler,
        submit_every: Duration,
        status_every: Duration,
    ) -> Self {
        Self {
            engine,
            scheduler,
            status: StatusReporter::new(),
            submit_every,
            status_every,
        }
    }

    /// Receiver for the status line
    pub fn status(&self) -> watch::Receiver<String> {
        self.status.subscribe()
    }

    /// Run until `shutdown` resolves. Both timers stop with the loop and an
    /// in-flight submission is dropped. Returns the engine for inspection.
    pub async fn run<F>(
        mut self,
        mut deltas: mpsc::UnboundedReceiver<Delta>,
        shutdown: F,
    ) -> AggregationEngine
    where
        F: Future<Output = ()>,
    {
        let minutes = self.submit_every.as_secs() / 60;
        self.status.set(format!(
            "Submitting weather report every {} minutes",
            minutes
        ));

        let mut submit_timer = interval_at(Instant::now() + self.submit_every, self.submit_every);
        submit_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut status_timer = interval_at(Instant::now() + self.status_every, self.status_every);
        status_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut in_flight: Option<BoxFuture<'static, CompletedSubmission>> = None;
        let mut deltas_open = true;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,

                delta = deltas.recv(), if deltas_open => match delta {
                    Some(delta) => self.engine.on_delta(delta),
                    None => {
                        debug!("delta channel closed");
                        deltas_open = false;
                    }
                },

                completed = wait_in_flight(&mut in_flight) => {
                    in_flight = None;
                    self.scheduler.finish(&mut self.engine, completed, Utc::now());
                }

                _ = submit_timer.tick() => {
                    if in_flight.is_some() {
                        debug!("previous submission still in flight, skipping tick");
                        continue;
                    }
                    if let Ok(pending) = self.scheduler.prepare(&self.engine) {
                        in_flight = Some(self.scheduler.send(pending));
                    }
                }

                _ = status_timer.tick() => {
                    self.status.tick(&self.engine, Utc::now());
                }
            }
        }

        drop(in_flight);
        self.status.set("Reporter stopped");
        info!("reporter stopped");
        self.engine
    }
}

async fn wait_in_flight(
    in_flight: &mut Option<BoxFuture<'static, CompletedSubmission>>,
) -> CompletedSubmission {
    match in_flight {
        Some(fut) => fut.await,
        None => std::future::pending().await,
    }
}
