//! Fan-out/fan-in dispatcher.

use super::pacing::PacingGate;
use crate::batch::Batch;
use crate::classify::{ClassificationResponse, Classify};
use crate::{Error, Result};
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;

/// Capacity policy for the outcome queue.
///
/// `Bounded(n)` preserves the coupling between consumer speed and worker
/// completion: once `n` unread outcomes are queued, the next publish blocks
/// its worker until the consumer catches up (task *starts* stay on
/// schedule either way). `Unbounded` removes that coupling: publishes never
/// block, at the cost of queue growth proportional to the consumer's lag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueCapacity {
    /// Publish blocks while `n` outcomes are unread. Values below 1 are
    /// treated as 1.
    Bounded(usize),
    /// Publish never blocks.
    Unbounded,
}

impl Default for QueueCapacity {
    /// One unread outcome, matching a rendezvous-style handoff.
    fn default() -> Self {
        QueueCapacity::Bounded(1)
    }
}

/// Configuration for a dispatch run.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pacing_interval: Duration,
    queue: QueueCapacity,
}

impl DispatcherConfig {
    /// Pace starts at a fixed interval.
    pub fn new(pacing_interval: Duration) -> Self {
        Self {
            pacing_interval,
            queue: QueueCapacity::default(),
        }
    }

    /// Derive the pacing interval from a requests-per-minute ceiling
    /// (`60s / rpm`). `rpm` must be finite and positive.
    pub fn from_rpm(rpm: f64) -> Result<Self> {
        if !rpm.is_finite() || rpm <= 0.0 {
            return Err(Error::configuration(format!(
                "requests per minute must be a positive number, got {rpm}"
            )));
        }
        Ok(Self::new(Duration::from_secs_f64(60.0 / rpm)))
    }

    /// Set the outcome queue capacity policy.
    pub fn with_queue_capacity(mut self, queue: QueueCapacity) -> Self {
        self.queue = queue;
        self
    }

    pub fn pacing_interval(&self) -> Duration {
        self.pacing_interval
    }

    pub fn queue_capacity(&self) -> QueueCapacity {
        self.queue
    }
}

/// The result of classifying one batch, attributed to its originating
/// batch so callers can verify completeness per batch.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Index of the originating batch in the dispatched sequence.
    pub batch: usize,
    /// Number of documents the batch carried.
    pub documents: usize,
    pub result: Result<ClassificationResponse>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Rate-limited concurrent dispatcher.
///
/// Starts one independent task per batch, in input order, behind a
/// [`PacingGate`]; collects every task's [`BatchOutcome`] into a single
/// [`OutcomeStream`]. A failed classification is published like a success
/// and never stops the remaining batches. There is no cancellation path:
/// once started, a run processes every batch to completion.
pub struct Dispatcher {
    config: DispatcherConfig,
}

impl Dispatcher {
    pub fn new(config: DispatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Dispatch `batches` against `capability`, returning the outcome
    /// stream immediately.
    ///
    /// Outcomes arrive in completion order, which under concurrency is not
    /// submission order. The stream closes exactly once every batch has
    /// published its outcome; it never closes early. Closure is carried by
    /// sender ownership: the coordinator and each worker hold a clone of
    /// the queue's sender, and the queue closes when the last clone drops —
    /// there is no completion counter to race on.
    pub fn dispatch(
        &self,
        batches: Vec<Batch>,
        classifier_id: impl Into<String>,
        capability: Arc<dyn Classify>,
    ) -> OutcomeStream {
        let (tx, stream) = outcome_channel(self.config.queue);
        let gate = PacingGate::new(self.config.pacing_interval);
        let classifier_id: String = classifier_id.into();
        let total = batches.len();

        tokio::spawn(async move {
            for batch in batches {
                gate.acquire().await;
                tracing::debug!(
                    batch = batch.index(),
                    documents = batch.len(),
                    "starting batch task"
                );

                let tx = tx.clone();
                let capability = Arc::clone(&capability);
                let classifier_id = classifier_id.clone();
                tokio::spawn(async move {
                    let index = batch.index();
                    let documents = batch.len();
                    let result = capability.classify(&classifier_id, &batch).await;
                    if let Err(ref err) = result {
                        tracing::warn!(batch = index, error = %err, "batch classification failed");
                    }
                    let published = tx
                        .publish(BatchOutcome {
                            batch: index,
                            documents,
                            result,
                        })
                        .await;
                    if !published {
                        tracing::warn!(batch = index, "outcome receiver dropped before publish");
                    }
                });
            }
            tracing::debug!(total, "all batch tasks started");
        });

        stream
    }
}

fn outcome_channel(capacity: QueueCapacity) -> (OutcomeTx, OutcomeStream) {
    match capacity {
        QueueCapacity::Bounded(n) => {
            let (tx, rx) = mpsc::channel(n.max(1));
            (
                OutcomeTx::Bounded(tx),
                OutcomeStream {
                    rx: OutcomeRx::Bounded(rx),
                },
            )
        }
        QueueCapacity::Unbounded => {
            let (tx, rx) = mpsc::unbounded_channel();
            (
                OutcomeTx::Unbounded(tx),
                OutcomeStream {
                    rx: OutcomeRx::Unbounded(rx),
                },
            )
        }
    }
}

#[derive(Clone)]
enum OutcomeTx {
    Bounded(mpsc::Sender<BatchOutcome>),
    Unbounded(mpsc::UnboundedSender<BatchOutcome>),
}

impl OutcomeTx {
    /// Publish one outcome; returns false if the consumer is gone.
    async fn publish(&self, outcome: BatchOutcome) -> bool {
        match self {
            OutcomeTx::Bounded(tx) => tx.send(outcome).await.is_ok(),
            OutcomeTx::Unbounded(tx) => tx.send(outcome).is_ok(),
        }
    }
}

enum OutcomeRx {
    Bounded(mpsc::Receiver<BatchOutcome>),
    Unbounded(mpsc::UnboundedReceiver<BatchOutcome>),
}

/// Single-consumer stream of [`BatchOutcome`]s for one dispatch run.
///
/// Supports both `recv().await` and the [`futures::Stream`] interface.
/// Yields `None` exactly once, after the last outcome of the run.
pub struct OutcomeStream {
    rx: OutcomeRx,
}

impl OutcomeStream {
    /// Receive the next outcome, or `None` once the run is complete.
    pub async fn recv(&mut self) -> Option<BatchOutcome> {
        match &mut self.rx {
            OutcomeRx::Bounded(rx) => rx.recv().await,
            OutcomeRx::Unbounded(rx) => rx.recv().await,
        }
    }
}

impl Stream for OutcomeStream {
    type Item = BatchOutcome;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match &mut self.get_mut().rx {
            OutcomeRx::Bounded(rx) => rx.poll_recv(cx),
            OutcomeRx::Unbounded(rx) => rx.poll_recv(cx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NoopClassifier;

    #[async_trait]
    impl Classify for NoopClassifier {
        async fn classify(&self, _id: &str, _batch: &Batch) -> Result<ClassificationResponse> {
            Ok(ClassificationResponse {
                records: Vec::new(),
            })
        }
    }

    #[test]
    fn test_from_rpm_interval() {
        let config = DispatcherConfig::from_rpm(120.0).unwrap();
        assert_eq!(config.pacing_interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_from_rpm_rejects_invalid() {
        assert!(DispatcherConfig::from_rpm(0.0).is_err());
        assert!(DispatcherConfig::from_rpm(-3.0).is_err());
        assert!(DispatcherConfig::from_rpm(f64::NAN).is_err());
        assert!(DispatcherConfig::from_rpm(f64::INFINITY).is_err());
    }

    #[test]
    fn test_queue_capacity_default_is_rendezvous() {
        assert_eq!(QueueCapacity::default(), QueueCapacity::Bounded(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_batch_sequence_closes_immediately() {
        let dispatcher = Dispatcher::new(DispatcherConfig::from_rpm(120.0).unwrap());
        let mut stream = dispatcher.dispatch(Vec::new(), "cl_test", Arc::new(NoopClassifier));
        assert!(stream.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_outcome_attribution_carries_batch_size() {
        let batches = crate::batch::split(
            vec!["a".into(), "b".into(), "c".into()],
            2,
        )
        .unwrap();
        let dispatcher = Dispatcher::new(DispatcherConfig::from_rpm(6000.0).unwrap());
        let mut stream = dispatcher.dispatch(batches, "cl_test", Arc::new(NoopClassifier));

        let mut sizes = std::collections::HashMap::new();
        while let Some(outcome) = stream.recv().await {
            sizes.insert(outcome.batch, outcome.documents);
        }
        assert_eq!(sizes.len(), 2);
        assert_eq!(sizes[&0], 2);
        assert_eq!(sizes[&1], 1);
    }
}
