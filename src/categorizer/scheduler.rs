use std::collections::VecDeque;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use tokio::time::{sleep, Instant};

use super::classifier::{classify_batch, Classifier};
use super::policy::{OutputOrder, TerminationPolicy};
use super::telemetry::RateTelemetry;
use crate::models::{CategoryLabels, Transaction};

/// Tunables for one scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub initial_batch_size: usize,
    pub max_batch_size: usize,
    /// Pause between rounds that leave work behind.
    pub retry_delay: Duration,
    pub termination: TerminationPolicy,
    pub output_order: OutputOrder,
    pub labels: CategoryLabels,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_batch_size: 50,
            max_batch_size: 100,
            retry_delay: Duration::from_secs(5),
            termination: TerminationPolicy::Unbounded,
            output_order: OutputOrder::InputOrder,
            labels: CategoryLabels::default(),
        }
    }
}

/// Counters describing how a run went.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub rounds: u32,
    /// Records submitted across all rounds, retries included.
    pub submissions: usize,
    pub requeued: usize,
    pub sleeps: u32,
    /// Batch size used in each round, in order.
    pub batch_sizes: Vec<usize>,
    pub stopped_early: bool,
}

/// Result of a scheduler run.
#[derive(Debug, Default)]
pub struct CategorizeOutcome {
    /// Records carrying a `Category`.
    pub processed: Vec<Transaction>,
    /// Records still unclassified when the termination policy fired.
    /// Always empty under [`TerminationPolicy::Unbounded`].
    pub unclassified: Vec<Transaction>,
    pub report: RunReport,
}

/// A queued record tagged with its input position.
#[derive(Debug)]
struct Queued {
    seq: usize,
    txn: Transaction,
}

impl AsRef<Transaction> for Queued {
    fn as_ref(&self) -> &Transaction {
        &self.txn
    }
}

impl AsMut<Transaction> for Queued {
    fn as_mut(&mut self) -> &mut Transaction {
        &mut self.txn
    }
}

/// Drives a list of transactions through a classifier in adaptive batches.
///
/// Each call to [`BatchScheduler::run`] owns fresh rate telemetry, so
/// concurrent runs on one scheduler never influence each other's batch size.
#[derive(Debug, Clone)]
pub struct BatchScheduler<C> {
    classifier: C,
    config: SchedulerConfig,
}

impl<C: Classifier> BatchScheduler<C> {
    pub fn new(classifier: C, config: SchedulerConfig) -> Self {
        Self { classifier, config }
    }

    /// Classify every transaction, retrying failures until the queue drains
    /// or the termination policy stops the run.
    ///
    /// Round flow:
    /// 1. Adapt the batch size from telemetry
    /// 2. Take up to that many records from the front of the queue
    /// 3. Classify them and record the round's latency
    /// 4. Keep successes, put failures back at the front of the queue
    /// 5. Sleep the retry delay if anything is left
    pub async fn run(&self, transactions: Vec<Transaction>) -> CategorizeOutcome {
        let started = Instant::now();
        let mut telemetry =
            RateTelemetry::new(self.config.initial_batch_size, self.config.max_batch_size);
        let mut report = RunReport::default();

        let mut processed: Vec<Queued> = Vec::with_capacity(transactions.len());
        let mut queue: VecDeque<Queued> = VecDeque::with_capacity(transactions.len());

        for (seq, txn) in transactions.into_iter().enumerate() {
            if txn.is_categorized() {
                processed.push(Queued { seq, txn });
            } else {
                queue.push_back(Queued { seq, txn });
            }
        }

        if !processed.is_empty() {
            tracing::debug!(
                count = processed.len(),
                "Passing through already-categorized transactions"
            );
        }

        while !queue.is_empty() {
            if self.config.termination.should_stop(report.rounds, started.elapsed()) {
                tracing::warn!(
                    remaining = queue.len(),
                    rounds = report.rounds,
                    policy = %self.config.termination,
                    "Termination policy reached, leaving transactions unclassified"
                );
                report.stopped_early = true;
                break;
            }

            let batch_size = telemetry.adapt();
            gauge!("classifier_batch_size").set(batch_size as f64);

            let take = batch_size.min(queue.len());
            let batch: Vec<Queued> = queue.drain(..take).collect();

            let round_start = Instant::now();
            let outcome = classify_batch(&self.classifier, batch, &self.config.labels).await;
            let latency = round_start.elapsed();
            telemetry.record_round(Instant::now(), latency);

            report.rounds += 1;
            report.submissions += take;
            report.requeued += outcome.unclassified.len();
            report.batch_sizes.push(batch_size);

            counter!("classification_rounds_total").increment(1);
            counter!("transactions_classified_total").increment(outcome.classified.len() as u64);
            counter!("transactions_requeued_total").increment(outcome.unclassified.len() as u64);
            histogram!("classifier_round_seconds").record(latency.as_secs_f64());

            tracing::debug!(
                round = report.rounds,
                batch_size = batch_size,
                classified = outcome.classified.len(),
                failed = outcome.unclassified.len(),
                latency_ms = latency.as_millis() as u64,
                "Classification round complete"
            );

            processed.extend(outcome.classified);

            // failures go ahead of untouched records, keeping their own order
            for failed in outcome.unclassified.into_iter().rev() {
                queue.push_front(failed);
            }

            if !queue.is_empty() {
                tracing::info!(
                    remaining = queue.len(),
                    retry_delay_secs = self.config.retry_delay.as_secs_f64(),
                    "Rate limit or classifier error, retrying after delay"
                );
                sleep(self.config.retry_delay).await;
                report.sleeps += 1;
            }
        }

        if self.config.output_order == OutputOrder::InputOrder {
            processed.sort_by_key(|q| q.seq);
        }

        tracing::info!(
            processed = processed.len(),
            unclassified = queue.len(),
            rounds = report.rounds,
            "Categorization run finished"
        );

        CategorizeOutcome {
            processed: processed.into_iter().map(|q| q.txn).collect(),
            unclassified: queue.into_iter().map(|q| q.txn).collect(),
            report,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
