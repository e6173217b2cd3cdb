use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

/// Trailing window the provider's rate limit is assumed to be measured over.
pub const RATE_WINDOW: Duration = Duration::from_secs(60);

/// Number of round latencies kept for the speed-up check.
pub const LATENCY_SAMPLES: usize = 5;

/// Average latency below which a larger batch is attempted.
pub const FAST_LATENCY: Duration = Duration::from_secs(1);

/// Rolling call-time and latency history that drives batch sizing.
///
/// One instance belongs to one scheduler run. Sharing it between concurrent
/// runs would let one run's burst shrink another's batches.
#[derive(Debug, Clone)]
pub struct RateTelemetry {
    call_times: VecDeque<Instant>,
    latencies: VecDeque<Duration>,
    batch_size: usize,
    max_batch_size: usize,
}

impl RateTelemetry {
    pub fn new(initial_batch_size: usize, max_batch_size: usize) -> Self {
        let max_batch_size = max_batch_size.max(1);
        Self {
            call_times: VecDeque::new(),
            latencies: VecDeque::with_capacity(LATENCY_SAMPLES),
            batch_size: initial_batch_size.clamp(1, max_batch_size),
            max_batch_size,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn calls_in_window(&self) -> usize {
        self.call_times.len()
    }

    pub fn latency_samples(&self) -> usize {
        self.latencies.len()
    }

    /// Record a finished round and drop call times that left the window.
    pub fn record_round(&mut self, completed_at: Instant, latency: Duration) {
        self.call_times.push_back(completed_at);
        self.latencies.push_back(latency);
        while self.latencies.len() > LATENCY_SAMPLES {
            self.latencies.pop_front();
        }

        while let Some(&oldest) = self.call_times.front() {
            if completed_at.saturating_duration_since(oldest) < RATE_WINDOW {
                break;
            }
            self.call_times.pop_front();
        }
    }

    /// Adjust the batch size for the next round and return it.
    ///
    /// - Two or more calls inside one window: shrink by one (floor 1).
    /// - Otherwise, five samples averaging under a second: grow by one
    ///   (capped at the configured maximum).
    pub fn adapt(&mut self) -> usize {
        if self.window_saturated() {
            self.batch_size = self.batch_size.saturating_sub(1).max(1);
        } else if let Some(avg) = self.average_latency() {
            if avg < FAST_LATENCY {
                self.batch_size = (self.batch_size + 1).min(self.max_batch_size);
            }
        }

        self.batch_size
    }

    fn window_saturated(&self) -> bool {
        match (self.call_times.front(), self.call_times.back()) {
            (Some(&oldest), Some(&newest)) if self.call_times.len() > 1 => {
                newest.saturating_duration_since(oldest) < RATE_WINDOW
            }
            _ => false,
        }
    }

    /// Mean of the last five latencies, once five have been seen.
    fn average_latency(&self) -> Option<Duration> {
        if self.latencies.len() < LATENCY_SAMPLES {
            return None;
        }
        let total: Duration = self.latencies.iter().sum();
        Some(total / LATENCY_SAMPLES as u32)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
