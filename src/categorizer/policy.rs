use std::fmt;
use std::time::Duration;

/// When a scheduler run gives up on records that keep failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminationPolicy {
    /// Retry until the queue drains.
    #[default]
    Unbounded,
    /// Stop after this many rounds.
    MaxRounds(u32),
    /// Stop once this much wall-clock time has elapsed since the run began.
    Deadline(Duration),
}

impl TerminationPolicy {
    /// Build from optional limits. A round cap takes precedence over a deadline.
    pub fn from_limits(max_rounds: Option<u32>, max_run: Option<Duration>) -> Self {
        match (max_rounds, max_run) {
            (Some(n), _) => TerminationPolicy::MaxRounds(n),
            (None, Some(d)) => TerminationPolicy::Deadline(d),
            (None, None) => TerminationPolicy::Unbounded,
        }
    }

    /// True when no further round may start.
    pub fn should_stop(&self, rounds_completed: u32, elapsed: Duration) -> bool {
        match *self {
            TerminationPolicy::Unbounded => false,
            TerminationPolicy::MaxRounds(max) => rounds_completed >= max,
            TerminationPolicy::Deadline(limit) => elapsed >= limit,
        }
    }
}

impl fmt::Display for TerminationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationPolicy::Unbounded => f.write_str("unbounded"),
            TerminationPolicy::MaxRounds(n) => write!(f, "max_rounds={n}"),
            TerminationPolicy::Deadline(d) => write!(f, "deadline={}s", d.as_secs()),
        }
    }
}

/// Order of the records returned from a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputOrder {
    /// Same relative order as the input.
    #[default]
    InputOrder,
    /// Grouped by the round in which each record succeeded.
    RoundGrouped,
}

impl OutputOrder {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "round_grouped" | "round" => OutputOrder::RoundGrouped,
            _ => OutputOrder::InputOrder,
        }
    }
}
