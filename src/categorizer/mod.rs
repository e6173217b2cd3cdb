pub mod classifier;
pub mod policy;
pub mod scheduler;
pub mod telemetry;

pub use classifier::{classify_batch, BatchOutcome, Classifier};
pub use policy::{OutputOrder, TerminationPolicy};
pub use scheduler::{BatchScheduler, CategorizeOutcome, RunReport, SchedulerConfig};
pub use telemetry::RateTelemetry;
