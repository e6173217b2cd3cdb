pub mod category;
pub mod summary;
pub mod transaction;

pub use category::{CategoryLabels, DEFAULT_CATEGORY_LABELS};
pub use summary::WeeklySummary;
pub use transaction::{parse_transactions, Transaction};
