pub mod sync;

pub use sync::{run_sheet_sync, SyncSummary};
