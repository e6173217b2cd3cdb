use serde::Serialize;
use sqlx::PgPool;

use crate::categorizer::{BatchScheduler, Classifier};
use crate::db::transaction_repo;
use crate::sheets::SheetsClient;

/// What one sheet sync did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub fetched: usize,
    pub new: usize,
    pub classified: usize,
    pub unclassified: usize,
    pub written: u64,
    pub rounds: u32,
}

/// Pull the worksheet, categorize rows not yet stored, and upsert them.
///
/// Flow:
/// 1. Fetch all rows from the spreadsheet
/// 2. Drop rows whose Transaction ID is already stored
/// 3. Categorize the rest through the adaptive scheduler
/// 4. Upsert the categorized rows
///
/// A failed write surfaces as an error; rows categorized before it are not
/// rolled back, and re-running is safe because writes are keyed upserts.
pub async fn run_sheet_sync<C: Classifier>(
    pool: &PgPool,
    sheets: &SheetsClient,
    scheduler: &BatchScheduler<C>,
) -> anyhow::Result<SyncSummary> {
    let rows = sheets.fetch_transactions().await?;
    let fetched = rows.len();

    let fresh = transaction_repo::filter_new(pool, rows).await?;
    let new = fresh.len();

    tracing::info!(fetched, new, "Sheet sync: fetched transactions");

    if fresh.is_empty() {
        return Ok(SyncSummary {
            fetched,
            ..SyncSummary::default()
        });
    }

    let outcome = scheduler.run(fresh).await;
    let written = transaction_repo::upsert_transactions(pool, &outcome.processed).await?;

    let summary = SyncSummary {
        fetched,
        new,
        classified: outcome.processed.len(),
        unclassified: outcome.unclassified.len(),
        written,
        rounds: outcome.report.rounds,
    };

    tracing::info!(
        classified = summary.classified,
        unclassified = summary.unclassified,
        written = summary.written,
        "Sheet sync complete"
    );

    Ok(summary)
}
