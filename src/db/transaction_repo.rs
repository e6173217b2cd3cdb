use std::collections::HashSet;

use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;

use crate::models::{Transaction, WeeklySummary};

/// Database row for the transactions table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StoredTransaction {
    pub transaction_id: String,
    pub document: sqlx::types::Json<Value>,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert or merge transactions keyed by `Transaction ID`.
///
/// Incoming fields overwrite stored ones; fields absent from the incoming
/// record are kept. Records without an id are skipped. Returns the number of
/// rows written.
pub async fn upsert_transactions(pool: &PgPool, transactions: &[Transaction]) -> anyhow::Result<u64> {
    let mut written = 0u64;

    for txn in transactions {
        let Some(id) = txn.transaction_id() else {
            tracing::warn!(%txn, "Skipping transaction without Transaction ID");
            continue;
        };

        sqlx::query(
            r#"
            INSERT INTO transactions (transaction_id, document, category)
            VALUES ($1, $2, $3)
            ON CONFLICT (transaction_id) DO UPDATE
                SET document = transactions.document || EXCLUDED.document,
                    category = COALESCE(EXCLUDED.category, transactions.category),
                    updated_at = NOW()
            "#,
        )
        .bind(&id)
        .bind(sqlx::types::Json(txn.fields()))
        .bind(txn.category().filter(|c| !c.is_empty()))
        .execute(pool)
        .await?;

        written += 1;
    }

    counter!("transactions_upserted_total").increment(written);

    Ok(written)
}

/// Which of `ids` are already stored.
pub async fn existing_ids(pool: &PgPool, ids: &[String]) -> anyhow::Result<HashSet<String>> {
    if ids.is_empty() {
        return Ok(HashSet::new());
    }

    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT transaction_id FROM transactions WHERE transaction_id = ANY($1)",
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Drop transactions whose id is already stored. Records without an id are kept.
pub async fn filter_new(pool: &PgPool, transactions: Vec<Transaction>) -> anyhow::Result<Vec<Transaction>> {
    let ids: Vec<String> = transactions.iter().filter_map(Transaction::transaction_id).collect();
    let existing = existing_ids(pool, &ids).await?;

    let fresh: Vec<Transaction> = transactions
        .into_iter()
        .filter(|t| t.transaction_id().map_or(true, |id| !existing.contains(&id)))
        .collect();

    tracing::debug!(
        existing = existing.len(),
        fresh = fresh.len(),
        "Filtered stored transactions"
    );

    Ok(fresh)
}

/// Fetch a stored transaction by id.
pub async fn get_transaction(pool: &PgPool, transaction_id: &str) -> anyhow::Result<Option<StoredTransaction>> {
    let row = sqlx::query_as::<_, StoredTransaction>(
        "SELECT * FROM transactions WHERE transaction_id = $1",
    )
    .bind(transaction_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Most recently updated transactions first.
pub async fn list_transactions(pool: &PgPool, limit: i64) -> anyhow::Result<Vec<StoredTransaction>> {
    let rows = sqlx::query_as::<_, StoredTransaction>(
        "SELECT * FROM transactions ORDER BY updated_at DESC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// All stored transactions grouped by week and category.
pub async fn weekly_summary(pool: &PgPool) -> anyhow::Result<WeeklySummary> {
    let rows: Vec<(sqlx::types::Json<Transaction>,)> =
        sqlx::query_as("SELECT document FROM transactions WHERE document->>'Week' IS NOT NULL")
            .fetch_all(pool)
            .await?;

    let transactions: Vec<Transaction> = rows.into_iter().map(|(doc,)| doc.0).collect();
    Ok(WeeklySummary::from_transactions(&transactions))
}
