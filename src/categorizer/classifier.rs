use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{CategoryLabels, Transaction};

/// A remote text classifier that ranks `labels` for a single description.
///
/// Implementations perform exactly one logical request per call and return
/// the top-ranked label. Every failure (transport, status, malformed reply,
/// cold start that did not recover) is an `Err`; the batch layer routes it to
/// the unclassified list rather than propagating it.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, description: &str, labels: &CategoryLabels) -> anyhow::Result<String>;
}

#[async_trait]
impl<T: Classifier + ?Sized> Classifier for Arc<T> {
    async fn classify(&self, description: &str, labels: &CategoryLabels) -> anyhow::Result<String> {
        (**self).classify(description, labels).await
    }
}

/// Result of classifying one batch. Both lists keep the batch's order.
#[derive(Debug)]
pub struct BatchOutcome<T = Transaction> {
    /// Records that gained a `Category`.
    pub classified: Vec<T>,
    /// Records returned unchanged for a later round.
    pub unclassified: Vec<T>,
}

impl<T> Default for BatchOutcome<T> {
    fn default() -> Self {
        Self {
            classified: Vec::new(),
            unclassified: Vec::new(),
        }
    }
}

/// Classify every record in `batch`, one request per record.
///
/// Generic over the item so the scheduler can carry its own bookkeeping
/// alongside each record; plain callers pass `Vec<Transaction>`.
pub async fn classify_batch<C, T>(
    classifier: &C,
    batch: Vec<T>,
    labels: &CategoryLabels,
) -> BatchOutcome<T>
where
    C: Classifier + ?Sized,
    T: AsRef<Transaction> + AsMut<Transaction> + Send,
{
    let mut outcome = BatchOutcome {
        classified: Vec::with_capacity(batch.len()),
        unclassified: Vec::new(),
    };

    for mut item in batch {
        let description = item.as_ref().description();

        match classifier.classify(&description, labels).await {
            Ok(label) => {
                item.as_mut().set_category(label);
                outcome.classified.push(item);
            }
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    description = %description,
                    "Classification failed, record left unclassified"
                );
                outcome.unclassified.push(item);
            }
        }
    }

    outcome
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
