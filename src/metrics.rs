use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // Pre-register counters so they appear even before the first increment.
    counter!("classification_rounds_total").absolute(0);
    counter!("transactions_classified_total").absolute(0);
    counter!("transactions_requeued_total").absolute(0);
    counter!("transactions_upserted_total").absolute(0);

    gauge!("classifier_batch_size").set(0.0);

    // Histogram is lazily created on first record; force creation.
    histogram!("classifier_round_seconds").record(0.0);

    handle
}
