use axum::{routing::get, Router};
use metrics::{describe_counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Initialize the Prometheus recorder, register the request counters,
    /// and expose a static gauge with the configured text-length limit.
    pub fn init(max_text_length: usize) -> Self {
        // Use default buckets to avoid API differences across crate versions.
        let builder = PrometheusBuilder::new();

        let handle = builder
            .install_recorder()
            .expect("prometheus: install recorder");

        describe_counter!(
            "validate_requests_total",
            "Texts received on POST /validate"
        );
        describe_counter!(
            "validate_rejections_total",
            "Texts rejected by input validation"
        );
        describe_counter!(
            "batch_requests_total",
            "Batches received on POST /validate/batch"
        );

        gauge!("moderation_max_text_length").set(max_text_length as f64);

        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
