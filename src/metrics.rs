use anyhow::Context;
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and publish the catalog size gauge.
    pub fn init(catalog_items: usize) -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        describe_counter!(
            "recommendation_requests_total",
            "Ranking requests served"
        );
        describe_counter!(
            "interactions_tracked_total",
            "Interaction events applied to the weight store, by action"
        );
        describe_counter!(
            "interactions_rejected_total",
            "Interaction events rejected by validation"
        );
        describe_gauge!("catalog_items", "Items loaded into the catalog");
        gauge!("catalog_items").set(catalog_items as f64);

        Ok(Self { handle })
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
