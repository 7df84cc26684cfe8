use axum::routing::get;
use axum::Router;
use axum_prometheus::metrics_exporter_prometheus::PrometheusHandle;
use axum_prometheus::PrometheusMetricLayer;

pub fn setup_metrics() -> (PrometheusMetricLayer<'static>, PrometheusHandle) {
    PrometheusMetricLayer::pair()
}

/// Records every request and serves the exposition text at `/metrics`.
pub fn attach_metrics(
    router: Router,
    layer: PrometheusMetricLayer<'static>,
    handle: PrometheusHandle,
) -> Router {
    router
        .route("/metrics", get(move || async move { handle.render() }))
        .layer(layer)
}
