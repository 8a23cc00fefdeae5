use crate::config::Config;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use opentelemetry::trace::TraceError;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{runtime, trace as sdktrace, Resource};
use std::net::SocketAddr;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const DEFAULT_FILTER: &str = "loghub=debug,tower_http=debug,axum=debug";

#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("failed to install OTLP pipeline: {0}")]
    Exporter(#[from] TraceError),

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] TryInitError),

    #[error("failed to start Prometheus exporter: {0}")]
    Metrics(#[from] BuildError),
}

/// Flushes pending spans when dropped
pub struct ObservabilityGuard;

impl Drop for ObservabilityGuard {
    fn drop(&mut self) {
        global::shutdown_tracer_provider();
    }
}

pub fn init(config: &Config) -> Result<ObservabilityGuard, ObservabilityError> {
    init_tracing(config)?;
    init_metrics(config.metrics_port)?;
    Ok(ObservabilityGuard)
}

/// `RUST_LOG` wins over the built-in filter
fn env_filter() -> Result<EnvFilter, ParseError> {
    EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
}

fn otlp_tracer(endpoint: &str, service_name: &str) -> Result<sdktrace::Tracer, TraceError> {
    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(endpoint);

    opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(exporter)
        .with_trace_config(sdktrace::config().with_resource(Resource::new(vec![
            KeyValue::new("service.name", service_name.to_string()),
        ])))
        .install_batch(runtime::Tokio)
}

fn init_tracing(config: &Config) -> Result<(), ObservabilityError> {
    let otel_layer = match config.otel_exporter_endpoint.as_deref() {
        Some(endpoint) => {
            let tracer = otlp_tracer(endpoint, &config.service_name)?;
            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        }
        None => None,
    };
    let exporting = otel_layer.is_some();

    Registry::default()
        .with(env_filter()?)
        .with(
            tracing_subscriber::fmt::layer()
                .with_thread_ids(true)
                .with_target(true),
        )
        .with(otel_layer)
        .try_init()?;

    if exporting {
        tracing::info!("Exporting spans for {} over OTLP", config.service_name);
    }
    Ok(())
}

fn metrics_listen_addr(port: u16) -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], port))
}

fn init_metrics(port: u16) -> Result<(), ObservabilityError> {
    PrometheusBuilder::new()
        .with_http_listener(metrics_listen_addr(port))
        .install()?;
    describe_metrics();

    tracing::info!("Metrics exporter (Prometheus) started on port {}", port);
    Ok(())
}

fn describe_metrics() {
    use metrics::{describe_counter, describe_gauge};

    describe_counter!("logs_ingested_total", "Log entries durably stored");
    describe_counter!("logs_rejected_total", "Log entries refused, labelled by reason");
    describe_counter!(
        "log_notifications_published_total",
        "Stored entries broadcast to at least one live channel"
    );
    describe_counter!(
        "log_notifications_failed_total",
        "Stored entries that could not be broadcast"
    );
    describe_counter!(
        "event_hub_payloads_dropped_total",
        "Payloads dropped because a subscriber buffer was full"
    );
    describe_counter!(
        "event_hub_subscribers_evicted_total",
        "Subscribers removed after their receiver went away"
    );
    describe_gauge!("event_hub_subscribers", "Currently registered subscribers");
}
