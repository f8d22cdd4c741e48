//! Provides utilities to initialize logging and OpenTelemetry tracing.
use std::env;

use opentelemetry::{trace::TracerProvider, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::Resource;
use thiserror::Error;
use tracing::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Environment variable naming the OTLP collector spans are exported to.
pub const OTLP_URL_ENVVAR: &str = "PLASMA_CASH_OTLP_URL";

/// Environment variable name for the service label, which is appended to the
/// whoami string.
pub const SVC_LABEL_ENVVAR: &str = "PLASMA_CASH_SVC_LABEL";

/// Set to `1` to include source file names in log lines.
pub const LOG_FILE_ENVVAR: &str = "LOG_FILE";

/// Set to `1` to include source line numbers in log lines.
pub const LOG_LINE_NUM_ENVVAR: &str = "LOG_LINE_NUM";

/// Failures while setting up logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The OTLP exporter could not be built.
    #[error("could not initialize otlp exporter: {0}")]
    Exporter(#[from] opentelemetry_otlp::ExporterBuildError),

    /// A global subscriber is already installed.
    #[error("could not install subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Configuration for the logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// The whoami string, which is used to identify the service in logs.
    whoami: String,

    /// The OpenTelemetry URL for exporting traces.
    otel_url: Option<String>,

    /// Include source file names.
    with_file: bool,

    /// Include source line numbers.
    with_line_number: bool,
}

impl LoggerConfig {
    /// Creates a new empty instance with whoami set.
    pub const fn new(whoami: String) -> Self {
        Self {
            whoami,
            otel_url: None,
            with_file: false,
            with_line_number: false,
        }
    }

    /// Creates a new instance named after `s` and the service label, picking up the OTLP URL and
    /// the source-location flags from the environment.
    pub fn with_base_name(s: &str) -> Self {
        let mut config = Self::new(get_whoami_string(s));
        config.otel_url = get_otlp_url_from_env();
        config.with_file = env_flag(LOG_FILE_ENVVAR);
        config.with_line_number = env_flag(LOG_LINE_NUM_ENVVAR);
        config
    }

    /// Sets the opentelemetry URL to the provided string.
    pub fn set_otlp_url(&mut self, url: String) {
        self.otel_url = Some(url);
    }

    /// The name the service logs under.
    pub fn whoami(&self) -> &str {
        &self.whoami
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::new("(plasma-cash)".to_owned())
    }
}

/// Initializes the logging subsystem with the provided config.
///
/// Logs go to stdout, filtered by `RUST_LOG`. Spans are also exported over OTLP when a collector
/// URL is configured.
pub fn init(config: LoggerConfig) -> Result<(), LoggingError> {
    let filt = tracing_subscriber::EnvFilter::from_default_env();

    let stdout_sub = tracing_subscriber::fmt::layer()
        .compact()
        .event_format(
            tracing_subscriber::fmt::format()
                .with_file(config.with_file)
                .with_line_number(config.with_line_number),
        )
        .with_filter(filt);

    if let Some(otel_url) = &config.otel_url {
        let resource = Resource::builder()
            .with_attribute(KeyValue::new("service.name", config.whoami.clone()))
            .build();

        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(otel_url)
            .build()?;

        let tp = opentelemetry_sdk::trace::SdkTracerProvider::builder()
            .with_resource(resource)
            .with_batch_exporter(exporter)
            .build();

        let tracer = tp.tracer("plasma-cash");

        let otel_sub = tracing_opentelemetry::layer().with_tracer(tracer);

        tracing_subscriber::registry()
            .with(stdout_sub)
            .with(otel_sub)
            .try_init()?;
    } else {
        tracing_subscriber::registry().with(stdout_sub).try_init()?;
    }

    info!(whoami = %config.whoami, otlp = config.otel_url.is_some(), "logging started");

    Ok(())
}

/// Gets the OTLP URL from the standard envvar.
pub fn get_otlp_url_from_env() -> Option<String> {
    env::var(OTLP_URL_ENVVAR).ok()
}

/// Gets the service label from the standard envvar, which should be included
/// in the whoami string.
pub fn get_service_label_from_env() -> Option<String> {
    env::var(SVC_LABEL_ENVVAR).ok()
}

/// Computes a standard whoami string.
pub fn get_whoami_string(base: &str) -> String {
    whoami_with_label(base, get_service_label_from_env().as_deref())
}

fn whoami_with_label(base: &str, label: Option<&str>) -> String {
    match label {
        Some(label) => format!("{base}%{label}"),
        None => base.to_owned(),
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name).is_ok_and(|v| v == "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_label_is_appended_to_the_base_name() {
        assert_eq!(whoami_with_label("plasma-node", None), "plasma-node");
        assert_eq!(
            whoami_with_label("plasma-node", Some("eu-1")),
            "plasma-node%eu-1"
        );
    }

    #[test]
    fn default_config_exports_nothing() {
        let config = LoggerConfig::default();
        assert_eq!(config.whoami(), "(plasma-cash)");
        assert_eq!(config.otel_url, None);

        let mut config = config;
        config.set_otlp_url("http://localhost:4317".to_owned());
        assert_eq!(config.otel_url.as_deref(), Some("http://localhost:4317"));
    }
}
