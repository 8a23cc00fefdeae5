use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub hub_buffer_capacity: usize,
    pub persistence_timeout: Duration,
    pub sse_keep_alive: Duration,
    pub realtime_enabled: bool,
    pub max_body_bytes: usize,
    pub otel_exporter_endpoint: Option<String>,
    pub service_name: String,
    pub metrics_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = var("DATABASE_URL", "sqlite://loghub.db?mode=rwc");

        let server_host = var("SERVER_HOST", "0.0.0.0");

        let server_port = var("SERVER_PORT", "8080")
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let hub_buffer_capacity = match var("HUB_BUFFER_CAPACITY", "100").parse::<usize>() {
            Ok(capacity) if capacity > 0 => capacity,
            _ => return Err(ConfigError::InvalidBufferCapacity),
        };

        let persistence_timeout = match var("PERSISTENCE_TIMEOUT_SECS", "5").parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => return Err(ConfigError::InvalidPersistenceTimeout),
        };

        let sse_keep_alive =
            Duration::from_secs(var("SSE_KEEP_ALIVE_SECS", "15").parse().unwrap_or(15));

        let realtime_enabled = !matches!(
            var("REALTIME_ENABLED", "true").to_ascii_lowercase().as_str(),
            "false" | "0" | "no" | "off"
        );

        let max_body_bytes = var("MAX_BODY_BYTES", "1048576")
            .parse()
            .unwrap_or(1024 * 1024);

        let otel_exporter_endpoint = lookup("OTEL_EXPORTER_OTLP_ENDPOINT");

        let service_name = var("SERVICE_NAME", "loghub");

        let metrics_port = var("METRICS_PORT", "9000").parse().unwrap_or(9000);

        Ok(Config {
            database_url,
            server_host,
            server_port,
            hub_buffer_capacity,
            persistence_timeout,
            sse_keep_alive,
            realtime_enabled,
            max_body_bytes,
            otel_exporter_endpoint,
            service_name,
            metrics_port,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("HUB_BUFFER_CAPACITY must be a positive integer")]
    InvalidBufferCapacity,

    #[error("PERSISTENCE_TIMEOUT_SECS must be a positive integer")]
    InvalidPersistenceTimeout,
}
