use crate::application::services::LogService;
use crate::config::Config;
use crate::domain::ports::{LogPublisher, LogRepository};
use crate::infrastructure::http::middleware::AppState;
use crate::infrastructure::persistence::Database;
use crate::infrastructure::providers::EventHub;
use std::sync::Arc;

/// Wire the repository, event hub and ingestion service together
pub fn build_app_state(db: Database, config: &Config) -> AppState {
    let db = db.with_write_timeout(config.persistence_timeout);
    let log_repo: Arc<dyn LogRepository> = Arc::new(db.clone());

    let (log_service, event_hub) = if config.realtime_enabled {
        let hub = EventHub::new(config.hub_buffer_capacity);
        tracing::info!(
            "Event hub initialized with per-subscriber capacity {}",
            config.hub_buffer_capacity
        );
        let publisher: Arc<dyn LogPublisher> = Arc::new(hub.clone());
        (LogService::with_publisher(log_repo, publisher), Some(hub))
    } else {
        tracing::info!("Real-time streaming disabled");
        (LogService::new(log_repo), None)
    };

    AppState {
        db,
        log_service,
        event_hub,
        sse_keep_alive: config.sse_keep_alive,
    }
}
