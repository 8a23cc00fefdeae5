pub mod error;

pub use error::{ApiError, ApiResult};

use crate::application::services::LogService;
use crate::infrastructure::persistence::Database;
use crate::infrastructure::providers::event_hub::EventHub;
use std::time::Duration;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub log_service: LogService,
    /// Absent when real-time streaming is disabled
    pub event_hub: Option<EventHub>,
    pub sse_keep_alive: Duration,
}
