use crate::{
    application::dto::{CreateLogInput, LogOutput},
    domain::entities::Log,
    domain::errors::LogError,
    domain::ports::{LogPublisher, LogRepository, RepositoryError},
};
use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogServiceError {
    #[error("invalid log data: {0}")]
    InvalidInput(#[from] LogError),
    #[error("failed to create log: {0}")]
    PersistenceFailed(#[source] RepositoryError),
}

/// Failure while pushing an already stored entry to real-time listeners.
/// Never surfaced to callers of [`LogService::create_log`].
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("failed to serialize log for notification: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Outcome of the best-effort notification step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// No publisher is configured for this deployment
    Disabled,
    /// Nobody was listening on the entry's channel
    NoSubscribers,
    /// Payload handed to this many subscribers
    Published(usize),
}

/// Ingests log entries: validates, persists, then notifies listeners.
#[derive(Clone)]
pub struct LogService {
    log_repo: Arc<dyn LogRepository>,
    publisher: Option<Arc<dyn LogPublisher>>,
}

impl LogService {
    /// Service without real-time notification
    pub fn new(log_repo: Arc<dyn LogRepository>) -> Self {
        Self {
            log_repo,
            publisher: None,
        }
    }

    pub fn with_publisher(
        log_repo: Arc<dyn LogRepository>,
        publisher: Arc<dyn LogPublisher>,
    ) -> Self {
        Self {
            log_repo,
            publisher: Some(publisher),
        }
    }

    pub fn realtime_enabled(&self) -> bool {
        self.publisher.is_some()
    }

    /// Validate, store and (when someone listens) broadcast a log entry.
    ///
    /// Validation and storage failures are returned and leave no side
    /// effects. Notification failures are only logged: by then the entry is
    /// already stored.
    pub async fn create_log(&self, input: CreateLogInput) -> Result<LogOutput, LogServiceError> {
        let log = input.into_log().map_err(|e| {
            metrics::counter!("logs_rejected_total", "reason" => e.kind()).increment(1);
            tracing::debug!("Rejected log input: {}", e);
            e
        })?;

        if let Err(e) = self.log_repo.create(&log).await {
            metrics::counter!("logs_rejected_total", "reason" => "persistence").increment(1);
            tracing::error!(
                "Failed to persist log: id={}, application_id={}, cancelled={}, error={}",
                log.id(),
                log.origin_id(),
                e.is_cancellation(),
                e
            );
            return Err(LogServiceError::PersistenceFailed(e));
        }

        metrics::counter!("logs_ingested_total").increment(1);
        tracing::debug!(
            "Log created: id={}, application_id={}, level={}",
            log.id(),
            log.origin_id(),
            log.level()
        );

        match self.notify(&log) {
            Ok(Notification::Published(count)) => {
                metrics::counter!("log_notifications_published_total").increment(1);
                tracing::debug!("Log {} broadcast to {} subscriber(s)", log.id(), count);
            }
            Ok(_) => {}
            Err(e) => {
                metrics::counter!("log_notifications_failed_total").increment(1);
                tracing::warn!("Log {} stored but not broadcast: {}", log.id(), e);
            }
        }

        Ok(LogOutput::from(&log))
    }

    fn notify(&self, log: &Log) -> Result<Notification, NotificationError> {
        let Some(publisher) = &self.publisher else {
            return Ok(Notification::Disabled);
        };

        let channel = log.channel_key();
        if !publisher.channel_exists(&channel) {
            return Ok(Notification::NoSubscribers);
        }

        let payload = serde_json::to_vec(&LogOutput::from(log))?;
        let delivered = publisher.publish(&channel, Bytes::from(payload));
        Ok(Notification::Published(delivered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::LogLevel;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use uuid::Uuid;

    /// Records stored logs; optionally fails every call
    #[derive(Default)]
    struct MockLogRepository {
        stored: Mutex<Vec<Log>>,
        fail: bool,
    }

    #[async_trait]
    impl LogRepository for MockLogRepository {
        async fn create(&self, log: &Log) -> Result<(), RepositoryError> {
            if self.fail {
                return Err(RepositoryError::Database("disk full".to_string()));
            }
            self.stored.lock().push(log.clone());
            Ok(())
        }
    }

    /// Publisher with a fixed set of live channels that records publishes
    #[derive(Default)]
    struct MockPublisher {
        live: Vec<String>,
        published: Mutex<Vec<(String, Bytes)>>,
    }

    #[async_trait]
    impl LogPublisher for MockPublisher {
        fn channel_exists(&self, channel: &str) -> bool {
            self.live.iter().any(|c| c == channel)
        }

        fn publish(&self, channel: &str, payload: Bytes) -> usize {
            self.published.lock().push((channel.to_string(), payload));
            1
        }
    }

    fn input(application_id: Uuid, level: &str) -> CreateLogInput {
        CreateLogInput {
            application_id,
            user_id: Uuid::new_v4(),
            message: "boot".to_string(),
            level: level.to_string(),
            source: None,
            tags: None,
            metadata: None,
        }
    }

    #[tokio::test]
    async fn test_create_log_without_publisher() {
        let repo = Arc::new(MockLogRepository::default());
        let service = LogService::new(repo.clone());
        assert!(!service.realtime_enabled());

        let output = service.create_log(input(Uuid::new_v4(), "info")).await.unwrap();

        assert_eq!(output.level, "INFO");
        assert_eq!(repo.stored.lock().len(), 1);
        assert_eq!(repo.stored.lock()[0].id(), output.id);
    }

    #[tokio::test]
    async fn test_create_log_skips_publish_without_subscribers() {
        let repo = Arc::new(MockLogRepository::default());
        let publisher = Arc::new(MockPublisher::default());
        let service = LogService::with_publisher(repo.clone(), publisher.clone());

        service.create_log(input(Uuid::new_v4(), "info")).await.unwrap();

        assert_eq!(repo.stored.lock().len(), 1);
        assert!(publisher.published.lock().is_empty());
    }

    #[tokio::test]
    async fn test_create_log_publishes_to_live_channel() {
        let app = Uuid::new_v4();
        let repo = Arc::new(MockLogRepository::default());
        let publisher = Arc::new(MockPublisher {
            live: vec![app.to_string()],
            ..Default::default()
        });
        let service = LogService::with_publisher(repo, publisher.clone());

        let output = service.create_log(input(app, "Warn")).await.unwrap();

        let published = publisher.published.lock();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, app.to_string());
        let decoded: LogOutput = serde_json::from_slice(&published[0].1).unwrap();
        assert_eq!(decoded, output);
        assert_eq!(decoded.level, LogLevel::Warn.as_str());
    }

    #[tokio::test]
    async fn test_invalid_input_has_no_side_effects() {
        let app = Uuid::new_v4();
        let repo = Arc::new(MockLogRepository::default());
        let publisher = Arc::new(MockPublisher {
            live: vec![app.to_string()],
            ..Default::default()
        });
        let service = LogService::with_publisher(repo.clone(), publisher.clone());

        let err = service.create_log(input(app, "bogus")).await.unwrap_err();
        assert!(matches!(
            err,
            LogServiceError::InvalidInput(LogError::InvalidLevel { .. })
        ));

        let mut nil_app = input(app, "info");
        nil_app.application_id = Uuid::nil();
        let err = service.create_log(nil_app).await.unwrap_err();
        assert!(matches!(
            err,
            LogServiceError::InvalidInput(LogError::InvalidOriginId)
        ));

        assert!(repo.stored.lock().is_empty());
        assert!(publisher.published.lock().is_empty());
    }

    #[tokio::test]
    async fn test_persistence_failure_blocks_notification() {
        let app = Uuid::new_v4();
        let repo = Arc::new(MockLogRepository {
            fail: true,
            ..Default::default()
        });
        let publisher = Arc::new(MockPublisher {
            live: vec![app.to_string()],
            ..Default::default()
        });
        let service = LogService::with_publisher(repo, publisher.clone());

        let err = service.create_log(input(app, "info")).await.unwrap_err();

        assert!(matches!(err, LogServiceError::PersistenceFailed(_)));
        assert!(publisher.published.lock().is_empty());
    }
}
