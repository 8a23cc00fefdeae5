use async_trait::async_trait;
use loghub::domain::ports::{LogRepository, RepositoryError};
use loghub::{CreateLogInput, Log};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

/// In-memory repository that counts calls and can be told to fail
#[derive(Default)]
pub struct RecordingRepository {
    pub calls: AtomicUsize,
    pub stored: Mutex<Vec<Log>>,
    pub fail_with: Option<fn() -> RepositoryError>,
}

impl RecordingRepository {
    pub fn failing() -> Self {
        Self {
            fail_with: Some(|| RepositoryError::Database("connection reset".to_string())),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LogRepository for RecordingRepository {
    async fn create(&self, log: &Log) -> Result<(), RepositoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(fail) = self.fail_with {
            return Err(fail());
        }
        self.stored.lock().push(log.clone());
        Ok(())
    }
}

pub fn boot_input(application_id: Uuid, user_id: Uuid, level: &str) -> CreateLogInput {
    CreateLogInput {
        application_id,
        user_id,
        message: "boot".to_string(),
        level: level.to_string(),
        source: None,
        tags: None,
        metadata: None,
    }
}

/// Forwards to a real hub while counting publish calls
pub struct CountingPublisher {
    pub hub: loghub::EventHub,
    pub publishes: AtomicUsize,
}

impl CountingPublisher {
    pub fn new(hub: loghub::EventHub) -> Self {
        Self {
            hub,
            publishes: AtomicUsize::new(0),
        }
    }

    pub fn publish_count(&self) -> usize {
        self.publishes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl loghub::domain::ports::LogPublisher for CountingPublisher {
    fn channel_exists(&self, channel: &str) -> bool {
        self.hub.channel_exists(channel)
    }

    fn publish(&self, channel: &str, payload: bytes::Bytes) -> usize {
        self.publishes.fetch_add(1, Ordering::SeqCst);
        self.hub.publish(channel, payload)
    }
}
