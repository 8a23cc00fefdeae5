use crate::domain::errors::{DomainResult, LogError};
use crate::domain::value_objects::LogLevel;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

pub type Tags = HashMap<String, String>;
pub type Metadata = HashMap<String, Value>;

/// A single ingested log event.
///
/// Fields are private: once built, a `Log` is only read. The optional
/// attributes are attached through the consuming `with_*` methods before
/// the entry is handed to persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct Log {
    id: Uuid,
    message: String,
    level: LogLevel,
    timestamp: DateTime<Utc>,
    origin_id: Uuid,
    actor_id: Uuid,
    source: Option<String>,
    tags: Tags,
    metadata: Metadata,
}

impl Log {
    /// Create a new log entry, assigning a fresh id and the current time.
    ///
    /// The message is taken verbatim; only emptiness is rejected.
    pub fn new(
        message: String,
        level: LogLevel,
        origin_id: Uuid,
        actor_id: Uuid,
    ) -> DomainResult<Self> {
        if message.is_empty() {
            return Err(LogError::EmptyMessage);
        }
        if origin_id.is_nil() {
            return Err(LogError::InvalidOriginId);
        }
        if actor_id.is_nil() {
            return Err(LogError::InvalidActorId);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            message,
            level,
            timestamp: Utc::now(),
            origin_id,
            actor_id,
            source: None,
            tags: Tags::new(),
            metadata: Metadata::new(),
        })
    }

    /// Attach the emitting component. Empty text leaves the source unset.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        let source = source.into();
        self.source = if source.is_empty() { None } else { Some(source) };
        self
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn origin_id(&self) -> Uuid {
        self.origin_id
    }

    pub fn actor_id(&self) -> Uuid {
        self.actor_id
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Key of the real-time channel this entry is broadcast on
    pub fn channel_key(&self) -> String {
        self.origin_id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids() -> (Uuid, Uuid) {
        (Uuid::new_v4(), Uuid::new_v4())
    }

    #[test]
    fn test_new_log_sets_defaults() {
        let (origin, actor) = ids();
        let log = Log::new("boot".to_string(), LogLevel::Info, origin, actor).unwrap();

        assert!(!log.id().is_nil());
        assert_eq!(log.message(), "boot");
        assert_eq!(log.level(), LogLevel::Info);
        assert_eq!(log.origin_id(), origin);
        assert_eq!(log.actor_id(), actor);
        assert_eq!(log.source(), None);
        assert!(log.tags().is_empty());
        assert!(log.metadata().is_empty());
        assert_eq!(log.channel_key(), origin.to_string());
    }

    #[test]
    fn test_new_log_rejects_empty_message() {
        let (origin, actor) = ids();
        let result = Log::new(String::new(), LogLevel::Info, origin, actor);
        assert_eq!(result.unwrap_err(), LogError::EmptyMessage);
    }

    #[test]
    fn test_new_log_keeps_whitespace_message_verbatim() {
        let (origin, actor) = ids();
        let log = Log::new("  ".to_string(), LogLevel::Debug, origin, actor).unwrap();
        assert_eq!(log.message(), "  ");
    }

    #[test]
    fn test_new_log_rejects_nil_ids() {
        let (origin, actor) = ids();
        assert_eq!(
            Log::new("m".to_string(), LogLevel::Warn, Uuid::nil(), actor).unwrap_err(),
            LogError::InvalidOriginId
        );
        assert_eq!(
            Log::new("m".to_string(), LogLevel::Warn, origin, Uuid::nil()).unwrap_err(),
            LogError::InvalidActorId
        );
    }

    #[test]
    fn test_identical_inputs_get_distinct_ids_and_ordered_timestamps() {
        let (origin, actor) = ids();
        let first = Log::new("same".to_string(), LogLevel::Info, origin, actor).unwrap();
        let second = Log::new("same".to_string(), LogLevel::Info, origin, actor).unwrap();

        assert_ne!(first.id(), second.id());
        assert!(second.timestamp() >= first.timestamp());
    }

    #[test]
    fn test_optional_fields() {
        let (origin, actor) = ids();
        let mut tags = Tags::new();
        tags.insert("env".to_string(), "prod".to_string());
        let mut metadata = Metadata::new();
        metadata.insert("attempt".to_string(), json!(3));

        let log = Log::new("m".to_string(), LogLevel::Error, origin, actor)
            .unwrap()
            .with_source("worker")
            .with_tags(tags.clone())
            .with_metadata(metadata.clone());

        assert_eq!(log.source(), Some("worker"));
        assert_eq!(log.tags(), &tags);
        assert_eq!(log.metadata(), &metadata);

        let cleared = log.with_source("");
        assert_eq!(cleared.source(), None);
    }
}
