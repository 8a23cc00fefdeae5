use crate::domain::entities::{Log, Metadata, Tags};
use crate::domain::errors::DomainResult;
use crate::domain::value_objects::LogLevel;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Request DTOs
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLogInput {
    #[serde(alias = "origin_id")]
    pub application_id: Uuid,
    #[serde(alias = "actor_id")]
    pub user_id: Uuid,
    pub message: String,
    pub level: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub tags: Option<Tags>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

impl CreateLogInput {
    /// Validate the request and build the domain entry it describes
    pub fn into_log(self) -> DomainResult<Log> {
        let level = LogLevel::parse(&self.level)?;
        let mut log = Log::new(self.message, level, self.application_id, self.user_id)?;

        if let Some(source) = self.source {
            log = log.with_source(source);
        }
        if let Some(tags) = self.tags {
            log = log.with_tags(tags);
        }
        if let Some(metadata) = self.metadata {
            log = log.with_metadata(metadata);
        }

        Ok(log)
    }
}

// Response DTOs

/// Wire representation of a log entry. Used both as the ingestion response
/// body and as the real-time notification payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogOutput {
    pub id: Uuid,
    pub application_id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub level: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    pub timestamp: String, // RFC 3339
}

impl From<&Log> for LogOutput {
    fn from(log: &Log) -> Self {
        Self {
            id: log.id(),
            application_id: log.origin_id(),
            user_id: log.actor_id(),
            message: log.message().to_string(),
            level: log.level().as_str().to_string(),
            source: log.source().unwrap_or_default().to_string(),
            tags: log.tags().clone(),
            metadata: log.metadata().clone(),
            timestamp: log.timestamp().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}
