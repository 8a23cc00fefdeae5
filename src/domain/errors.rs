use crate::domain::value_objects::LogLevel;
use thiserror::Error;

/// Validation failures raised while building a log entry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    #[error("log message cannot be empty")]
    EmptyMessage,
    #[error("invalid log level '{}', valid levels are: {}", .given, LogLevel::valid_names())]
    InvalidLevel { given: String },
    #[error("application ID is required and must be a valid UUID")]
    InvalidOriginId,
    #[error("user ID is required and must be a valid UUID")]
    InvalidActorId,
}

impl LogError {
    /// Short machine-friendly label, used as a metrics dimension
    pub fn kind(&self) -> &'static str {
        match self {
            LogError::EmptyMessage => "empty_message",
            LogError::InvalidLevel { .. } => "invalid_level",
            LogError::InvalidOriginId => "invalid_origin_id",
            LogError::InvalidActorId => "invalid_actor_id",
        }
    }
}

pub type DomainResult<T> = Result<T, LogError>;
