use crate::domain::entities::Log;
use thiserror::Error;

/// Failure categories surfaced by a log store
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("operation timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("operation cancelled: {0}")]
    Cancelled(String),
    #[error("storage error: {0}")]
    Database(String),
}

impl RepositoryError {
    /// True for timeouts and cancellations, as opposed to storage failures
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            RepositoryError::Timeout(_) | RepositoryError::Cancelled(_)
        )
    }
}

#[async_trait::async_trait]
pub trait LogRepository: Send + Sync {
    /// Durably record a log entry
    async fn create(&self, log: &Log) -> Result<(), RepositoryError>;
}
