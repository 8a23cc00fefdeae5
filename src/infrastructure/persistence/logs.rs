use crate::domain::entities::Log;
use crate::domain::ports::{LogRepository, RepositoryError};
use crate::infrastructure::persistence::{Backend, Database, ACQUIRE_TIMEOUT};
use async_trait::async_trait;

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed | sqlx::Error::WorkerCrashed => {
                RepositoryError::Cancelled(err.to_string())
            }
            sqlx::Error::PoolTimedOut => RepositoryError::Timeout(ACQUIRE_TIMEOUT),
            sqlx::Error::Database(db_err) => RepositoryError::Database(db_err.message().to_string()),
            other => RepositoryError::Database(other.to_string()),
        }
    }
}

const LOG_COLUMNS: [&str; 9] = [
    "id",
    "message",
    "level",
    "timestamp",
    "application_id",
    "user_id",
    "source",
    "tags",
    "metadata",
];

fn insert_log_sql(backend: Backend) -> String {
    format!(
        "INSERT INTO logs ({}) VALUES ({})",
        LOG_COLUMNS.join(", "),
        backend.placeholders(LOG_COLUMNS.len())
    )
}

impl Database {
    async fn insert_log(&self, log: &Log) -> Result<(), RepositoryError> {
        let tags = serde_json::to_string(log.tags())
            .map_err(|e| RepositoryError::Database(format!("failed to encode tags: {}", e)))?;
        let metadata = serde_json::to_string(log.metadata())
            .map_err(|e| RepositoryError::Database(format!("failed to encode metadata: {}", e)))?;

        let sql = insert_log_sql(self.backend);
        sqlx::query(&sql)
            .bind(log.id().to_string())
            .bind(log.message())
            .bind(log.level().as_str())
            .bind(log.timestamp().to_rfc3339())
            .bind(log.origin_id().to_string())
            .bind(log.actor_id().to_string())
            .bind(log.source().map(str::to_string))
            .bind(tags)
            .bind(metadata)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl LogRepository for Database {
    async fn create(&self, log: &Log) -> Result<(), RepositoryError> {
        tokio::time::timeout(self.write_timeout, self.insert_log(log))
            .await
            .map_err(|_| RepositoryError::Timeout(self.write_timeout))??;

        tracing::debug!(
            "Log stored: id={}, application_id={}",
            log.id(),
            log.origin_id()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_sql_uses_sqlite_placeholders() {
        assert_eq!(
            insert_log_sql(Backend::Sqlite),
            "INSERT INTO logs (id, message, level, timestamp, application_id, user_id, source, tags, metadata) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );
    }

    #[test]
    fn test_insert_sql_uses_numbered_postgres_placeholders() {
        let sql = insert_log_sql(Backend::Postgres);
        assert!(sql.ends_with("VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"));
        assert!(!sql.contains('?'));
    }
}
