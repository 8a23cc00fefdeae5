use sqlx::{
    any::{AnyConnectOptions, AnyPoolOptions},
    AnyPool, ConnectOptions,
};
use log::LevelFilter;
use std::str::FromStr;
use std::time::Duration;

mod logs;

pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// SQL dialect behind the `Any` pool. The driver passes statements through
/// verbatim, so bind placeholders must match the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Postgres,
}

impl Backend {
    pub fn from_url(database_url: &str) -> Self {
        if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
            Backend::Postgres
        } else {
            Backend::Sqlite
        }
    }

    /// Comma separated bind placeholders for `count` parameters
    pub fn placeholders(&self, count: usize) -> String {
        (1..=count)
            .map(|n| match self {
                Backend::Sqlite => "?".to_string(),
                Backend::Postgres => format!("${}", n),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub struct Database {
    pub(crate) pool: AnyPool,
    pub(crate) backend: Backend,
    pub(crate) write_timeout: Duration,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        // Ensure drivers are installed for AnyPool
        sqlx::any::install_default_drivers();
        let backend = Backend::from_url(database_url);

        let mut connect_options = AnyConnectOptions::from_str(database_url)?;

        connect_options = connect_options
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_secs(1));

        let pool = AnyPoolOptions::new()
            .max_connections(100)
            .min_connections(10)
            .idle_timeout(Duration::from_secs(60))
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(connect_options)
            .await?;

        // Enable optimizations for SQLite
        if backend == Backend::Sqlite {
            sqlx::query("PRAGMA journal_mode = WAL")
                .execute(&pool)
                .await?;
            sqlx::query("PRAGMA busy_timeout = 5000")
                .execute(&pool)
                .await?;
            sqlx::query("PRAGMA synchronous = NORMAL")
                .execute(&pool)
                .await?;
        }

        tracing::info!("Database pool ready ({:?}, max 100 connections)", backend);

        Ok(Self {
            pool,
            backend,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        })
    }

    /// Bound every write by `timeout`
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("migrations/sqlite").run(&self.pool).await?;
        Ok(())
    }

    /// Round-trip a trivial query to confirm the store is reachable
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connection closed");
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            backend: self.backend,
            write_timeout: self.write_timeout,
        }
    }
}
