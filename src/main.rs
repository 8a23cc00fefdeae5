use anyhow::Context;
use loghub::bootstrap;
use loghub::config::Config;
use loghub::infrastructure::http::router::build_router;
use loghub::infrastructure::observability;
use loghub::infrastructure::persistence::Database;
use loghub::EventHub;
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    let _observability =
        observability::init(&config).context("failed to initialize observability")?;
    tracing::info!("Configuration loaded");

    // Initialize database connection
    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    tracing::info!("Database connection established");

    db.run_migrations()
        .await
        .context("failed to apply migrations")?;
    tracing::info!("Database migrations applied");

    let state = bootstrap::build_app_state(db.clone(), &config);
    let hub = state.event_hub.clone();

    let app = build_router(state, config.max_body_bytes);

    let addr: SocketAddr = config
        .server_address()
        .parse()
        .context("invalid server address")?;
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(hub))
        .await?;

    db.close().await;
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM. Closes the hub first so open SSE streams
/// end and the server can drain.
async fn shutdown_signal(hub: Option<EventHub>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
    if let Some(hub) = hub {
        hub.close();
    }
}
