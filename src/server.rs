//! HTTP server initialization and runtime setup.
//!
//! Handles store connections, cache setup, worker spawning, and Axum server lifecycle.

use crate::application::services::ShortenerService;
use crate::config::{Config, StoreBackend};
use crate::domain::click_event::ClickRecorder;
use crate::domain::click_worker::run_click_worker;
use crate::domain::repositories::UrlRepository;
use crate::infrastructure::cache::{MemoryCache, NullCache, UrlCache};
use crate::infrastructure::persistence::{MemoryUrlRepository, PgUrlRepository};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::time::timeout;

/// How long pending clicks may take to flush after shutdown starts.
const CLICK_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Store (PostgreSQL pool with migrations, or in-memory)
/// - Lookup cache (or NullCache when disabled)
/// - Background click worker
/// - Axum HTTP server with graceful shutdown on Ctrl+C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = connect_store(&config).await?;

    let cache: Arc<dyn UrlCache> = if config.cache_enabled {
        tracing::info!("Cache enabled (memory)");
        Arc::new(MemoryCache::new())
    } else {
        tracing::info!("Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    };

    let (clicks, click_rx) = ClickRecorder::channel(config.click_queue_capacity);
    let worker = tokio::spawn(run_click_worker(
        click_rx,
        Arc::clone(&repository),
        config.click_worker_concurrency,
    ));
    tracing::info!("Click worker started");

    let generator = CodeGenerator::from_time_seed(config.retry_policy());
    let policy = generator.policy();
    tracing::info!(
        max_attempts = policy.max_attempts(),
        backoff_ms = policy.backoff().as_millis() as u64,
        "Code generator ready"
    );
    let shortener = Arc::new(ShortenerService::new(repository, cache, generator, clicks));
    let state = AppState::new(shortener, config.base_url.clone());

    let app = app_router(state, &config.cors_allowed_origins);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router (and with it the last click sender) is gone; let the worker drain.
    if timeout(CLICK_DRAIN_TIMEOUT, worker).await.is_err() {
        tracing::warn!(
            "Click worker did not finish within {}s, pending clicks dropped",
            CLICK_DRAIN_TIMEOUT.as_secs()
        );
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Builds the configured store. Postgres is migrated before use.
async fn connect_store(config: &Config) -> Result<Arc<dyn UrlRepository>> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, records are lost on restart");
            Ok(Arc::new(MemoryUrlRepository::new()))
        }
        StoreBackend::Postgres => {
            let pool = connect_pool(config).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Migrations applied");

            Ok(Arc::new(PgUrlRepository::new(Arc::new(pool))))
        }
    }
}

/// Opens a Postgres pool sized by the `DB_*` settings.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is not configured")?;

    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
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

    tracing::info!("Shutdown signal received, draining connections");
}
