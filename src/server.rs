//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, migrations, the cleanup worker, and the Axum
//! server lifecycle including graceful shutdown.

use crate::application::cleanup_worker::run_cleanup_worker;
use crate::application::services::UrlService;
use crate::config::Config;
use crate::infrastructure::persistence::{PgUrlRepository, connect_pool};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool (with startup retries)
/// - Apply migrations
/// - Background cleanup worker
/// - Axum HTTP server
///
/// On SIGINT/SIGTERM the server stops accepting connections, in-flight
/// requests get `SHUTDOWN_TIMEOUT_SECONDS` to finish, the cleanup worker is
/// stopped, and the pool is closed.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection fails
/// - Migrations fail
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config.database).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let pool = Arc::new(pool);
    let repository = Arc::new(PgUrlRepository::new(pool.clone()));
    let url_service = Arc::new(UrlService::new(
        repository,
        CodeGenerator::with_os_random(config.shortener.code_length),
        config.shortener_settings(),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let cleanup = tokio::spawn(run_cleanup_worker(
        url_service.clone(),
        config.cleanup_schedule(),
        shutdown_rx.clone(),
    ));

    let app = app_router(AppState::new(url_service), &config.server)?;

    let addr = config.server.listen_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    let mut server_shutdown = shutdown_rx;
    let mut server = tokio::spawn(async move {
        axum::serve(
            listener,
            ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
        )
        .with_graceful_shutdown(async move {
            let _ = server_shutdown.wait_for(|stop| *stop).await;
        })
        .await
    });

    let grace = config.server.shutdown_timeout;

    let outcome: Result<()> = tokio::select! {
        joined = &mut server => match joined {
            Ok(served) => served.context("Server error"),
            Err(e) => Err(e).context("Server task failed"),
        },
        () = shutdown_signal() => {
            tracing::info!("Shutdown signal received, draining connections");
            let _ = shutdown_tx.send(true);

            match tokio::time::timeout(grace, &mut server).await {
                Ok(Ok(served)) => served.context("Server error"),
                Ok(Err(e)) => Err(e).context("Server task failed"),
                Err(_) => {
                    tracing::warn!(
                        grace_secs = grace.as_secs(),
                        "Grace period elapsed, aborting in-flight requests"
                    );
                    server.abort();
                    Ok(())
                }
            }
        }
    };

    let _ = shutdown_tx.send(true);
    if let Err(e) = cleanup.await {
        tracing::warn!(error = %e, "Cleanup worker did not stop cleanly");
    }

    pool.close().await;
    tracing::info!("Shutdown complete");

    outcome
}

/// Resolves when SIGINT or SIGTERM is received.
///
/// If a handler cannot be installed the error is logged and that signal is
/// never observed.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
