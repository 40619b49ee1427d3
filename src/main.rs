// HTTP Server: Table Renderer
//
// Renders JSON table descriptions to HTML, CSV and XLSX, and parses HTML
// tables back to JSON. Listens on port 23100 unless BIND_ADDR says otherwise.

use std::sync::Arc;

use anyhow::{Context, Result};
use table_renderer::{ServiceConfig, router};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Arc::new(ServiceConfig::from_env().context("Failed to load configuration")?);
    info!(
        bind_addr = %config.bind_addr,
        host = %config.host,
        cors_allowed_origins = ?config.cors_allowed_origins,
        shutdown_timeout_secs = config.shutdown_timeout.as_secs(),
        max_body_bytes = config.max_body_bytes,
        "starting table renderer"
    );

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let app = router(config.clone());
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            // Server stopped on its own; nothing left to drain.
            result.context("Server task failed")?.context("Server error")?;
            return Ok(());
        }
        () = shutdown_signal() => {
            info!("shutdown signal received, draining in-flight requests");
        }
    }

    let _ = stop_tx.send(());
    match tokio::time::timeout(config.shutdown_timeout, server).await {
        Ok(Ok(Ok(()))) => info!("shutdown complete"),
        Ok(Ok(Err(e))) => {
            error!("server error during shutdown: {}", e);
            return Err(e.into());
        }
        Ok(Err(e)) => {
            error!("server task failed during shutdown: {}", e);
            return Err(e.into());
        }
        Err(_) => error!(
            "shutdown timed out after {:?}, exiting with requests in flight",
            config.shutdown_timeout
        ),
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for ctrl-c: {}", e);
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
                error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
