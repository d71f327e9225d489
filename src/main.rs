//! VLC Remote - Rust Implementation
//!
//! Polls a VLC HTTP interface and exposes its state and controls over HTTP.

use vlc_remote::{api, bus, config, remote};

use anyhow::Result;
use remote::Startable;
use std::net::SocketAddr;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vlc_remote=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Starting VLC Remote v{} ({})",
        env!("VLCR_VERSION"),
        env!("VLCR_GIT_SHA")
    );

    // Load configuration
    let config = config::load_config()?;
    tracing::info!(
        "Configuration loaded, port: {}, vlc: {}",
        config.port,
        config.vlc.base_url()
    );
    if config.vlc.password.is_empty() {
        tracing::warn!("No VLC password configured; VLC's HTTP interface requires one");
    }

    // Create event bus
    let bus = bus::create_bus();
    tracing::info!("Event bus initialized");

    // Log one-shot notifications (connect/disconnect edges)
    let mut notifications = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match notifications.recv().await {
                Ok(event) => {
                    if let Some(text) = event.notification() {
                        tracing::info!("{}", text);
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!("Notification logger lagged by {} events", skipped);
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Initialize VLC session and start polling
    let vlc = remote::VlcRemote::new(&config.vlc, &config.polling, bus.clone())?;
    if let Err(e) = vlc.start().await {
        tracing::warn!("Failed to start {} session: {}", vlc.name(), e);
    } else {
        tracing::info!("VLC session started for {}", vlc.base_url());
    }

    let app = api::router(api::AppState::new(vlc.clone(), bus.clone()));

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down VLC session...");
    vlc.stop().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
