//! troet_bridge - bridges a chat channel to a microblogging account
//!
//! Runs the bridge session behind its HTTP control surface.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use troet_bridge::remote::LoopbackClient;
use troet_bridge::sink::LogSink;
use troet_bridge::{create_router, spawn_notification_task, Config, DeferredPoster, Session};

/// Main entry point for the bridge.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Pick the status store for the backend and rehydrate the cache
/// 4. Start the notification poller if a channel is configured
/// 5. Serve the HTTP control surface on the configured port
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "troet_bridge=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting troet bridge");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_limit={}, poll_interval={}s, post_delay={}s, port={}, store={}",
        config.cache_limit,
        config.poll_interval,
        config.post_delay,
        config.server_port,
        config.store_path.display()
    );

    warn!(
        instance = %config.instance_url,
        "No remote backend configured, using the in-process loopback service"
    );
    let client = Arc::new(LoopbackClient::new(
        config.instance_url.clone(),
        config.account_name.clone(),
    ));

    let port = config.server_port;
    let poll_interval = config.poll_interval;
    let session = Session::open(config, client, Arc::new(LogSink)).await?;
    info!(
        "Status cache rehydrated with {} entries",
        session.cache.read().await.len()
    );

    let poller = session.notification_poller();
    let poller_handle = match poller.channel() {
        Some(_) => Some(spawn_notification_task(poller, poll_interval)),
        None => {
            info!("No notification channel configured, mentions won't be mirrored");
            None
        }
    };

    let poster = session.poster.clone();
    let app = create_router(session);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(poller_handle, poster))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown, stops the poller and cancels posts that are still waiting.
async fn shutdown_signal(poller_handle: Option<JoinHandle<()>>, poster: DeferredPoster) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = poller_handle {
        handle.abort();
        warn!("Notification poller aborted");
    }

    let cancelled = poster.cancel_all();
    if cancelled > 0 {
        warn!("Dropped {} deferred posts on shutdown", cancelled);
    }
}
