//! Rosewood Storefront - single-product apparel shop.
//!
//! This binary serves the storefront JSON API and runs the Telegram
//! administration loop in the background.
//!
//! # Architecture
//!
//! - Axum JSON API for catalog, cart, promo, checkout, and orders
//! - Local JSON-file key-value store for all persistent state
//! - CDEK carrier API for delivery quotes and shipment labels
//! - Telegram Bot API for order notifications and admin commands

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rosewood_storefront::bot::{BotPoller, CommandHandler};
use rosewood_storefront::config::StorefrontConfig;
use rosewood_storefront::routes;
use rosewood_storefront::state::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rosewood_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StorefrontConfig::from_env().expect("Failed to load configuration");
    let state = AppState::new(config).expect("Failed to initialize application state");

    // Register the command menu and start the admin polling loop. Both are
    // best-effort; the storefront serves orders even if Telegram is down.
    if !state.telegram().set_my_commands().await {
        tracing::warn!("Telegram command menu registration failed");
    }
    let poller = BotPoller::new(
        state.telegram().clone(),
        CommandHandler::new(
            state.promos().clone(),
            state.config().store_name.clone(),
        ),
    );
    tokio::spawn(poller.run());

    let app = Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let addr = state.config().socket_addr();
    tracing::info!("storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
