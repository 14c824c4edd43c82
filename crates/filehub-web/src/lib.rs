//! Filehub Web Server
//!
//! Axum server exposing the live file event stream and the internal
//! notification endpoint used by mutation handlers.

pub mod config;
pub mod live;
pub mod routes;
pub mod sse;
pub mod state;

use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use live::Broadcaster;
use state::AppState;

pub use config::LiveConfig;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    // Browsers may open the stream cross-origin; internal routes stay same-origin only.
    let stream_routes = Router::new()
        .route("/api/files/stream", get(sse::stream_handler))
        .layer(cors);

    let internal_routes = Router::new()
        .route("/internal/notify", post(routes::internal::notify))
        .route("/internal/subscribers", get(routes::internal::subscribers));

    Router::new()
        .merge(stream_routes)
        .merge(internal_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the web server until Ctrl+C.
pub async fn run_server(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let broadcaster = Arc::clone(&state.broadcaster);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("Web server listening on http://{}:{}", host, port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(broadcaster))
        .await?;
    Ok(())
}

/// Resolve on Ctrl+C, closing every open stream so shutdown can complete.
async fn shutdown_signal(broadcaster: Arc<Broadcaster>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!(
        subscribers = broadcaster.subscriber_count(),
        "Shutting down, closing event streams"
    );
    broadcaster.registry().close_all();
}
