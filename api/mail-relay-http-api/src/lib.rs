use std::sync::Arc;

use axum::{Router, routing::post};
use log::info;
use mail_relay_app::Application;

pub mod app;
mod send_email;

pub const LISTEN_PORT: u16 = 8080;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<Application>,
}

pub fn router(app: Arc<Application>) -> Router {
    Router::new()
        .route(
            "/send-email",
            post(send_email::send_email).fallback(send_email::method_not_allowed),
        )
        .with_state(AppState { app })
}

pub async fn run(
    app: Arc<Application>,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", LISTEN_PORT)).await?;

    info!("Server starting on port {}...", LISTEN_PORT);
    axum::serve(listener, router(app))
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("HTTP server shut down gracefully");
    Ok(())
}
