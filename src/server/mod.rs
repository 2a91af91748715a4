//! Webhook listener

mod keepalive;
mod routes;
mod state;

pub use keepalive::spawn_keepalive;
pub use routes::create_router;
pub use state::AppState;

use tokio::net::TcpListener;
use tracing::{error, info};

/// Bind and serve until Ctrl-C
pub async fn serve(state: AppState, host: &str, port: u16) -> std::io::Result<()> {
    let listener = TcpListener::bind((host, port)).await?;
    info!(
        "Webhook listener on http://{} ({} mode)",
        listener.local_addr()?,
        state.mode
    );

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Webhook listener stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal, cleaning up...");
}
