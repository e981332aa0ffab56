use crate::routes;
use crate::state::SharedState;
use anyhow::{Context, Result};
use axum::{Router, extract::DefaultBodyLimit};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Assemble every route group behind request tracing and a body cap.
pub fn app(state: SharedState, body_limit: usize) -> Router {
    Router::new()
        .merge(routes::analysis_routes())
        .merge(routes::claims_routes())
        .merge(routes::reputation_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
}

pub async fn bind(addr: &str) -> Result<TcpListener> {
    let addr: SocketAddr = addr
        .parse()
        .with_context(|| format!("invalid server.bind address {addr:?}"))?;
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))
}

/// Serve until `cancel` trips, then drain in-flight requests.
pub async fn serve(listener: TcpListener, app: Router, cancel: CancellationToken) -> Result<()> {
    let local = listener.local_addr()?;
    tracing::info!(addr = %local, "server.listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .context("server error")?;
    tracing::info!(addr = %local, "server.stopped");
    Ok(())
}
