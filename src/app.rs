use std::{net::SocketAddr, time::Duration};

use axum::{
    http::{Request, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{field::Empty, Span};

use crate::auth;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Account routes live under `/api/users`; `/api/health` answers without
/// touching the store.
pub fn build_app(state: AppState) -> Router {
    let api = Router::new()
        .nest("/users", auth::router())
        .route("/health", get(health));

    Router::new()
        .nest("/api", api)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| {
                    tracing::info_span!(
                        "account_request",
                        method = %req.method(),
                        path = %req.uri().path(),
                        status = Empty,
                        latency_ms = Empty,
                    )
                })
                .on_response(|res: &Response<_>, latency: Duration, span: &Span| {
                    let status = res.status();
                    span.record("status", status.as_u16());
                    span.record("latency_ms", latency.as_millis() as u64);
                    // Client failures are expected traffic on an auth API.
                    if status.is_server_error() {
                        tracing::error!(%status, "request failed");
                    } else if status.is_client_error() {
                        tracing::debug!(%status, "request rejected");
                    } else {
                        tracing::info!(%status, "request served");
                    }
                }),
        )
}

pub async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "account service listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("account service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
