//! HTTP webhook server.
//!
//! Exposes the same entry point as [`handle_event`] over HTTP:
//! - `POST /` and `POST /webhook` take the event as the request body
//! - `GET /health` for liveness probes

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::domain::Dispatcher;
use crate::handler::{event_from_bytes, handle_event};

/// Build the HTTP router.
pub fn build_router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route("/", post(event_handler))
        .route("/webhook", post(event_handler))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(dispatcher)
}

/// Bind `addr` and serve until the process stops.
pub async fn serve(dispatcher: Arc<Dispatcher>, addr: SocketAddr) -> Result<()> {
    let app = build_router(dispatcher);

    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!(%addr, "Webhook server listening");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// Health check endpoint.
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn event_handler(State(dispatcher): State<Arc<Dispatcher>>, body: Bytes) -> Response {
    let response = handle_event(&dispatcher, event_from_bytes(&body)).await;
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        response.body,
    )
        .into_response()
}
