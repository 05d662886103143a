//! HTTP front end for the Slack Events API callback.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tokio::net::TcpListener;
use weatherbot_core::{HandlerError, MentionHandler, Outcome};

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<MentionHandler>,
}

pub fn router(handler: MentionHandler) -> Router {
    let state = AppState { handler: Arc::new(handler) };

    Router::new()
        .route("/slack/events", post(slack_events))
        .route("/health", get(health))
        .with_state(state)
}

pub async fn serve(bind: &str, handler: MentionHandler) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    tracing::info!("weatherbot listening on {}", listener.local_addr()?);

    axum::serve(listener, router(handler))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

/// GET /health
async fn health() -> &'static str {
    "ok"
}

/// POST /slack/events - one Events API delivery
async fn slack_events(State(state): State<AppState>, body: Bytes) -> Response {
    match state.handler.handle(&body).await {
        Ok(Outcome::Challenge(challenge)) => (StatusCode::OK, challenge).into_response(),
        Ok(Outcome::Posted { .. }) => StatusCode::OK.into_response(),
        Err(err) => {
            let status = status_for(&err);
            tracing::warn!(%status, error = %err, "event delivery failed");
            (status, err.to_string()).into_response()
        }
    }
}

/// 400 when the delivery itself is unusable, 502 when OpenWeather or Slack failed.
fn status_for(err: &HandlerError) -> StatusCode {
    if err.is_bad_request() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::BAD_GATEWAY
    }
}
