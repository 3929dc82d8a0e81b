use std::net::TcpListener;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::models::{ChatResponse, ErrorResponse, Message};
use crate::providers::{self, Transport};

pub struct RouterState {
  pub started_at: Instant,
  pub config: Arc<RwLock<AppConfig>>,
  pub transport: Arc<dyn Transport>,
}

pub fn app(state: RouterState) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/chat", post(chat))
    .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
    .with_state(Arc::new(state))
}

pub async fn run_router(listener: TcpListener, state: RouterState) -> anyhow::Result<()> {
  listener.set_nonblocking(true)?;
  let listener = tokio::net::TcpListener::from_std(listener)?;
  axum::serve(listener, app(state)).await?;
  Ok(())
}

async fn health(State(state): State<Arc<RouterState>>) -> Json<serde_json::Value> {
  let uptime = state.started_at.elapsed().as_millis();
  Json(serde_json::json!({
    "status": "ok",
    "version": env!("CARGO_PKG_VERSION"),
    "uptime_ms": uptime
  }))
}

/// The single provider-agnostic wire contract: `{messages, model?}` in,
/// `{message}` or `{error}` out.
async fn chat(
  State(state): State<Arc<RouterState>>,
  body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
  let Ok(Json(body)) = body else {
    return error_response(StatusCode::BAD_REQUEST, "Invalid request body");
  };

  let messages: Vec<Message> = match body.get("messages").map(|raw| serde_json::from_value(raw.clone())) {
    Some(Ok(messages)) => messages,
    _ => return error_response(StatusCode::BAD_REQUEST, "Messages array is required"),
  };
  let model = body.get("model").and_then(|value| value.as_str());

  let config = state.config.read().await.clone();
  match providers::respond(&config, state.transport.as_ref(), &messages, model).await {
    Ok(message) => (StatusCode::OK, Json(ChatResponse { message })).into_response(),
    Err(err) => {
      tracing::error!(provider = %config.provider, error = %err, "chat request failed");
      error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
    }
  }
}

fn error_response(status: StatusCode, message: &str) -> Response {
  (status, Json(ErrorResponse { error: message.to_string() })).into_response()
}
