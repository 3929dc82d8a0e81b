use std::net::TcpListener;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use tokio::sync::RwLock;
use tracing_subscriber::EnvFilter;

use asna_router::config;
use asna_router::providers::HttpTransport;
use asna_router::router::{run_router, RouterState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let data_dir = config::data_dir();
  std::fs::create_dir_all(&data_dir)
    .with_context(|| format!("creating data dir {}", data_dir.display()))?;

  let mut app_config = config::load_or_init(&data_dir.join("config.json"))?;
  config::apply_env(&mut app_config);
  config::fill_api_key_from_keyring(&mut app_config);

  let port = app_config.port;
  let listener = TcpListener::bind(("127.0.0.1", port))
    .with_context(|| format!("binding 127.0.0.1:{port}"))?;
  tracing::info!(port, provider = %app_config.provider, "asna-router listening");

  let state = RouterState {
    started_at: Instant::now(),
    config: Arc::new(RwLock::new(app_config)),
    transport: Arc::new(HttpTransport::new()),
  };
  run_router(listener, state).await
}
