use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_TOGETHER_MODEL: &str = "mistralai/Mixtral-8x7B-Instruct-v0.1";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
pub const DEFAULT_HUGGINGFACE_URL: &str =
  "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.2";

const KEYRING_SERVICE: &str = "asna-router";
const KEYRING_USER: &str = "api-key";

/// Process-wide configuration. The provider is kept as the raw configured
/// string; it is parsed into a `Provider` at call time so an unrecognized
/// value fails the request instead of the whole process.
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
  pub provider: String,
  pub api_key: String,
  pub groq_model: String,
  pub together_model: String,
  pub gemini_model: String,
  pub huggingface_url: String,
  pub port: u16,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      provider: "groq".to_string(),
      api_key: String::new(),
      groq_model: DEFAULT_GROQ_MODEL.to_string(),
      together_model: DEFAULT_TOGETHER_MODEL.to_string(),
      gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
      huggingface_url: DEFAULT_HUGGINGFACE_URL.to_string(),
      port: 8080,
    }
  }
}

pub fn load_or_init(path: &Path) -> anyhow::Result<AppConfig> {
  if path.exists() {
    let data = std::fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&data)?;
    Ok(config)
  } else {
    let config = AppConfig::default();
    save_config(path, &config)?;
    Ok(config)
  }
}

pub fn save_config(path: &Path, config: &AppConfig) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(config)?;
  std::fs::write(path, json)?;
  Ok(())
}

/// Overlays environment variables on top of the file-backed config. The
/// environment wins wherever a variable is set and non-empty.
pub fn apply_env(config: &mut AppConfig) {
  let overlay = |target: &mut String, var: &str| {
    if let Ok(value) = std::env::var(var) {
      if !value.trim().is_empty() {
        *target = value.trim().to_string();
      }
    }
  };

  overlay(&mut config.provider, "API_PROVIDER");
  overlay(&mut config.api_key, "API_KEY");
  overlay(&mut config.groq_model, "GROQ_MODEL");
  overlay(&mut config.together_model, "TOGETHER_MODEL");
  overlay(&mut config.gemini_model, "GEMINI_MODEL");
  overlay(&mut config.huggingface_url, "HUGGINGFACE_URL");

  if let Ok(port) = std::env::var("PORT") {
    if let Ok(port) = port.trim().parse() {
      config.port = port;
    }
  }
}

/// Last-resort credential lookup in the OS keychain. Absence or a locked
/// keychain is not an error; the missing-key check happens per request.
pub fn fill_api_key_from_keyring(config: &mut AppConfig) {
  if !config.api_key.trim().is_empty() {
    return;
  }
  if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER) {
    if let Ok(key) = entry.get_password() {
      if !key.trim().is_empty() {
        config.api_key = key;
      }
    }
  }
}

pub fn store_api_key_in_keyring(key: &str) -> anyhow::Result<()> {
  let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER)?;
  entry.set_password(key)?;
  Ok(())
}

/// Per-user data directory holding config.json and the chat database.
/// `ASNA_DATA_DIR` overrides; otherwise the platform data dir, else cwd.
pub fn data_dir() -> PathBuf {
  if let Ok(dir) = std::env::var("ASNA_DATA_DIR") {
    if !dir.trim().is_empty() {
      return PathBuf::from(dir);
    }
  }
  dirs::data_dir()
    .unwrap_or_else(|| PathBuf::from("."))
    .join("asna-router")
}
