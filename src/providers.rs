use std::str::FromStr;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::intercept;
use crate::models::{Message, Role};

/// Returned when a provider answers successfully but yields no extractable
/// text. Deliberately a soft failure, not an error.
pub const NO_RESPONSE_SENTINEL: &str = "No response generated";

const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const TOGETHER_URL: &str = "https://api.together.xyz/v1/chat/completions";
const GEMINI_URL_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Provider {
  Groq,
  HuggingFace,
  Together,
  Gemini,
}

impl Provider {
  pub fn id(&self) -> &'static str {
    match self {
      Provider::Groq => "groq",
      Provider::HuggingFace => "huggingface",
      Provider::Together => "together",
      Provider::Gemini => "gemini",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Provider::Groq => "Groq",
      Provider::HuggingFace => "Hugging Face",
      Provider::Together => "Together AI",
      Provider::Gemini => "Gemini",
    }
  }

  /// Hugging Face's public inference endpoint works without a key.
  pub fn requires_api_key(&self) -> bool {
    !matches!(self, Provider::HuggingFace)
  }
}

impl FromStr for Provider {
  type Err = ProviderError;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value.to_lowercase().as_str() {
      "groq" => Ok(Provider::Groq),
      "huggingface" => Ok(Provider::HuggingFace),
      "together" => Ok(Provider::Together),
      "gemini" => Ok(Provider::Gemini),
      _ => Err(ProviderError::UnknownProvider(value.to_string())),
    }
  }
}

#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
  #[error("Unknown API provider: {0}. Supported: groq, huggingface, together, gemini")]
  UnknownProvider(String),
  #[error("API key is required for {0}. Set API_KEY in your environment or store it in the keychain.")]
  MissingApiKey(&'static str),
  /// Non-success status from the provider; the message is the normalized
  /// upstream error text.
  #[error("{0}")]
  Upstream(String),
  #[error("{0}")]
  Network(String),
  #[error("invalid {provider} response: {detail}")]
  Decode { provider: &'static str, detail: String },
}

pub struct TransportResponse {
  pub status: u16,
  pub body: String,
}

/// The single outbound HTTP seam. Production uses reqwest; tests swap in a
/// recording mock to assert wire payloads and call counts.
#[async_trait]
pub trait Transport: Send + Sync {
  async fn post(
    &self,
    url: &str,
    headers: &[(String, String)],
    body: &Value,
  ) -> Result<TransportResponse, ProviderError>;
}

pub struct HttpTransport {
  client: reqwest::Client,
}

impl HttpTransport {
  pub fn new() -> Self {
    Self { client: reqwest::Client::new() }
  }
}

impl Default for HttpTransport {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl Transport for HttpTransport {
  async fn post(
    &self,
    url: &str,
    headers: &[(String, String)],
    body: &Value,
  ) -> Result<TransportResponse, ProviderError> {
    let mut request = self.client.post(url).json(body);
    for (name, value) in headers {
      request = request.header(name.as_str(), value.as_str());
    }
    let response = request
      .send()
      .await
      .map_err(|err| ProviderError::Network(err.to_string()))?;
    let status = response.status().as_u16();
    let body = response
      .text()
      .await
      .map_err(|err| ProviderError::Network(err.to_string()))?;
    Ok(TransportResponse { status, body })
  }
}

/// A fully shaped outbound request for one provider. Building one performs
/// no I/O; every field is inspectable in tests.
#[derive(Clone, Debug)]
pub struct ProviderRequest {
  pub url: String,
  pub headers: Vec<(String, String)>,
  pub body: Value,
}

pub fn build_request(
  provider: Provider,
  config: &AppConfig,
  messages: &[Message],
  model_override: Option<&str>,
) -> ProviderRequest {
  match provider {
    Provider::Groq => {
      chat_completions_request(GROQ_URL, model_override.unwrap_or(&config.groq_model), config, messages)
    }
    Provider::Together => chat_completions_request(
      TOGETHER_URL,
      model_override.unwrap_or(&config.together_model),
      config,
      messages,
    ),
    Provider::HuggingFace => build_huggingface_request(config, messages),
    Provider::Gemini => build_gemini_request(config, messages),
  }
}

/// OpenAI-style chat payload shared by groq and together.
fn chat_completions_request(
  url: &str,
  model: &str,
  config: &AppConfig,
  messages: &[Message],
) -> ProviderRequest {
  ProviderRequest {
    url: url.to_string(),
    headers: vec![("Authorization".to_string(), format!("Bearer {}", config.api_key))],
    body: json!({
      "model": model,
      "messages": messages,
      "temperature": 0.7,
      "max_tokens": 2000,
    }),
  }
}

/// Hugging Face takes a single prompt string, one "<Role>: <content>" line
/// per turn with a trailing "Assistant:" cue.
pub fn flatten_prompt(messages: &[Message]) -> String {
  let mut prompt = messages
    .iter()
    .map(|msg| {
      let role = match msg.role {
        Role::User => "User",
        Role::Assistant => "Assistant",
      };
      format!("{role}: {}", msg.content)
    })
    .collect::<Vec<_>>()
    .join("\n");
  prompt.push_str("\nAssistant:");
  prompt
}

fn build_huggingface_request(config: &AppConfig, messages: &[Message]) -> ProviderRequest {
  let headers = if config.api_key.trim().is_empty() {
    vec![]
  } else {
    vec![("Authorization".to_string(), format!("Bearer {}", config.api_key))]
  };
  ProviderRequest {
    url: config.huggingface_url.clone(),
    headers,
    body: json!({
      "inputs": flatten_prompt(messages),
      "parameters": {
        "max_new_tokens": 1000,
        "temperature": 0.7,
        "return_full_text": false,
      },
    }),
  }
}

/// Gemini remaps assistant turns to "model", nests content in a parts array,
/// and takes the key both as a query parameter and a header.
fn build_gemini_request(config: &AppConfig, messages: &[Message]) -> ProviderRequest {
  let contents: Vec<Value> = messages
    .iter()
    .map(|msg| {
      let role = match msg.role {
        Role::Assistant => "model",
        Role::User => "user",
      };
      json!({ "role": role, "parts": [{ "text": msg.content }] })
    })
    .collect();

  ProviderRequest {
    url: format!(
      "{GEMINI_URL_BASE}/{}:generateContent?key={}",
      config.gemini_model, config.api_key
    ),
    headers: vec![("X-Goog-Api-Key".to_string(), config.api_key.clone())],
    body: json!({
      "contents": contents,
      "generationConfig": {
        "temperature": 0.7,
        "maxOutputTokens": 2000,
      },
    }),
  }
}

/// Pulls the reply text out of a successful provider response. `None` means
/// the caller substitutes the sentinel.
pub fn extract_reply(provider: Provider, body: &Value) -> Option<String> {
  let text = match provider {
    Provider::Groq | Provider::Together => body["choices"][0]["message"]["content"].as_str(),
    Provider::HuggingFace => body[0]["generated_text"].as_str(),
    Provider::Gemini => body["candidates"][0]["content"]["parts"][0]["text"].as_str(),
  };
  text.map(str::to_string)
}

/// Best-effort extraction of a provider-supplied error message from a
/// non-success response, falling back to the HTTP status text.
pub fn extract_error(provider: Provider, status: u16, body: &str) -> String {
  let fallback = || format!("{} API error: {status}", provider.label());
  match serde_json::from_str::<Value>(body) {
    Ok(value) => {
      let message = match provider {
        Provider::HuggingFace => value["error"].as_str(),
        _ => value["error"]["message"].as_str(),
      };
      message.map(str::to_string).unwrap_or_else(fallback)
    }
    Err(_) => StatusCode::from_u16(status)
      .ok()
      .and_then(|code| code.canonical_reason())
      .map(str::to_string)
      .unwrap_or_else(fallback),
  }
}

/// One blocking round trip to the configured provider. Configuration errors
/// (unknown provider, missing credential) fail before any HTTP call.
pub async fn generate_reply(
  config: &AppConfig,
  transport: &dyn Transport,
  messages: &[Message],
  model_override: Option<&str>,
) -> Result<String, ProviderError> {
  let provider: Provider = config.provider.parse()?;
  if provider.requires_api_key() && config.api_key.trim().is_empty() {
    return Err(ProviderError::MissingApiKey(provider.id()));
  }

  let request = build_request(provider, config, messages, model_override);
  let response = transport.post(&request.url, &request.headers, &request.body).await?;

  if !(200..300).contains(&response.status) {
    return Err(ProviderError::Upstream(extract_error(
      provider,
      response.status,
      &response.body,
    )));
  }

  let body: Value = serde_json::from_str(&response.body).map_err(|err| ProviderError::Decode {
    provider: provider.label(),
    detail: err.to_string(),
  })?;

  Ok(extract_reply(provider, &body).unwrap_or_else(|| NO_RESPONSE_SENTINEL.to_string()))
}

/// The full answer pipeline shared by the HTTP handler and the controller:
/// canned-response intercept on the latest user message first, provider
/// round trip otherwise.
pub async fn respond(
  config: &AppConfig,
  transport: &dyn Transport,
  messages: &[Message],
  model_override: Option<&str>,
) -> Result<String, ProviderError> {
  if let Some(last_user) = messages.iter().rev().find(|msg| msg.role == Role::User) {
    if let Some(reply) = intercept::reply(&last_user.content, &mut rand::rng()) {
      return Ok(reply);
    }
  }
  generate_reply(config, transport, messages, model_override).await
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Mutex;

  struct RecordedCall {
    url: String,
    headers: Vec<(String, String)>,
    body: Value,
  }

  struct MockTransport {
    status: u16,
    body: String,
    calls: Mutex<Vec<RecordedCall>>,
  }

  impl MockTransport {
    fn new(status: u16, body: impl Into<String>) -> Self {
      Self { status, body: body.into(), calls: Mutex::new(Vec::new()) }
    }

    fn call_count(&self) -> usize {
      self.calls.lock().unwrap().len()
    }
  }

  #[async_trait]
  impl Transport for MockTransport {
    async fn post(
      &self,
      url: &str,
      headers: &[(String, String)],
      body: &Value,
    ) -> Result<TransportResponse, ProviderError> {
      self.calls.lock().unwrap().push(RecordedCall {
        url: url.to_string(),
        headers: headers.to_vec(),
        body: body.clone(),
      });
      Ok(TransportResponse { status: self.status, body: self.body.clone() })
    }
  }

  fn config_for(provider: &str) -> AppConfig {
    AppConfig {
      provider: provider.to_string(),
      api_key: "sk-test".to_string(),
      ..AppConfig::default()
    }
  }

  fn hello() -> Vec<Message> {
    vec![Message::user("Hello")]
  }

  #[tokio::test]
  async fn groq_payload_matches_schema() {
    let transport = MockTransport::new(200, r#"{"choices":[{"message":{"content":"Hi there"}}]}"#);
    let reply = generate_reply(&config_for("groq"), &transport, &hello(), None)
      .await
      .unwrap();
    assert_eq!(reply, "Hi there");

    let calls = transport.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call.url, "https://api.groq.com/openai/v1/chat/completions");
    assert_eq!(
      call.headers,
      vec![("Authorization".to_string(), "Bearer sk-test".to_string())]
    );
    assert_eq!(
      call.body,
      json!({
        "model": "llama-3.1-8b-instant",
        "messages": [{"role": "user", "content": "Hello"}],
        "temperature": 0.7,
        "max_tokens": 2000,
      })
    );
  }

  #[tokio::test]
  async fn model_override_applies_to_chat_style_providers() {
    let transport = MockTransport::new(200, r#"{"choices":[{"message":{"content":"ok"}}]}"#);
    generate_reply(&config_for("together"), &transport, &hello(), Some("llama-guard"))
      .await
      .unwrap();

    let calls = transport.calls.lock().unwrap();
    assert_eq!(calls[0].url, "https://api.together.xyz/v1/chat/completions");
    assert_eq!(calls[0].body["model"], "llama-guard");
  }

  #[tokio::test]
  async fn huggingface_flattens_history_into_prompt() {
    let transport = MockTransport::new(200, r#"[{"generated_text":"fine"}]"#);
    let messages = vec![
      Message::user("Hi"),
      Message::assistant("Hello"),
      Message::user("How are you?"),
    ];
    let reply = generate_reply(&config_for("huggingface"), &transport, &messages, None)
      .await
      .unwrap();
    assert_eq!(reply, "fine");

    let calls = transport.calls.lock().unwrap();
    assert_eq!(
      calls[0].body,
      json!({
        "inputs": "User: Hi\nAssistant: Hello\nUser: How are you?\nAssistant:",
        "parameters": {
          "max_new_tokens": 1000,
          "temperature": 0.7,
          "return_full_text": false,
        },
      })
    );
  }

  #[tokio::test]
  async fn huggingface_works_without_api_key() {
    let transport = MockTransport::new(200, r#"[{"generated_text":"ok"}]"#);
    let mut config = config_for("huggingface");
    config.api_key.clear();

    let reply = generate_reply(&config, &transport, &hello(), None).await.unwrap();
    assert_eq!(reply, "ok");
    let calls = transport.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].headers.is_empty());
  }

  #[tokio::test]
  async fn gemini_remaps_roles_and_passes_key_in_query() {
    let body = r#"{"candidates":[{"content":{"parts":[{"text":"sure"}]}}]}"#;
    let transport = MockTransport::new(200, body);
    let messages = vec![Message::user("Hi"), Message::assistant("Hello"), Message::user("Go on")];
    let reply = generate_reply(&config_for("gemini"), &transport, &messages, None)
      .await
      .unwrap();
    assert_eq!(reply, "sure");

    let calls = transport.calls.lock().unwrap();
    let call = &calls[0];
    assert_eq!(
      call.url,
      "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent?key=sk-test"
    );
    assert_eq!(
      call.headers,
      vec![("X-Goog-Api-Key".to_string(), "sk-test".to_string())]
    );
    assert_eq!(
      call.body,
      json!({
        "contents": [
          {"role": "user", "parts": [{"text": "Hi"}]},
          {"role": "model", "parts": [{"text": "Hello"}]},
          {"role": "user", "parts": [{"text": "Go on"}]},
        ],
        "generationConfig": {"temperature": 0.7, "maxOutputTokens": 2000},
      })
    );
  }

  #[tokio::test]
  async fn unknown_provider_fails_without_any_call() {
    let transport = MockTransport::new(200, "{}");
    let err = generate_reply(&config_for("cohere"), &transport, &hello(), None)
      .await
      .unwrap_err();
    assert!(matches!(err, ProviderError::UnknownProvider(_)));
    assert_eq!(
      err.to_string(),
      "Unknown API provider: cohere. Supported: groq, huggingface, together, gemini"
    );
    assert_eq!(transport.call_count(), 0);
  }

  #[tokio::test]
  async fn missing_api_key_fails_before_any_call() {
    let transport = MockTransport::new(200, "{}");
    let mut config = config_for("groq");
    config.api_key = "  ".to_string();

    let err = generate_reply(&config, &transport, &hello(), None).await.unwrap_err();
    assert!(matches!(err, ProviderError::MissingApiKey("groq")));
    assert_eq!(transport.call_count(), 0);
  }

  #[tokio::test]
  async fn upstream_error_message_is_extracted() {
    let transport = MockTransport::new(429, r#"{"error":{"message":"rate limited"}}"#);
    let err = generate_reply(&config_for("groq"), &transport, &hello(), None)
      .await
      .unwrap_err();
    assert_eq!(err.to_string(), "rate limited");
  }

  #[tokio::test]
  async fn unparseable_error_body_falls_back_to_status_text() {
    let transport = MockTransport::new(429, "<html>slow down</html>");
    let err = generate_reply(&config_for("groq"), &transport, &hello(), None)
      .await
      .unwrap_err();
    assert_eq!(err.to_string(), "Too Many Requests");
  }

  #[tokio::test]
  async fn error_envelope_without_message_uses_labeled_fallback() {
    let transport = MockTransport::new(500, r#"{"error":{}}"#);
    let err = generate_reply(&config_for("together"), &transport, &hello(), None)
      .await
      .unwrap_err();
    assert_eq!(err.to_string(), "Together AI API error: 500");
  }

  #[tokio::test]
  async fn huggingface_error_is_a_plain_string() {
    let transport = MockTransport::new(503, r#"{"error":"model loading"}"#);
    let mut config = config_for("huggingface");
    config.api_key.clear();
    let err = generate_reply(&config, &transport, &hello(), None).await.unwrap_err();
    assert_eq!(err.to_string(), "model loading");
  }

  #[tokio::test]
  async fn empty_payload_yields_sentinel_not_error() {
    let transport = MockTransport::new(200, r#"{"choices":[]}"#);
    let reply = generate_reply(&config_for("groq"), &transport, &hello(), None)
      .await
      .unwrap();
    assert_eq!(reply, NO_RESPONSE_SENTINEL);
  }

  #[tokio::test]
  async fn respond_short_circuits_on_creator_question() {
    let transport = MockTransport::new(500, "should never be called");
    let messages = vec![Message::user("Who created you?")];
    let reply = respond(&config_for("groq"), &transport, &messages, None)
      .await
      .unwrap();
    assert!(crate::intercept::CREATOR_RESPONSES.contains(&reply.as_str()));
    assert_eq!(transport.call_count(), 0);
  }

  #[tokio::test]
  async fn respond_uses_latest_user_message_for_intercept() {
    let transport = MockTransport::new(200, r#"{"choices":[{"message":{"content":"hi"}}]}"#);
    // The creator question is buried in history; the latest user turn is not
    // a match, so the provider is consulted.
    let messages = vec![
      Message::user("who made you"),
      Message::assistant("Aslam."),
      Message::user("What is Rust?"),
    ];
    let reply = respond(&config_for("groq"), &transport, &messages, None)
      .await
      .unwrap();
    assert_eq!(reply, "hi");
    assert_eq!(transport.call_count(), 1);
  }
}
