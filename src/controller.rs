//! UI-facing chat orchestration: owns the active message list, drives the
//! answer pipeline, and writes every mutation through to the store.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::models::{compose_content, derive_title, Attachment, Chat, Message};
use crate::providers::{respond, ProviderError, Transport};
use crate::storage::Store;

#[derive(thiserror::Error, Debug)]
pub enum ControllerError {
  #[error("a request is already in flight")]
  Busy,
  #[error("nothing to send")]
  EmptyInput,
  #[error("no message at index {0}")]
  BadIndex(usize),
  #[error(transparent)]
  Provider(#[from] ProviderError),
}

pub struct ChatController {
  config: AppConfig,
  transport: Arc<dyn Transport>,
  store: Store,
  messages: Vec<Message>,
  current_id: Option<String>,
  model: String,
  busy: bool,
}

impl ChatController {
  /// Restores the last active session (if any) and the selected model.
  pub async fn new(config: AppConfig, transport: Arc<dyn Transport>, store: Store) -> Self {
    let model = store.selected_model().await;
    let mut current_id = None;
    let mut messages = Vec::new();
    if let Some(id) = store.current_session_id().await {
      if let Some(chat) = store.get_session(&id).await {
        current_id = Some(chat.id);
        messages = chat.messages;
      }
    }
    Self { config, transport, store, messages, current_id, model, busy: false }
  }

  pub fn messages(&self) -> &[Message] {
    &self.messages
  }

  pub fn current_id(&self) -> Option<&str> {
    self.current_id.as_deref()
  }

  pub fn is_busy(&self) -> bool {
    self.busy
  }

  pub fn store(&self) -> &Store {
    &self.store
  }

  pub fn model(&self) -> &str {
    &self.model
  }

  pub async fn set_model(&mut self, model: &str) {
    self.model = model.to_string();
    self.store.set_selected_model(model).await;
  }

  /// Sends one user turn and appends the assistant's answer. Provider
  /// failures surface as an assistant-style "Error: ..." message rather than
  /// an Err, so the conversation records what the user saw.
  pub async fn send(
    &mut self,
    input: &str,
    attachment: Option<&Attachment>,
  ) -> Result<String, ControllerError> {
    if self.busy {
      return Err(ControllerError::Busy);
    }
    if input.trim().is_empty() && attachment.is_none() {
      return Err(ControllerError::EmptyInput);
    }

    self.busy = true;
    let content = compose_content(input, attachment);
    self.messages.push(Message::user(content));
    self.persist().await;

    let reply = match respond(&self.config, self.transport.as_ref(), &self.messages, Some(&self.model)).await
    {
      Ok(reply) => reply,
      Err(err) => {
        tracing::error!(error = %err, "chat request failed");
        format!("Error: {err}")
      }
    };

    self.messages.push(Message::assistant(reply.clone()));
    self.persist().await;
    self.busy = false;
    Ok(reply)
  }

  /// Re-asks with the history truncated before `index`, replacing everything
  /// from `index` on. On failure the conversation is left untouched.
  pub async fn regenerate(&mut self, index: usize) -> Result<String, ControllerError> {
    if self.busy {
      return Err(ControllerError::Busy);
    }
    if index == 0 || index > self.messages.len() {
      return Err(ControllerError::BadIndex(index));
    }

    self.busy = true;
    let truncated = self.messages[..index].to_vec();
    let result = respond(&self.config, self.transport.as_ref(), &truncated, Some(&self.model)).await;
    let outcome = match result {
      Ok(reply) => {
        self.messages = truncated;
        self.messages.push(Message::assistant(reply.clone()));
        self.persist().await;
        Ok(reply)
      }
      Err(err) => {
        tracing::error!(error = %err, "regenerate failed");
        Err(err.into())
      }
    };
    self.busy = false;
    outcome
  }

  pub async fn edit_message(&mut self, index: usize, content: &str) -> Result<(), ControllerError> {
    let message = self.messages.get_mut(index).ok_or(ControllerError::BadIndex(index))?;
    message.content = content.to_string();
    self.persist().await;
    Ok(())
  }

  pub async fn delete_message(&mut self, index: usize) -> Result<(), ControllerError> {
    if index >= self.messages.len() {
      return Err(ControllerError::BadIndex(index));
    }
    self.messages.remove(index);
    self.persist().await;
    Ok(())
  }

  pub async fn new_chat(&mut self) {
    self.messages.clear();
    self.current_id = None;
    self.store.set_current_session_id(None).await;
  }

  pub async fn load_chat(&mut self, id: &str) -> bool {
    match self.store.get_session(id).await {
      Some(chat) => {
        self.current_id = Some(chat.id.clone());
        self.messages = chat.messages;
        self.store.set_current_session_id(Some(&chat.id)).await;
        true
      }
      None => false,
    }
  }

  /// Permanent; there is no undo. Deleting the active chat starts a fresh one.
  pub async fn delete_chat(&mut self, id: &str) {
    self.store.delete_session(id).await;
    if self.current_id.as_deref() == Some(id) {
      self.new_chat().await;
    }
  }

  pub async fn list_chats(&self) -> Vec<Chat> {
    self.store.list_sessions().await
  }

  /// Writes the whole active conversation through to the store, keeping the
  /// original creation time on updates.
  async fn persist(&mut self) {
    if self.messages.is_empty() {
      return;
    }
    let id = self
      .current_id
      .clone()
      .unwrap_or_else(|| Uuid::new_v4().to_string());
    let now = Utc::now().timestamp_millis();
    let created_at = match self.store.get_session(&id).await {
      Some(existing) => existing.created_at,
      None => now,
    };
    let chat = Chat {
      id: id.clone(),
      title: derive_title(&self.messages),
      messages: self.messages.clone(),
      created_at,
      updated_at: now,
    };
    self.store.save_session(&chat).await;
    self.store.set_current_session_id(Some(&id)).await;
    self.current_id = Some(id);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::Role;
  use crate::providers::{TransportResponse, NO_RESPONSE_SENTINEL};
  use async_trait::async_trait;
  use serde_json::Value;
  use std::sync::atomic::{AtomicUsize, Ordering};

  struct ScriptedTransport {
    status: u16,
    body: String,
    calls: AtomicUsize,
  }

  impl ScriptedTransport {
    fn replying(content: &str) -> Arc<Self> {
      Arc::new(Self {
        status: 200,
        body: format!(r#"{{"choices":[{{"message":{{"content":"{content}"}}}}]}}"#),
        calls: AtomicUsize::new(0),
      })
    }

    fn respond_with(status: u16, body: &str) -> Arc<Self> {
      Arc::new(Self { status, body: body.to_string(), calls: AtomicUsize::new(0) })
    }

    fn calls(&self) -> usize {
      self.calls.load(Ordering::SeqCst)
    }
  }

  #[async_trait]
  impl Transport for ScriptedTransport {
    async fn post(
      &self,
      _url: &str,
      _headers: &[(String, String)],
      _body: &Value,
    ) -> Result<TransportResponse, ProviderError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      Ok(TransportResponse { status: self.status, body: self.body.clone() })
    }
  }

  fn config() -> AppConfig {
    AppConfig {
      api_key: "sk-test".to_string(),
      ..AppConfig::default()
    }
  }

  async fn controller(transport: Arc<ScriptedTransport>) -> ChatController {
    ChatController::new(config(), transport, Store::in_memory()).await
  }

  #[tokio::test]
  async fn send_appends_both_turns_and_persists() {
    let transport = ScriptedTransport::replying("Hi there");
    let mut ctl = controller(transport.clone()).await;

    let reply = ctl.send("Hello", None).await.unwrap();
    assert_eq!(reply, "Hi there");
    assert_eq!(ctl.messages().len(), 2);
    assert_eq!(ctl.messages()[0].role, Role::User);
    assert_eq!(ctl.messages()[1].content, "Hi there");
    assert!(!ctl.is_busy());
    assert_eq!(transport.calls(), 1);

    let id = ctl.current_id().unwrap().to_string();
    let saved = ctl.store().get_session(&id).await.unwrap();
    assert_eq!(saved.title, "Hello");
    assert_eq!(saved.messages, ctl.messages());
    assert_eq!(ctl.store().current_session_id().await.as_deref(), Some(id.as_str()));
  }

  #[tokio::test]
  async fn send_preserves_created_at_across_updates() {
    let mut ctl = controller(ScriptedTransport::replying("ok")).await;
    ctl.send("first", None).await.unwrap();
    let id = ctl.current_id().unwrap().to_string();
    let created_at = ctl.store().get_session(&id).await.unwrap().created_at;

    ctl.send("second", None).await.unwrap();
    let saved = ctl.store().get_session(&id).await.unwrap();
    assert_eq!(saved.created_at, created_at);
    assert!(saved.updated_at >= created_at);
    assert_eq!(saved.messages.len(), 4);
  }

  #[tokio::test]
  async fn provider_failure_becomes_an_assistant_error_message() {
    let transport = ScriptedTransport::respond_with(429, r#"{"error":{"message":"rate limited"}}"#);
    let mut ctl = controller(transport).await;

    let reply = ctl.send("Hello", None).await.unwrap();
    assert_eq!(reply, "Error: rate limited");
    assert_eq!(ctl.messages()[1].content, "Error: rate limited");
  }

  #[tokio::test]
  async fn creator_question_never_reaches_the_transport() {
    let transport = ScriptedTransport::respond_with(500, "unused");
    let mut ctl = controller(transport.clone()).await;

    let reply = ctl.send("who created you?", None).await.unwrap();
    assert!(crate::intercept::CREATOR_RESPONSES.contains(&reply.as_str()));
    assert_eq!(transport.calls(), 0);
  }

  #[tokio::test]
  async fn empty_input_without_attachment_is_rejected() {
    let mut ctl = controller(ScriptedTransport::replying("ok")).await;
    let err = ctl.send("   ", None).await.unwrap_err();
    assert!(matches!(err, ControllerError::EmptyInput));
    assert!(ctl.messages().is_empty());
  }

  #[tokio::test]
  async fn attachment_only_send_is_allowed() {
    let mut ctl = controller(ScriptedTransport::replying("ok")).await;
    let attachment = Attachment::Text { name: "a.txt".to_string(), body: "data".to_string() };
    ctl.send("", Some(&attachment)).await.unwrap();
    assert_eq!(ctl.messages()[0].content, "[File: a.txt]\ndata");
  }

  #[tokio::test]
  async fn new_chat_clears_state_and_pointer() {
    let mut ctl = controller(ScriptedTransport::replying("ok")).await;
    ctl.send("hello", None).await.unwrap();

    ctl.new_chat().await;
    assert!(ctl.messages().is_empty());
    assert!(ctl.current_id().is_none());
    assert_eq!(ctl.store().current_session_id().await, None);
    // The old session itself survives.
    assert_eq!(ctl.list_chats().await.len(), 1);
  }

  #[tokio::test]
  async fn load_chat_restores_a_saved_session() {
    let mut ctl = controller(ScriptedTransport::replying("ok")).await;
    ctl.send("hello", None).await.unwrap();
    let id = ctl.current_id().unwrap().to_string();

    ctl.new_chat().await;
    assert!(ctl.load_chat(&id).await);
    assert_eq!(ctl.messages().len(), 2);
    assert_eq!(ctl.current_id(), Some(id.as_str()));

    assert!(!ctl.load_chat("ghost").await);
  }

  #[tokio::test]
  async fn deleting_the_active_chat_resets_to_fresh() {
    let mut ctl = controller(ScriptedTransport::replying("ok")).await;
    ctl.send("hello", None).await.unwrap();
    let id = ctl.current_id().unwrap().to_string();

    ctl.delete_chat(&id).await;
    assert!(ctl.messages().is_empty());
    assert!(ctl.current_id().is_none());
    assert!(ctl.list_chats().await.is_empty());
  }

  #[tokio::test]
  async fn edit_and_delete_message_write_through() {
    let mut ctl = controller(ScriptedTransport::replying("ok")).await;
    ctl.send("hello", None).await.unwrap();
    let id = ctl.current_id().unwrap().to_string();

    ctl.edit_message(0, "hi there").await.unwrap();
    assert_eq!(ctl.store().get_session(&id).await.unwrap().messages[0].content, "hi there");

    ctl.delete_message(1).await.unwrap();
    assert_eq!(ctl.store().get_session(&id).await.unwrap().messages.len(), 1);

    assert!(matches!(ctl.edit_message(9, "x").await, Err(ControllerError::BadIndex(9))));
    assert!(matches!(ctl.delete_message(9).await, Err(ControllerError::BadIndex(9))));
  }

  #[tokio::test]
  async fn regenerate_replaces_the_tail() {
    let mut ctl = controller(ScriptedTransport::replying("take two")).await;
    ctl.send("hello", None).await.unwrap();
    assert_eq!(ctl.messages().len(), 2);

    let reply = ctl.regenerate(1).await.unwrap();
    assert_eq!(reply, "take two");
    assert_eq!(ctl.messages().len(), 2);
    assert_eq!(ctl.messages()[1].content, "take two");

    assert!(matches!(ctl.regenerate(0).await, Err(ControllerError::BadIndex(0))));
    assert!(matches!(ctl.regenerate(9).await, Err(ControllerError::BadIndex(9))));
  }

  #[tokio::test]
  async fn regenerate_failure_leaves_history_untouched() {
    let transport = ScriptedTransport::respond_with(500, r#"{"error":{"message":"down"}}"#);
    let mut ctl = controller(transport).await;
    ctl.messages = vec![Message::user("hello"), Message::assistant("ok")];
    let before = ctl.messages().to_vec();

    let err = ctl.regenerate(1).await.unwrap_err();
    assert!(matches!(err, ControllerError::Provider(_)));
    assert_eq!(ctl.messages(), before.as_slice());
    assert!(!ctl.is_busy());
  }

  #[tokio::test]
  async fn controller_resumes_the_current_session() {
    let store = Store::in_memory();
    let chat = Chat {
      id: "abc".to_string(),
      title: "resumed".to_string(),
      messages: vec![Message::user("resumed"), Message::assistant("yes")],
      created_at: 1,
      updated_at: 2,
    };
    store.save_session(&chat).await;
    store.set_current_session_id(Some("abc")).await;

    let ctl = ChatController::new(config(), ScriptedTransport::replying("ok"), store).await;
    assert_eq!(ctl.current_id(), Some("abc"));
    assert_eq!(ctl.messages().len(), 2);
  }

  #[tokio::test]
  async fn empty_provider_payload_surfaces_the_sentinel() {
    let transport = ScriptedTransport::respond_with(200, r#"{"choices":[]}"#);
    let mut ctl = controller(transport).await;
    let reply = ctl.send("hello", None).await.unwrap();
    assert_eq!(reply, NO_RESPONSE_SENTINEL);
  }
}
