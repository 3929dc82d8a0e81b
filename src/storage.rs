//! Durable home for chat sessions and scalar settings. Every operation
//! absorbs backend failures and returns a default instead; callers never see
//! a storage error.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;

use crate::config::DEFAULT_GROQ_MODEL;
use crate::models::{Chat, Message, Theme};

const KEY_CURRENT_CHAT_ID: &str = "current_chat_id";
const KEY_THEME: &str = "theme";
const KEY_SELECTED_MODEL: &str = "selected_model";

pub struct Store {
  conn: Option<Mutex<Connection>>,
}

impl Store {
  /// Opens (or creates) the database at `path`. On failure the store still
  /// constructs, but every operation becomes a no-op returning defaults.
  pub fn open(path: &Path) -> Store {
    match Connection::open(path) {
      Ok(conn) => Store::from_connection(conn),
      Err(err) => {
        tracing::warn!(error = %err, "chat store unavailable, running without persistence");
        Store { conn: None }
      }
    }
  }

  pub fn in_memory() -> Store {
    match Connection::open_in_memory() {
      Ok(conn) => Store::from_connection(conn),
      Err(err) => {
        tracing::warn!(error = %err, "in-memory store unavailable");
        Store { conn: None }
      }
    }
  }

  /// A store with no backend at all; useful for headless contexts.
  pub fn unavailable() -> Store {
    Store { conn: None }
  }

  fn from_connection(conn: Connection) -> Store {
    let init = conn.execute_batch(
      "
      CREATE TABLE IF NOT EXISTS sessions (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        messages_json TEXT NOT NULL,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
      );
      CREATE TABLE IF NOT EXISTS settings (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
      );
      ",
    );
    match init {
      Ok(()) => Store { conn: Some(Mutex::new(conn)) },
      Err(err) => {
        tracing::warn!(error = %err, "chat store schema init failed, running without persistence");
        Store { conn: None }
      }
    }
  }

  /// All sessions, most recently inserted first. Upserting an existing
  /// session does not move it. Corrupt rows are skipped.
  pub async fn list_sessions(&self) -> Vec<Chat> {
    let Some(conn) = &self.conn else { return Vec::new() };
    let conn = conn.lock().await;
    let result = (|| -> rusqlite::Result<Vec<Chat>> {
      let mut stmt = conn.prepare(
        "SELECT id, title, messages_json, created_at, updated_at FROM sessions ORDER BY rowid DESC",
      )?;
      let rows = stmt.query_map([], row_to_parts)?;
      let mut sessions = Vec::new();
      for row in rows {
        if let Some(chat) = parts_to_chat(row?) {
          sessions.push(chat);
        }
      }
      Ok(sessions)
    })();
    match result {
      Ok(sessions) => sessions,
      Err(err) => {
        tracing::warn!(error = %err, "failed to list sessions");
        Vec::new()
      }
    }
  }

  /// Upsert by id: replaces an existing session in place, inserts a new one
  /// at the front of the listing order.
  pub async fn save_session(&self, chat: &Chat) {
    let Some(conn) = &self.conn else { return };
    let messages_json = match serde_json::to_string(&chat.messages) {
      Ok(json) => json,
      Err(err) => {
        tracing::warn!(error = %err, chat_id = %chat.id, "failed to encode session");
        return;
      }
    };
    let conn = conn.lock().await;
    let result = conn.execute(
      "INSERT INTO sessions (id, title, messages_json, created_at, updated_at)
       VALUES (?1, ?2, ?3, ?4, ?5)
       ON CONFLICT(id) DO UPDATE SET
         title = excluded.title,
         messages_json = excluded.messages_json,
         created_at = excluded.created_at,
         updated_at = excluded.updated_at",
      params![chat.id, chat.title, messages_json, chat.created_at, chat.updated_at],
    );
    if let Err(err) = result {
      tracing::warn!(error = %err, chat_id = %chat.id, "failed to save session");
    }
  }

  /// Permanent removal; a no-op when the id is absent.
  pub async fn delete_session(&self, id: &str) {
    let Some(conn) = &self.conn else { return };
    let conn = conn.lock().await;
    if let Err(err) = conn.execute("DELETE FROM sessions WHERE id = ?1", params![id]) {
      tracing::warn!(error = %err, chat_id = %id, "failed to delete session");
    }
  }

  pub async fn get_session(&self, id: &str) -> Option<Chat> {
    let Some(conn) = &self.conn else { return None };
    let conn = conn.lock().await;
    let result = conn
      .query_row(
        "SELECT id, title, messages_json, created_at, updated_at FROM sessions WHERE id = ?1",
        params![id],
        row_to_parts,
      )
      .optional();
    match result {
      Ok(row) => row.and_then(parts_to_chat),
      Err(err) => {
        tracing::warn!(error = %err, chat_id = %id, "failed to read session");
        None
      }
    }
  }

  pub async fn current_session_id(&self) -> Option<String> {
    self.get_setting(KEY_CURRENT_CHAT_ID).await
  }

  pub async fn set_current_session_id(&self, id: Option<&str>) {
    match id {
      Some(id) => self.set_setting(KEY_CURRENT_CHAT_ID, id).await,
      None => self.clear_setting(KEY_CURRENT_CHAT_ID).await,
    }
  }

  pub async fn theme(&self) -> Theme {
    match self.get_setting(KEY_THEME).await {
      Some(value) => Theme::parse_or_default(&value),
      None => Theme::default(),
    }
  }

  pub async fn set_theme(&self, theme: Theme) {
    self.set_setting(KEY_THEME, theme.as_str()).await;
  }

  pub async fn selected_model(&self) -> String {
    self
      .get_setting(KEY_SELECTED_MODEL)
      .await
      .filter(|model| !model.trim().is_empty())
      .unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string())
  }

  pub async fn set_selected_model(&self, model: &str) {
    self.set_setting(KEY_SELECTED_MODEL, model).await;
  }

  async fn get_setting(&self, key: &str) -> Option<String> {
    let Some(conn) = &self.conn else { return None };
    let conn = conn.lock().await;
    let result = conn
      .query_row("SELECT value FROM settings WHERE key = ?1", params![key], |row| {
        row.get::<_, String>(0)
      })
      .optional();
    match result {
      Ok(value) => value,
      Err(err) => {
        tracing::warn!(error = %err, key, "failed to read setting");
        None
      }
    }
  }

  async fn set_setting(&self, key: &str, value: &str) {
    let Some(conn) = &self.conn else { return };
    let conn = conn.lock().await;
    let result = conn.execute(
      "INSERT INTO settings (key, value) VALUES (?1, ?2)
       ON CONFLICT(key) DO UPDATE SET value = excluded.value",
      params![key, value],
    );
    if let Err(err) = result {
      tracing::warn!(error = %err, key, "failed to write setting");
    }
  }

  async fn clear_setting(&self, key: &str) {
    let Some(conn) = &self.conn else { return };
    let conn = conn.lock().await;
    if let Err(err) = conn.execute("DELETE FROM settings WHERE key = ?1", params![key]) {
      tracing::warn!(error = %err, key, "failed to clear setting");
    }
  }
}

type ChatParts = (String, String, String, i64, i64);

fn row_to_parts(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChatParts> {
  Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn parts_to_chat((id, title, messages_json, created_at, updated_at): ChatParts) -> Option<Chat> {
  match serde_json::from_str::<Vec<Message>>(&messages_json) {
    Ok(messages) => Some(Chat { id, title, messages, created_at, updated_at }),
    Err(err) => {
      tracing::warn!(error = %err, chat_id = %id, "skipping corrupt session row");
      None
    }
  }
}
