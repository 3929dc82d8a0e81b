use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "New Chat";
pub const TITLE_MAX_CHARS: usize = 50;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  User,
  Assistant,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Message {
  pub role: Role,
  pub content: String,
}

impl Message {
  pub fn user(content: impl Into<String>) -> Self {
    Self { role: Role::User, content: content.into() }
  }

  pub fn assistant(content: impl Into<String>) -> Self {
    Self { role: Role::Assistant, content: content.into() }
  }
}

/// One saved conversation. Timestamps are epoch milliseconds.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Chat {
  pub id: String,
  pub title: String,
  pub messages: Vec<Message>,
  pub created_at: i64,
  pub updated_at: i64,
}

/// Title is the leading text of the first message, capped at 50 chars.
pub fn derive_title(messages: &[Message]) -> String {
  match messages.first() {
    Some(first) if !first.content.is_empty() => {
      first.content.chars().take(TITLE_MAX_CHARS).collect()
    }
    _ => DEFAULT_TITLE.to_string(),
  }
}

/// Something the user attached alongside their typed input. The attachment is
/// folded into the message content as an inline marker, so downstream code
/// only ever sees plain text.
#[derive(Clone, Debug)]
pub enum Attachment {
  /// An image small enough to inline as a data URI.
  Image { name: String, data_uri: String },
  /// A readable text file, embedded verbatim.
  Text { name: String, body: String },
  /// Anything else; only the name and size are mentioned.
  Opaque { name: String, size_kb: f64 },
}

/// Builds message content from typed input plus an optional attachment,
/// using the `[Image: ...]` / `[File: ...]` marker format.
pub fn compose_content(input: &str, attachment: Option<&Attachment>) -> String {
  let Some(attachment) = attachment else {
    return input.to_string();
  };

  let prefix = if input.is_empty() {
    String::new()
  } else {
    format!("{input}\n\n")
  };

  match attachment {
    Attachment::Image { name, data_uri } => {
      format!("{prefix}[Image: {name}]\n{data_uri}")
    }
    Attachment::Text { name, body } => {
      format!("{prefix}[File: {name}]\n{body}")
    }
    Attachment::Opaque { name, size_kb } => {
      format!("{prefix}[File attached: {name} ({size_kb:.2} KB)]")
    }
  }
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
  Light,
  #[default]
  Dark,
}

impl Theme {
  pub fn as_str(&self) -> &'static str {
    match self {
      Theme::Light => "light",
      Theme::Dark => "dark",
    }
  }

  /// Unrecognized values fall back to the default.
  pub fn parse_or_default(value: &str) -> Self {
    match value {
      "light" => Theme::Light,
      "dark" => Theme::Dark,
      _ => Theme::default(),
    }
  }
}

#[derive(Serialize, Deserialize, Clone)]
pub struct ChatResponse {
  pub message: String,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct ErrorResponse {
  pub error: String,
}
