//! A provider-agnostic chat relay: a uniform message list goes in, one
//! assistant reply comes out, whichever of the four supported LLM providers
//! is configured. Conversations persist in a local SQLite store.

pub mod config;
pub mod controller;
pub mod intercept;
pub mod models;
pub mod providers;
pub mod reveal;
pub mod router;
pub mod storage;

pub use config::AppConfig;
pub use controller::{ChatController, ControllerError};
pub use models::{Attachment, Chat, Message, Role, Theme};
pub use providers::{HttpTransport, Provider, ProviderError, Transport};
pub use reveal::RevealTask;
pub use storage::Store;
