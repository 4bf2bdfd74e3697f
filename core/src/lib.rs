//! Session-synchronised chat client core.
//!
//! Holds everything the browser and terminal front ends share: the session
//! store, history decoding, the conversation state machine, the dispatcher
//! steps and the per-message view model. Hosts plug in their own I/O through
//! [`ChatBackend`] and [`KeyValueStore`].

pub mod backend;
pub mod client;
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod history;
pub mod models;
pub mod session;
pub mod state;
pub mod view;

pub use backend::ChatBackend;
pub use client::ChatClient;
pub use config::{ClientConfig, DEFAULT_API_BASE};
pub use errors::{ClientError, StorageError};
pub use history::HistoryPayload;
pub use models::{ChatAnswer, ChatForm, Message, MessageRole, SessionId};
pub use session::{KeyValueStore, MemoryStore, SessionStore, SESSION_KEY};
pub use state::{ChatState, HistoryTicket, SendTicket, FALLBACK_REPLY};
pub use view::{Alignment, MessageView, Theme};
