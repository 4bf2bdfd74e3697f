use chat_client_core::{
    dispatcher, history, ChatState, ClientConfig, HistoryTicket, SessionId, SessionStore, Theme,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::GlooBackend;
use crate::storage::BrowserStorage;

/// Shared application state, provided via Leptos context.
#[derive(Clone, Copy)]
pub struct AppState {
    /// Conversation, input buffer and single-flight flag of the active session.
    pub chat: RwSignal<ChatState>,
    pub theme: RwSignal<Theme>,
    backend: StoredValue<GlooBackend>,
}

impl AppState {
    /// Create a new `AppState` and provide it in the current Leptos context.
    pub fn provide(config: ClientConfig) -> Self {
        let state = Self {
            chat: RwSignal::new(ChatState::new()),
            theme: RwSignal::new(config.theme),
            backend: StoredValue::new(GlooBackend::new(config)),
        };

        provide_context(state);
        state
    }

    /// Resume the persisted session (or create one) and load its history.
    pub fn start(&self) {
        let session_id = SessionStore::new(BrowserStorage).get_or_create();
        if let Some(ticket) = self.chat.try_update(|s| s.activate(session_id)) {
            self.load_history(ticket, None);
        }
    }

    /// Send the input buffer. Ignored while a reply is pending or the input
    /// is blank.
    pub fn send_message(&self) {
        let Some(ticket) = self.chat.try_update(|s| s.submit_input()).flatten() else {
            return;
        };

        let chat = self.chat;
        let backend = self.backend.get_value();
        spawn_local(async move {
            let reply = dispatcher::exchange(&backend, &ticket).await;
            chat.update(|s| {
                s.finish_send(ticket, reply);
            });
        });
    }

    /// Start a new chat. The conversation is cleared immediately; the backend
    /// is then asked to drop the old session before the new one's history is
    /// fetched.
    pub fn reset_session(&self) {
        let previous = self.chat.with_untracked(|s| s.session_id().cloned());
        let session_id = SessionStore::new(BrowserStorage).reset();
        if let Some(ticket) = self.chat.try_update(|s| s.activate(session_id)) {
            self.load_history(ticket, previous);
        }
    }

    pub fn toggle_theme(&self) {
        self.theme.update(|t| *t = t.toggled());
    }

    fn load_history(&self, ticket: HistoryTicket, discard: Option<SessionId>) {
        let chat = self.chat;
        let backend = self.backend.get_value();
        spawn_local(async move {
            if let Some(previous) = discard {
                dispatcher::discard_session(&backend, &previous).await;
            }
            let messages = history::load_history(&backend, &ticket.session_id).await;
            chat.update(|s| {
                s.apply_history(&ticket, messages);
            });
        });
    }
}
