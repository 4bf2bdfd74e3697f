use log::{debug, warn};

use crate::models::{Message, SessionId};

/// Bot reply shown when a chat request fails for any reason.
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong.";

/// Issued by [`ChatState::activate`]; identifies the history load that belongs
/// to one session activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTicket {
    pub session_id: SessionId,
    generation: u64,
}

/// Issued by [`ChatState::begin_send`]; carries the request to make and the
/// activation it was made under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendTicket {
    pub query: String,
    pub session_id: SessionId,
    generation: u64,
}

/// Conversation state of the client.
///
/// Transitions are synchronous; the two network waits happen between a
/// `begin`/`activate` call and the matching `finish`/`apply` call. Each session
/// activation bumps `generation`, and results tagged with an older generation
/// are dropped, so a reset never shows messages of the previous session.
///
/// Sending is refused until the history of the active session has been
/// applied, so the conversation is never assembled from two sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatState {
    session_id: Option<SessionId>,
    messages: Vec<Message>,
    input: String,
    loading: bool,
    history_pending: bool,
    generation: u64,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// True while a chat request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True between [`activate`](Self::activate) and the matching
    /// [`apply_history`](Self::apply_history).
    pub fn is_history_pending(&self) -> bool {
        self.history_pending
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the send affordance should be enabled.
    pub fn can_send(&self) -> bool {
        self.is_ready() && !self.input.trim().is_empty()
    }

    fn is_ready(&self) -> bool {
        !self.loading && !self.history_pending
    }

    /// Makes `session_id` the active session and clears the conversation.
    ///
    /// The loading flag is left alone: a chat request still in flight keeps it
    /// until it resolves.
    pub fn activate(&mut self, session_id: SessionId) -> HistoryTicket {
        self.generation += 1;
        self.session_id = Some(session_id.clone());
        self.messages.clear();
        self.history_pending = true;
        debug!("Activated session {session_id} (generation {})", self.generation);
        HistoryTicket { session_id, generation: self.generation }
    }

    /// Replaces the conversation with backend history and allows sending.
    /// Returns `false` when the ticket belongs to a replaced session.
    pub fn apply_history(&mut self, ticket: &HistoryTicket, history: Vec<Message>) -> bool {
        if ticket.generation != self.generation {
            debug!("Discarding history of replaced session {}", ticket.session_id);
            return false;
        }
        self.messages = history;
        self.history_pending = false;
        true
    }

    /// Starts sending `text`: appends it as a user message and takes the
    /// single-flight flag.
    ///
    /// Returns `None`, changing nothing, when the text is blank, a send or
    /// the history load is still outstanding, or no session is active.
    pub fn begin_send(&mut self, text: &str) -> Option<SendTicket> {
        if text.trim().is_empty() || !self.is_ready() {
            return None;
        }
        let Some(session_id) = self.session_id.clone() else {
            warn!("Ignoring message sent before a session was activated");
            return None;
        };

        self.messages.push(Message::user(text));
        self.loading = true;
        Some(SendTicket {
            query: text.to_string(),
            session_id,
            generation: self.generation,
        })
    }

    /// [`begin_send`](Self::begin_send) with the current input buffer.
    pub fn submit_input(&mut self) -> Option<SendTicket> {
        let text = self.input.clone();
        self.begin_send(&text)
    }

    /// Completes a send. Always clears the input and releases the flag; the
    /// reply is appended only if the ticket's session is still active.
    pub fn finish_send(&mut self, ticket: SendTicket, reply: Message) -> bool {
        self.input.clear();
        self.loading = false;

        if ticket.generation != self.generation {
            warn!(
                "Discarding reply for replaced session {}: {:?}",
                ticket.session_id, reply.text
            );
            return false;
        }
        self.messages.push(reply);
        true
    }
}
