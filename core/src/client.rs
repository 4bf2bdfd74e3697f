use std::cell::RefCell;

use crate::backend::ChatBackend;
use crate::dispatcher;
use crate::history;
use crate::models::{Message, SessionId};
use crate::session::{KeyValueStore, SessionStore};
use crate::state::{ChatState, HistoryTicket};

/// Drives [`ChatState`] against a backend from a single execution context.
///
/// Methods take `&self` so several calls can be pending at once on the same
/// task (a user pressing send twice); state borrows are never held across an
/// await.
pub struct ChatClient<B, S> {
    backend: B,
    sessions: RefCell<SessionStore<S>>,
    state: RefCell<ChatState>,
}

impl<B: ChatBackend, S: KeyValueStore> ChatClient<B, S> {
    pub fn new(backend: B, storage: S) -> Self {
        Self {
            backend,
            sessions: RefCell::new(SessionStore::new(storage)),
            state: RefCell::new(ChatState::new()),
        }
    }

    /// Resolves the persisted session and loads its history.
    pub async fn start(&self) -> SessionId {
        let session_id = self.sessions.borrow_mut().get_or_create();
        let ticket = self.state.borrow_mut().activate(session_id.clone());
        self.load_history(ticket).await;
        session_id
    }

    /// Sends `text`. Returns `false` without doing anything when the text is
    /// blank, another send is outstanding, or history is still loading.
    pub async fn send(&self, text: &str) -> bool {
        let ticket = self.state.borrow_mut().begin_send(text);
        let Some(ticket) = ticket else {
            return false;
        };

        let reply = dispatcher::exchange(&self.backend, &ticket).await;
        self.state.borrow_mut().finish_send(ticket, reply);
        true
    }

    /// Sends the current input buffer.
    pub async fn submit(&self) -> bool {
        let input = self.state.borrow().input().to_string();
        self.send(&input).await
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.state.borrow_mut().set_input(text);
    }

    /// Starts a new session. The conversation is cleared before the backend
    /// is asked to drop the old session, and regardless of its answer.
    pub async fn reset_session(&self) -> SessionId {
        let previous = self.state.borrow().session_id().cloned();
        let session_id = self.sessions.borrow_mut().reset();
        let ticket = self.state.borrow_mut().activate(session_id.clone());

        if let Some(previous) = previous {
            dispatcher::discard_session(&self.backend, &previous).await;
        }
        self.load_history(ticket).await;
        session_id
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.state.borrow().session_id().cloned()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.borrow().messages().to_vec()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// A copy of the whole state, for rendering.
    pub fn snapshot(&self) -> ChatState {
        self.state.borrow().clone()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn load_history(&self, ticket: HistoryTicket) {
        let messages = history::load_history(&self.backend, &ticket.session_id).await;
        self.state.borrow_mut().apply_history(&ticket, messages);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use futures_util::join;
    use tokio::sync::oneshot;

    use super::*;
    use crate::errors::ClientError;
    use crate::session::{MemoryStore, SESSION_KEY};
    use crate::state::FALLBACK_REPLY;

    enum Reply {
        Body(&'static str),
        Refused,
    }

    impl Reply {
        fn into_result(self) -> Result<String, ClientError> {
            match self {
                Reply::Body(body) => Ok(body.to_string()),
                Reply::Refused => Err(ClientError::Network("connection refused".into())),
            }
        }
    }

    /// Backend answering from scripted replies and recording every call.
    #[derive(Default)]
    struct ScriptedBackend {
        histories: RefCell<VecDeque<Reply>>,
        answers: RefCell<VecDeque<Reply>>,
        delete_fails: bool,
        gate: RefCell<Option<oneshot::Receiver<()>>>,
        history_gate: RefCell<Option<oneshot::Receiver<()>>>,
        calls: RefCell<Vec<String>>,
    }

    impl ScriptedBackend {
        fn history(self, reply: Reply) -> Self {
            self.histories.borrow_mut().push_back(reply);
            self
        }

        fn answer(self, reply: Reply) -> Self {
            self.answers.borrow_mut().push_back(reply);
            self
        }

        /// Holds the next chat request open until the returned sender fires.
        fn gated(self) -> (Self, oneshot::Sender<()>) {
            let (tx, rx) = oneshot::channel();
            *self.gate.borrow_mut() = Some(rx);
            (self, tx)
        }

        /// Holds the next history request open until the returned sender fires.
        fn gated_history(self) -> (Self, oneshot::Sender<()>) {
            let (tx, rx) = oneshot::channel();
            *self.history_gate.borrow_mut() = Some(rx);
            (self, tx)
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl ChatBackend for ScriptedBackend {
        async fn fetch_history(&self, session_id: &SessionId) -> Result<String, ClientError> {
            self.calls.borrow_mut().push(format!("GET /history/{session_id}"));
            let gate = self.history_gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            let reply = self.histories.borrow_mut().pop_front();
            reply.unwrap_or(Reply::Body("[]")).into_result()
        }

        async fn post_chat(&self, query: &str, session_id: &SessionId) -> Result<String, ClientError> {
            self.calls.borrow_mut().push(format!("POST /chat {query} {session_id}"));
            let gate = self.gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            let reply = self.answers.borrow_mut().pop_front();
            reply.unwrap_or(Reply::Refused).into_result()
        }

        async fn delete_session(&self, session_id: &SessionId) -> Result<(), ClientError> {
            self.calls.borrow_mut().push(format!("DELETE /session/{session_id}"));
            if self.delete_fails {
                return Err(ClientError::Server { status: 500 });
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn start_loads_bare_history() {
        let backend = ScriptedBackend::default().history(Reply::Body(r#"[{"role":"user","text":"hi"}]"#));
        let client = ChatClient::new(backend, MemoryStore::new());

        let session_id = client.start().await;

        assert_eq!(client.messages(), vec![Message::user("hi")]);
        assert_eq!(client.backend().calls(), vec![format!("GET /history/{session_id}")]);
    }

    #[tokio::test]
    async fn start_loads_wrapped_history() {
        let backend = ScriptedBackend::default()
            .history(Reply::Body(r#"{"messages":[{"role":"bot","text":"hello"}]}"#));
        let client = ChatClient::new(backend, MemoryStore::new());

        client.start().await;

        assert_eq!(client.messages(), vec![Message::bot("hello")]);
    }

    #[tokio::test]
    async fn malformed_or_failed_history_is_empty() {
        for reply in [Reply::Body("42"), Reply::Body("<html>"), Reply::Refused] {
            let client = ChatClient::new(ScriptedBackend::default().history(reply), MemoryStore::new());
            client.start().await;
            assert!(client.messages().is_empty());
        }
    }

    #[tokio::test]
    async fn start_resumes_persisted_session() {
        let storage = MemoryStore::new();
        storage.set(SESSION_KEY, "persisted").unwrap();
        let client = ChatClient::new(ScriptedBackend::default(), storage);

        assert_eq!(client.start().await.as_str(), "persisted");
        assert_eq!(client.backend().calls(), vec!["GET /history/persisted".to_string()]);
    }

    #[tokio::test]
    async fn blank_send_is_a_no_op() {
        let client = ChatClient::new(ScriptedBackend::default(), MemoryStore::new());
        client.start().await;

        assert!(!client.send("   ").await);
        assert!(!client.send("").await);

        assert!(client.messages().is_empty());
        assert_eq!(client.backend().calls().len(), 1);
    }

    #[tokio::test]
    async fn successful_send_appends_user_then_bot() {
        let backend = ScriptedBackend::default()
            .history(Reply::Body(r#"[{"role":"user","text":"hi"},{"role":"bot","text":"hey"}]"#))
            .answer(Reply::Body(r#"{"answer":"4","sources":[]}"#));
        let client = ChatClient::new(backend, MemoryStore::new());
        let session_id = client.start().await;

        assert!(client.send("2+2?").await);

        let messages = client.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2..], [Message::user("2+2?"), Message::bot("4")]);
        assert!(!client.is_loading());
        assert_eq!(
            client.backend().calls().last(),
            Some(&format!("POST /chat 2+2? {session_id}"))
        );
    }

    #[tokio::test]
    async fn failed_send_appends_fallback() {
        let backend = ScriptedBackend::default().answer(Reply::Refused);
        let client = ChatClient::new(backend, MemoryStore::new());
        client.start().await;

        client.send("anyone there?").await;

        assert_eq!(
            client.messages(),
            vec![Message::user("anyone there?"), Message::bot(FALLBACK_REPLY)]
        );
        assert!(!client.is_loading());
    }

    #[tokio::test]
    async fn non_json_answer_appends_fallback() {
        let backend = ScriptedBackend::default().answer(Reply::Body("Internal Server Error"));
        let client = ChatClient::new(backend, MemoryStore::new());
        client.start().await;

        client.send("hello").await;

        assert_eq!(client.messages().last(), Some(&Message::bot(FALLBACK_REPLY)));
    }

    #[tokio::test]
    async fn submit_sends_input_and_clears_it() {
        let backend = ScriptedBackend::default().answer(Reply::Body(r#"{"answer":"ok"}"#));
        let client = ChatClient::new(backend, MemoryStore::new());
        client.start().await;

        client.set_input("from the box");
        assert!(client.submit().await);

        assert_eq!(client.snapshot().input(), "");
        assert_eq!(
            client.messages(),
            vec![Message::user("from the box"), Message::bot("ok")]
        );
    }

    #[tokio::test]
    async fn send_is_single_flight() {
        let (backend, release) = ScriptedBackend::default()
            .answer(Reply::Body(r#"{"answer":"first reply"}"#))
            .gated();
        let client = ChatClient::new(backend, MemoryStore::new());
        client.start().await;

        let (first, second) = join!(client.send("first"), async {
            let second = client.send("second").await;
            assert!(client.is_loading());
            assert_eq!(client.messages(), vec![Message::user("first")]);
            release.send(()).unwrap();
            second
        });

        assert!(first);
        assert!(!second);
        assert_eq!(
            client.messages(),
            vec![Message::user("first"), Message::bot("first reply")]
        );
        let posts = client
            .backend()
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("POST"))
            .count();
        assert_eq!(posts, 1);
    }

    #[tokio::test]
    async fn send_waits_for_history() {
        let (backend, release) = ScriptedBackend::default()
            .history(Reply::Body(r#"[{"role":"user","text":"hi"},{"role":"bot","text":"hello"}]"#))
            .answer(Reply::Body(r#"{"answer":"hello"}"#))
            .gated_history();
        let client = ChatClient::new(backend, MemoryStore::new());

        let (session_id, sent) = join!(client.start(), async {
            let sent = client.send("hi").await;
            assert!(client.snapshot().is_history_pending());
            assert!(client.messages().is_empty());
            release.send(()).unwrap();
            sent
        });

        assert!(!sent);
        assert_eq!(client.messages(), vec![Message::user("hi"), Message::bot("hello")]);
        assert!(!client.is_loading());
        assert_eq!(client.backend().calls(), vec![format!("GET /history/{session_id}")]);

        assert!(client.send("again").await);
        assert_eq!(client.messages().len(), 4);
    }

    #[tokio::test]
    async fn reset_clears_and_rotates_session() {
        let backend = ScriptedBackend::default()
            .history(Reply::Body(r#"[{"role":"user","text":"old"}]"#));
        let storage = MemoryStore::new();
        let client = ChatClient::new(backend, storage.clone());
        let old = client.start().await;

        let new = client.reset_session().await;

        assert_ne!(old, new);
        assert!(client.messages().is_empty());
        assert_eq!(storage.get(SESSION_KEY).unwrap(), Some(new.to_string()));
        assert_eq!(
            client.backend().calls(),
            vec![
                format!("GET /history/{old}"),
                format!("DELETE /session/{old}"),
                format!("GET /history/{new}"),
            ]
        );
    }

    #[tokio::test]
    async fn reset_proceeds_when_delete_fails() {
        let backend = ScriptedBackend {
            delete_fails: true,
            ..Default::default()
        }
        .history(Reply::Body(r#"[{"role":"bot","text":"old"}]"#));
        let client = ChatClient::new(backend, MemoryStore::new());
        let old = client.start().await;

        let new = client.reset_session().await;

        assert_ne!(old, new);
        assert_eq!(client.session_id(), Some(new));
        assert!(client.messages().is_empty());
    }

    #[tokio::test]
    async fn late_reply_after_reset_is_discarded() {
        let (backend, release) = ScriptedBackend::default()
            .answer(Reply::Body(r#"{"answer":"for the old session"}"#))
            .gated();
        let client = ChatClient::new(backend, MemoryStore::new());
        client.start().await;

        let (sent, new) = join!(client.send("slow question"), async {
            let new = client.reset_session().await;
            assert!(client.messages().is_empty());
            release.send(()).unwrap();
            new
        });

        assert!(sent);
        assert_eq!(client.session_id(), Some(new));
        assert!(client.messages().is_empty());
        assert!(!client.is_loading());
    }
}
