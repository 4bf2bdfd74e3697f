use log::{debug, warn};

use crate::backend::ChatBackend;
use crate::errors::ClientError;
use crate::models::{ChatAnswer, Message, SessionId};
use crate::state::{SendTicket, FALLBACK_REPLY};

/// Performs the chat request of `ticket` and turns the outcome into the bot
/// message to append. Failures become [`FALLBACK_REPLY`]; nothing is retried.
pub async fn exchange<B: ChatBackend>(backend: &B, ticket: &SendTicket) -> Message {
    match request_answer(backend, ticket).await {
        Ok(answer) => Message::bot(answer.answer),
        Err(e) => {
            warn!("Chat request failed for session {}: {e}", ticket.session_id);
            Message::bot(FALLBACK_REPLY)
        }
    }
}

async fn request_answer<B: ChatBackend>(
    backend: &B,
    ticket: &SendTicket,
) -> Result<ChatAnswer, ClientError> {
    let body = backend.post_chat(&ticket.query, &ticket.session_id).await?;
    let answer: ChatAnswer = serde_json::from_str(&body)?;
    debug!(
        "Answer for session {} grounded on {} sources",
        ticket.session_id,
        answer.sources.len()
    );
    Ok(answer)
}

/// Asks the backend to forget `session_id`. Best-effort: failures are logged
/// and otherwise ignored.
pub async fn discard_session<B: ChatBackend>(backend: &B, session_id: &SessionId) {
    match backend.delete_session(session_id).await {
        Ok(()) => debug!("Backend dropped session {session_id}"),
        Err(e) => warn!("Ignoring failed delete of session {session_id}: {e}"),
    }
}
