use log::{debug, warn};
use serde_json::Value;

use crate::backend::ChatBackend;
use crate::errors::ClientError;
use crate::models::{Message, SessionId};

/// Decoded body of `GET /history/{session_id}`.
///
/// The backend has answered with both a bare array and an object wrapping the
/// array under `messages`; both decode to [`HistoryPayload::Sequence`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryPayload {
    Sequence(Vec<Message>),
    Empty,
}

impl HistoryPayload {
    /// Decodes a history body.
    ///
    /// An object without `messages` (or with `messages: null`) is an empty
    /// history. Anything else that is not a list of messages is an error.
    pub fn decode(body: &str) -> Result<Self, ClientError> {
        let value: Value = serde_json::from_str(body)?;
        match value {
            Value::Array(_) => Self::from_list(value),
            Value::Object(mut fields) => match fields.remove("messages") {
                None | Some(Value::Null) => Ok(HistoryPayload::Empty),
                Some(list @ Value::Array(_)) => Self::from_list(list),
                Some(other) => Err(ClientError::Decode(format!(
                    "`messages` is not a list: {other}"
                ))),
            },
            other => Err(ClientError::Decode(format!(
                "unexpected history shape: {other}"
            ))),
        }
    }

    pub fn into_messages(self) -> Vec<Message> {
        match self {
            HistoryPayload::Sequence(messages) => messages,
            HistoryPayload::Empty => Vec::new(),
        }
    }

    fn from_list(list: Value) -> Result<Self, ClientError> {
        let messages: Vec<Message> = serde_json::from_value(list)?;
        Ok(HistoryPayload::Sequence(messages))
    }
}

/// Fetches the stored conversation of `session_id`.
///
/// Never fails: transport and shape errors are logged and yield an empty
/// history.
pub async fn load_history<B: ChatBackend>(backend: &B, session_id: &SessionId) -> Vec<Message> {
    let payload = match backend.fetch_history(session_id).await {
        Ok(body) => HistoryPayload::decode(&body),
        Err(e) => Err(e),
    };

    match payload {
        Ok(payload) => {
            let messages = payload.into_messages();
            debug!("Loaded {} history messages for session {session_id}", messages.len());
            messages
        }
        Err(e) => {
            warn!("Failed to load history for session {session_id}: {e}");
            Vec::new()
        }
    }
}
