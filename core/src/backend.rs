use crate::errors::ClientError;
use crate::models::SessionId;

/// The three HTTP calls the client makes. Implementations return the raw
/// response body; decoding and error recovery happen in the core so every host
/// behaves the same way.
///
/// Futures are not required to be `Send`: both hosts drive them from a single
/// execution context.
#[allow(async_fn_in_trait)]
pub trait ChatBackend {
    /// `GET /history/{session_id}`
    async fn fetch_history(&self, session_id: &SessionId) -> Result<String, ClientError>;

    /// `POST /chat` with form fields `query` and `session_id`.
    async fn post_chat(&self, query: &str, session_id: &SessionId) -> Result<String, ClientError>;

    /// `DELETE /session/{session_id}`. The response body is ignored.
    async fn delete_session(&self, session_id: &SessionId) -> Result<(), ClientError>;
}
