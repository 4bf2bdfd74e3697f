use thiserror::Error;

/// Failure of the key-value medium that persists the session id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage I/O failed: {0}")]
    Io(String),

    #[error("Stored state is corrupt: {0}")]
    Corrupt(String),
}

/// Errors produced while talking to the chat backend.
///
/// None of these reach the user: history failures degrade to an empty
/// conversation, chat failures to a fixed fallback reply, and delete failures
/// are ignored.
#[derive(Debug, Error)]
pub enum ClientError {
    // ── Transport ────────────────────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: {status}")]
    Server { status: u16 },

    // ── Payload ──────────────────────────────────────────────────────────────
    #[error("Decode error: {0}")]
    Decode(String),

    // ── Local ────────────────────────────────────────────────────────────────
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ClientError {
    pub fn network(err: impl std::fmt::Display) -> Self {
        ClientError::Network(err.to_string())
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, ClientError::Decode(_))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}
