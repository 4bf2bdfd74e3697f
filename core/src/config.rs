use crate::models::SessionId;
use crate::view::Theme;

/// Base URL of the chat backend when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Where the backend lives and how the client is skinned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_base: String,
    pub theme: Theme,
}

impl ClientConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self { api_base, theme: Theme::default() }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// `GET` endpoint returning the stored messages of a session.
    pub fn history_url(&self, session_id: &SessionId) -> String {
        format!("{}/history/{session_id}", self.api_base)
    }

    /// `POST` endpoint taking `query` and `session_id` as form fields.
    pub fn chat_url(&self) -> String {
        format!("{}/chat", self.api_base)
    }

    /// `DELETE` endpoint dropping a session on the backend.
    pub fn session_url(&self, session_id: &SessionId) -> String {
        format!("{}/session/{session_id}", self.api_base)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_endpoints_from_base() {
        let config = ClientConfig::default();
        let id = SessionId::new("abc-123");
        assert_eq!(config.history_url(&id), "http://localhost:8000/history/abc-123");
        assert_eq!(config.chat_url(), "http://localhost:8000/chat");
        assert_eq!(config.session_url(&id), "http://localhost:8000/session/abc-123");
    }

    #[test]
    fn trims_trailing_slashes() {
        let config = ClientConfig::new("http://news.local:9000//");
        assert_eq!(config.api_base(), "http://news.local:9000");
        assert_eq!(config.chat_url(), "http://news.local:9000/chat");
    }
}
