use std::path::PathBuf;

use chat_client_core::{ClientConfig, DEFAULT_API_BASE};

pub const DEFAULT_STATE_FILE: &str = ".chat_session.json";
pub const DEFAULT_LOG_FILTER: &str = "chat_client=info,chat_client_core=info";

/// Settings of the terminal client, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub state_file: PathBuf,
}

impl AppConfig {
    /// Reads `CHAT_API_BASE_URL` and `CHAT_STATE_FILE`, falling back to
    /// defaults for unset or blank values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_base = read("CHAT_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let state_file = read("CHAT_STATE_FILE").unwrap_or_else(|| DEFAULT_STATE_FILE.to_string());

        Self {
            client: ClientConfig::new(api_base),
            state_file: PathBuf::from(state_file),
        }
    }
}
