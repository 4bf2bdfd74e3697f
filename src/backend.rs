use chat_client_core::{ChatBackend, ChatForm, ClientConfig, ClientError, SessionId};
use reqwest::{Client, Response};
use tracing::debug;

/// [`ChatBackend`] over HTTP with reqwest.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder().build().map_err(ClientError::network)?;
        Ok(Self { client, config })
    }
}

impl ChatBackend for HttpBackend {
    async fn fetch_history(&self, session_id: &SessionId) -> Result<String, ClientError> {
        let url = self.config.history_url(session_id);
        debug!("GET {url}");
        let resp = self.client.get(&url).send().await.map_err(ClientError::network)?;
        read_body(resp).await
    }

    async fn post_chat(&self, query: &str, session_id: &SessionId) -> Result<String, ClientError> {
        let url = self.config.chat_url();
        debug!("POST {url}");
        let form = ChatForm { query, session_id: session_id.as_str() };
        let resp = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(ClientError::network)?;
        read_body(resp).await
    }

    async fn delete_session(&self, session_id: &SessionId) -> Result<(), ClientError> {
        let url = self.config.session_url(session_id);
        debug!("DELETE {url}");
        let resp = self.client.delete(&url).send().await.map_err(ClientError::network)?;
        if !resp.status().is_success() {
            return Err(ClientError::Server { status: resp.status().as_u16() });
        }
        Ok(())
    }
}

async fn read_body(resp: Response) -> Result<String, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(ClientError::Server { status: status.as_u16() });
    }
    resp.text().await.map_err(ClientError::network)
}
