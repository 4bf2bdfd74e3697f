use chat_client_core::{ChatBackend, ClientConfig, ClientError, SessionId};
use gloo_net::http::{Request, Response};
use web_sys::UrlSearchParams;

/// [`ChatBackend`] over the browser's fetch API.
#[derive(Clone, Debug)]
pub struct GlooBackend {
    config: ClientConfig,
}

impl GlooBackend {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }
}

impl ChatBackend for GlooBackend {
    async fn fetch_history(&self, session_id: &SessionId) -> Result<String, ClientError> {
        let resp = Request::get(&self.config.history_url(session_id))
            .send()
            .await
            .map_err(ClientError::network)?;
        read_body(resp).await
    }

    async fn post_chat(&self, query: &str, session_id: &SessionId) -> Result<String, ClientError> {
        let form = UrlSearchParams::new().map_err(|e| ClientError::Network(format!("{e:?}")))?;
        form.append("query", query);
        form.append("session_id", session_id.as_str());

        let resp = Request::post(&self.config.chat_url())
            .body(form)
            .map_err(ClientError::network)?
            .send()
            .await
            .map_err(ClientError::network)?;
        read_body(resp).await
    }

    async fn delete_session(&self, session_id: &SessionId) -> Result<(), ClientError> {
        let resp = Request::delete(&self.config.session_url(session_id))
            .send()
            .await
            .map_err(ClientError::network)?;
        if !resp.ok() {
            return Err(ClientError::Server { status: resp.status() });
        }
        Ok(())
    }
}

async fn read_body(resp: Response) -> Result<String, ClientError> {
    if !resp.ok() {
        return Err(ClientError::Server { status: resp.status() });
    }
    resp.text().await.map_err(ClientError::network)
}
