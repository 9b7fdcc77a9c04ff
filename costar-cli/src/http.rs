use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use costar_core::backend::{BackendError, PathBackend};
use costar_core::config::ClientConfig;
use costar_core::model::{Candidate, PathStep};

/// `PathBackend` over HTTP form posts
pub struct HttpBackend {
    client: reqwest::Client,
    search_url: String,
    path_url: String,
    search_timeout: Duration,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("costar/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            search_url: config.endpoint("actor_prefix"),
            path_url: config.endpoint("shortest_path"),
            search_timeout: config.request_timeout(),
        })
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        url: &str,
        form: &[(&str, &str)],
        timeout: Option<Duration>,
    ) -> Result<T, BackendError> {
        let mut request = self.client.post(url).form(form);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        decode_body(&body)
    }
}

pub fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, BackendError> {
    serde_json::from_str(body).map_err(|e| BackendError::Decode(e.to_string()))
}

#[async_trait]
impl PathBackend for HttpBackend {
    async fn search_actors(&self, prefix: &str) -> Result<Vec<Candidate>, BackendError> {
        self.post_form(&self.search_url, &[("name", prefix)], Some(self.search_timeout))
            .await
    }

    async fn shortest_path(
        &self,
        actor_1: &str,
        actor_2: &str,
    ) -> Result<Vec<PathStep>, BackendError> {
        // The submit budget is enforced by the caller
        self.post_form(&self.path_url, &[("actor_1", actor_1), ("actor_2", actor_2)], None)
            .await
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
