use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Candidate, PathStep};

/// Failure talking to the path-finding service
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// The two endpoints the client consumes.
///
/// Implementations:
/// - `HttpBackend` (costar-cli): reqwest against a running server
/// - in-test fakes that count calls and script responses
#[async_trait]
pub trait PathBackend: Send + Sync {
    /// `POST /actor_prefix` with `name=<prefix>`
    async fn search_actors(&self, prefix: &str) -> Result<Vec<Candidate>, BackendError>;

    /// `POST /shortest_path` with `actor_1=<id>&actor_2=<id>`
    async fn shortest_path(&self, actor_1: &str, actor_2: &str)
    -> Result<Vec<PathStep>, BackendError>;

    fn name(&self) -> &'static str;
}
