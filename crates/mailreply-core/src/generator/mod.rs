pub mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::state::ReplyRequest;

pub use http::HttpReplyClient;

/// Any failure of a generation call: transport error, timeout, non-success
/// status, or an unreadable body. The reason is for logs only.
#[derive(Debug, Clone, Error)]
#[error("generation request failed: {reason}")]
pub struct GenerationRequestFailed {
    pub reason: String,
}

impl GenerationRequestFailed {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for GenerationRequestFailed {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Produces reply text for an email. Implementations normalize whatever the
/// backend returns into plain text before handing it back.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    async fn generate(&self, request: &ReplyRequest) -> Result<String, GenerationRequestFailed>;
}
