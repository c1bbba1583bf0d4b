//! Upstream completion layer: the chat-completion client and the
//! JSON-from-free-text extractor. Everything that crosses the model
//! boundary comes back through this module.

pub mod client;
pub mod extract;

pub use client::{ChatCompletionClient, CompletionClient, CompletionParams};
pub use extract::extract_json;

/// Errors from the upstream completion endpoint.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("Invalid completion request: {0}")]
    InvalidRequest(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("Failed to parse upstream response: {0}")]
    ResponseParsing(String),
    #[error("Upstream returned no completion content")]
    EmptyCompletion,
}

impl LlmError {
    /// Transient errors are worth retrying: network failures, timeouts,
    /// 5xx responses, and rate limiting. Other 4xx responses fail fast.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::Transport(_) | LlmError::Timeout(_) => true,
            LlmError::Upstream { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
