//! Remote model collaborators: text completion and image description.
//!
//! Both sit behind traits so the triage service can run with either, both or
//! neither, and so tests can script their answers.

pub mod chat_completions;
pub mod gemini;
pub mod mock;
pub mod prompt;
pub mod types;

pub use chat_completions::ChatCompletionsClient;
pub use gemini::GeminiVisionClient;
pub use mock::{MockLlmClient, MockVisionClient};
pub use prompt::{build_triage_prompt, DEFAULT_IMAGE_PROMPT};
pub use types::{LlmClient, VisionClient};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Provider is not reachable at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Provider returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("Missing credentials: {0} is not set")]
    MissingCredentials(&'static str),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Provider returned an empty response")]
    EmptyResponse,
}

impl RemoteError {
    /// Map a reqwest failure the same way for every provider.
    pub(crate) fn from_reqwest(err: reqwest::Error, base_url: &str, timeout_secs: u64) -> Self {
        if err.is_connect() {
            RemoteError::Connection(base_url.to_string())
        } else if err.is_timeout() {
            RemoteError::Timeout(timeout_secs)
        } else {
            RemoteError::HttpClient(err.to_string())
        }
    }
}

/// Maximum characters of an error body kept for logging.
const MAX_ERROR_BODY_CHARS: usize = 500;

pub(crate) fn truncate_body(body: String) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body,
    }
}
