use std::sync::atomic::{AtomicUsize, Ordering};

use super::types::{LlmClient, VisionClient};
use super::RemoteError;

/// Mock LLM client for testing: returns a configured response or fails.
pub struct MockLlmClient {
    response: Option<String>,
    model: String,
    calls: AtomicUsize,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
            model: "mock-llm".to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    /// A client whose every call fails as if the provider were unreachable.
    pub fn failing() -> Self {
        Self {
            response: None,
            model: "mock-llm".to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LlmClient for MockLlmClient {
    fn complete(&self, _prompt: &str) -> Result<String, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .clone()
            .ok_or_else(|| RemoteError::Connection("mock://unreachable".into()))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Mock vision client for testing.
pub struct MockVisionClient {
    response: Result<String, u16>,
    model: String,
    calls: AtomicUsize,
}

impl MockVisionClient {
    pub fn new(analysis: &str) -> Self {
        Self {
            response: Ok(analysis.to_string()),
            model: "mock-vision".to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    /// A client that answers every call with the given HTTP status.
    pub fn failing_with_status(status: u16) -> Self {
        Self {
            response: Err(status),
            model: "mock-vision".to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl VisionClient for MockVisionClient {
    fn describe(&self, _image_jpeg: &[u8], _prompt: &str) -> Result<String, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(RemoteError::Status {
                status: *status,
                body: "mock failure".into(),
            }),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}
