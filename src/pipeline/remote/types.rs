use super::RemoteError;

/// Text-completion collaborator. One call per request, no retries.
pub trait LlmClient: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, RemoteError>;

    /// Model identifier, reported by the health endpoint.
    fn model(&self) -> &str;
}

/// Image-description collaborator. Receives a preprocessed JPEG and returns
/// free-text findings.
pub trait VisionClient: Send + Sync {
    fn describe(&self, image_jpeg: &[u8], prompt: &str) -> Result<String, RemoteError>;

    fn model(&self) -> &str;
}
