use async_trait::async_trait;

/// Errors from the vision-service layer.
#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Vision API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// The response parsed but carried no candidate parts.
    #[error("Vision API returned no content")]
    EmptyResponse,

    /// No API key is configured.
    #[error("Vision API key is not configured")]
    MissingCredentials,
}

/// Image-to-text inference service.
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// Send `image` (encoded as `mime_type`) with `prompt` and return the
    /// model's raw text reply.
    async fn describe(
        &self,
        image: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, VisionError>;
}
