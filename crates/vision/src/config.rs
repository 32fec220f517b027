/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Default Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default HTTP timeout for one inference call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the vision-service client.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    /// API key. When absent, every call fails with `MissingCredentials`.
    pub api_key: Option<String>,
    pub model: String,
    /// Base URL without trailing slash.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl VisionConfig {
    /// Load vision configuration from environment variables.
    ///
    /// | Env Var               | Required | Default                                     |
    /// |-----------------------|----------|---------------------------------------------|
    /// | `GOOGLE_API_KEY`      | no       | --                                          |
    /// | `VISION_MODEL`        | no       | `gemini-2.5-flash`                          |
    /// | `VISION_BASE_URL`     | no       | `https://generativelanguage.googleapis.com` |
    /// | `VISION_TIMEOUT_SECS` | no       | `30`                                        |
    ///
    /// # Panics
    ///
    /// Panics if `VISION_TIMEOUT_SECS` is not a valid `u64`.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GOOGLE_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let model = std::env::var("VISION_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let base_url = std::env::var("VISION_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs: u64 = std::env::var("VISION_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("VISION_TIMEOUT_SECS must be a valid u64");

        if api_key.is_none() {
            tracing::warn!("GOOGLE_API_KEY is not set; image classification will be unavailable");
        }

        Self {
            api_key,
            model,
            base_url,
            timeout_secs,
        }
    }
}
