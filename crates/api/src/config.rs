use wastetrace_core::registry::{DedupScope, FingerprintPolicy};
use wastetrace_pipeline::lifecycle::DEFAULT_MAX_RETRIES;
use wastetrace_vision::VisionConfig;

/// Which [`wastetrace_db::DocumentStore`] backend to run against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process maps; contents are lost on restart.
    Memory,
    /// PostgreSQL `documents` table.
    Postgres { database_url: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins; `*` allows any origin (without credentials).
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// Maximum request body size for image uploads (default: 10 MiB).
    pub max_upload_bytes: usize,
    pub store_backend: StoreBackend,
    pub dedup_scope: DedupScope,
    pub fingerprint_policy: FingerprintPolicy,
    /// Compare-and-swap retries for ticket status updates (default: `3`).
    pub ticket_update_max_retries: u32,
    pub vision: VisionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            request_timeout_secs: 60,
            max_upload_bytes: 10 * 1024 * 1024,
            store_backend: StoreBackend::Memory,
            dedup_scope: DedupScope::Process,
            fingerprint_policy: FingerprintPolicy::KeepOnFailure,
            ticket_update_max_retries: DEFAULT_MAX_RETRIES,
            vision: VisionConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default   |
    /// |-----------------------------|-----------|
    /// | `HOST`                      | `0.0.0.0` |
    /// | `PORT`                      | `8000`    |
    /// | `CORS_ORIGINS`              | `*`       |
    /// | `REQUEST_TIMEOUT_SECS`      | `60`      |
    /// | `MAX_UPLOAD_BYTES`          | `10485760`|
    /// | `STORE_BACKEND`             | `memory`  |
    /// | `DATABASE_URL`              | -- (required for `postgres`) |
    /// | `DEDUP_SCOPE`               | `process` |
    /// | `DEDUP_RELEASE_ON_FAILURE`  | `false`   |
    /// | `TICKET_UPDATE_MAX_RETRIES` | `3`       |
    ///
    /// Vision settings are read by [`VisionConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on unparsable values, an unknown backend or dedup scope, or
    /// `STORE_BACKEND=postgres` without `DATABASE_URL`.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = std::env::var("HOST").unwrap_or(defaults.host);

        let port: u16 = env_parse("PORT", defaults.port);

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = env_parse("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs);
        let max_upload_bytes = env_parse("MAX_UPLOAD_BYTES", defaults.max_upload_bytes);

        let store_backend = match std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "memory".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            "postgres" => StoreBackend::Postgres {
                database_url: std::env::var("DATABASE_URL")
                    .expect("DATABASE_URL must be set when STORE_BACKEND=postgres"),
            },
            other => panic!("Unknown STORE_BACKEND '{other}'. Must be one of: memory, postgres"),
        };

        let dedup_scope = std::env::var("DEDUP_SCOPE")
            .map(|s| DedupScope::from_name(&s).unwrap_or_else(|e| panic!("{e}")))
            .unwrap_or(defaults.dedup_scope);

        let fingerprint_policy = if env_parse("DEDUP_RELEASE_ON_FAILURE", false) {
            FingerprintPolicy::ReleaseOnFailure
        } else {
            FingerprintPolicy::KeepOnFailure
        };

        let ticket_update_max_retries =
            env_parse("TICKET_UPDATE_MAX_RETRIES", defaults.ticket_update_max_retries);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            store_backend,
            dedup_scope,
            fingerprint_policy,
            ticket_update_max_retries,
            vision: VisionConfig::from_env(),
        }
    }

    /// Whether CORS should allow any origin.
    pub fn cors_allows_any(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

/// Parse `key` from the environment, falling back to `default` when unset.
fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid value: {e}")),
        Err(_) => default,
    }
}
