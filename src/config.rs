use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "MeHelper";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default bind address (same port the web frontend has always used).
pub const DEFAULT_BIND: &str = "0.0.0.0:5000";

/// OpenAI-compatible router used for text completion.
pub const DEFAULT_LLM_BASE_URL: &str = "https://router.huggingface.co/v1";
pub const DEFAULT_LLM_MODEL: &str = "openai/gpt-oss-20b:fireworks-ai";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// Generation parameters for the triage completion. Low temperature keeps the
/// JSON layout stable.
pub const LLM_MAX_TOKENS: u32 = 1000;
pub const LLM_TEMPERATURE: f32 = 0.1;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_VISION_TIMEOUT_SECS: u64 = 60;

/// Maximum accepted upload body (multipart image).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "mehelper=info,tower_http=warn"
}

/// Environment variable naming an explicit `.env` file.
pub const ENV_FILE_VAR: &str = "MEHELPER_ENV_FILE";

/// Merge a `.env` file into the process environment and return its path.
///
/// `MEHELPER_ENV_FILE` selects the file; otherwise `.env` is searched from
/// the working directory upwards. Variables already set are not overridden.
/// Runs before tracing is set up so `RUST_LOG` may come from the file.
pub fn load_dotenv() -> Result<PathBuf, dotenv::Error> {
    match std::env::var_os(ENV_FILE_VAR) {
        Some(path) => {
            let path = PathBuf::from(path);
            dotenv::from_path(&path)?;
            Ok(path)
        }
        None => dotenv::dotenv(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid bind address '{value}': {reason}")]
    InvalidBind { value: String, reason: String },
    #[error("Invalid value for {var}: '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

/// Text-completion provider settings. Present only when a token is configured.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

/// Image-analysis provider settings. Present only when an API key is configured.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

/// Runtime configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub static_dir: PathBuf,
    pub llm: Option<LlmConfig>,
    pub vision: Option<VisionConfig>,
}

impl AppConfig {
    /// Read configuration from the process environment. Call `load_dotenv`
    /// first so `.env` values are visible.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup("MEHELPER_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidBind {
                value: bind_raw.clone(),
                reason: e.to_string(),
            })?;

        let static_dir = lookup("MEHELPER_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let use_providers = lookup("USE_INFERENCE_PROVIDERS")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        let llm = match non_empty(lookup("HF_TOKEN")) {
            Some(api_key) if use_providers => Some(LlmConfig {
                base_url: lookup("LLM_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
                api_key,
                model: lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
                timeout: Duration::from_secs(parse_secs(
                    "LLM_TIMEOUT_SECS",
                    lookup("LLM_TIMEOUT_SECS"),
                    DEFAULT_LLM_TIMEOUT_SECS,
                )?),
            }),
            _ => None,
        };

        let vision = non_empty(lookup("GEMINI_API_KEY")).map(|api_key| VisionConfig {
            base_url: lookup("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            api_key,
            model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            timeout: Duration::from_secs(DEFAULT_VISION_TIMEOUT_SECS),
        });

        Ok(Self {
            bind,
            static_dir,
            llm,
            vision,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_secs(var: &'static str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidNumber { var, value: v }),
    }
}
