//! Server configuration loaded from environment variables.

use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_JUDGE_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_JUDGE_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_JSON_PAYLOAD_SIZE: usize = 1024 * 1024;

#[derive(Clone)]
pub struct GraderConfig {
    pub host: String,
    pub port: u16,
    /// Bearer key for the judge model. Requests still go out without one and
    /// fail upstream.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub judge_model: String,
    pub judge_timeout: Duration,
    pub max_json_payload_size: usize,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl std::fmt::Debug for GraderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraderConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<redacted>"))
            .field("openai_base_url", &self.openai_base_url)
            .field("judge_model", &self.judge_model)
            .field("judge_timeout", &self.judge_timeout)
            .field("max_json_payload_size", &self.max_json_payload_size)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}

impl GraderConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = get("GRADER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AppError::config(format!("PORT must be a valid port number, got '{raw}'"))
            })?,
            None => DEFAULT_PORT,
        };

        let openai_base_url = get("OPENAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !(openai_base_url.starts_with("http://") || openai_base_url.starts_with("https://")) {
            return Err(AppError::config(format!(
                "OPENAI_BASE_URL must be an http(s) URL, got '{openai_base_url}'"
            )));
        }

        let judge_timeout_secs = match get("JUDGE_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::config(format!("JUDGE_TIMEOUT_SECS must be whole seconds, got '{raw}'"))
            })?,
            None => DEFAULT_JUDGE_TIMEOUT_SECS,
        };

        let max_json_payload_size = get("MAX_JSON_PAYLOAD_SIZE")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_JSON_PAYLOAD_SIZE);

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url,
            judge_model: get("JUDGE_MODEL").unwrap_or_else(|| DEFAULT_JUDGE_MODEL.to_string()),
            judge_timeout: Duration::from_secs(judge_timeout_secs.max(1)),
            max_json_payload_size,
            cors_allowed_origins,
        })
    }
}
