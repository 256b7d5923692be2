use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_MODEL: &str = "claude-v1";
pub const DEFAULT_MAX_TOKENS: u32 = 300;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_LOCALE: &str = "en-US";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Runtime configuration, injected into the backend client and speech capability.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub request_timeout: Duration,
    pub model: String,
    pub max_tokens: u32,
    pub locale: String,
    pub stt_command: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            locale: DEFAULT_LOCALE.to_string(),
            stt_command: None,
        }
    }
}

impl Config {
    /// Loads configuration from the process environment, reading a `.env`
    /// file first if one exists.
    ///
    /// *   `GUIDED_OPS_BACKEND_URL`: endpoint root. Defaults to `http://localhost:5000`.
    /// *   `GUIDED_OPS_TIMEOUT_SECS`: per-request timeout. Defaults to 60.
    /// *   `GUIDED_OPS_MODEL`: model name sent with each request. Defaults to `claude-v1`.
    /// *   `GUIDED_OPS_MAX_TOKENS`: sampling limit. Defaults to 300.
    /// *   `GUIDED_OPS_LOCALE`: recognizer locale. Defaults to `en-US`.
    /// *   `GUIDED_OPS_STT_COMMAND`: (Optional) speech-to-text command line.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(url) = lookup("GUIDED_OPS_BACKEND_URL") {
            config.base_url = parse_base_url(&url)?;
        }
        if let Some(secs) = lookup("GUIDED_OPS_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(parse_positive("GUIDED_OPS_TIMEOUT_SECS", &secs)?);
        }
        if let Some(model) = lookup("GUIDED_OPS_MODEL") {
            config.model = model;
        }
        if let Some(tokens) = lookup("GUIDED_OPS_MAX_TOKENS") {
            let tokens = parse_positive("GUIDED_OPS_MAX_TOKENS", &tokens)?;
            config.max_tokens = u32::try_from(tokens).map_err(|e| {
                ConfigError::InvalidValue("GUIDED_OPS_MAX_TOKENS".to_string(), e.to_string())
            })?;
        }
        if let Some(locale) = lookup("GUIDED_OPS_LOCALE") {
            config.locale = locale;
        }
        config.stt_command = lookup("GUIDED_OPS_STT_COMMAND").filter(|cmd| !cmd.trim().is_empty());

        Ok(config)
    }

    pub fn with_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(url)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

fn parse_base_url(url: &str) -> Result<String, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue("GUIDED_OPS_BACKEND_URL".to_string(), reason);

    let url = url.trim().trim_end_matches('/');
    let parsed = reqwest::Url::parse(url).map_err(|e| invalid(format!("'{}': {}", url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("'{}' is not an http(s) URL", url)));
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(invalid(format!("'{}' has no host", url)));
    }
    Ok(url.to_string())
}

fn parse_positive(var: &str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidValue(var.to_string(), "must be greater than zero".to_string())),
        Ok(n) => Ok(n),
        Err(e) => Err(ConfigError::InvalidValue(var.to_string(), e.to_string())),
    }
}
