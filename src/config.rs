use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as boolean: {value}")]
    ParseBool { name: String, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    // Content store (headless CMS delivery API)
    pub content_api_url: String,
    pub content_api_key: Option<String>,

    // Video provider
    pub youtube_api_url: String,
    pub google_api_key: String,
    pub cache_duration: Duration,
    /// How long the configured channel list is reused before the CMS is asked again.
    pub channel_cache_duration: Duration,

    // Outbound HTTP
    pub http_timeout: Duration,

    // Web Server
    pub web_host: String,
    pub web_port: u16,
    pub cors_allow_any: bool,
}

// Keys stay out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("content_api_url", &self.content_api_url)
            .field("content_api_key", &self.content_api_key.as_ref().map(|_| "<redacted>"))
            .field("youtube_api_url", &self.youtube_api_url)
            .field("google_api_key", &"<redacted>")
            .field("cache_duration", &self.cache_duration)
            .field("channel_cache_duration", &self.channel_cache_duration)
            .field("http_timeout", &self.http_timeout)
            .field("web_host", &self.web_host)
            .field("web_port", &self.web_port)
            .field("cors_allow_any", &self.cors_allow_any)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Content store
            content_api_url: trim_trailing_slash(required_env("CONTENT_API_URL")?),
            content_api_key: optional_env("CONTENT_API_KEY"),

            // Video provider
            youtube_api_url: trim_trailing_slash(env_or_default(
                "YOUTUBE_API_URL",
                "https://www.googleapis.com/youtube/v3",
            )),
            google_api_key: required_env("GOOGLE_API_KEY")?,
            cache_duration: parse_env_minutes("YOUTUBE_CACHE_DURATION_MINUTES", 30)?,
            channel_cache_duration: Duration::from_secs(parse_env_u64(
                "CHANNEL_CACHE_DURATION_SECS",
                60,
            )?),

            // Outbound HTTP
            http_timeout: Duration::from_secs(parse_env_u64("HTTP_TIMEOUT_SECS", 10)?),

            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 8080)?,
            cors_allow_any: parse_env_bool("CORS_ALLOW_ANY", false)?,
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("CONTENT_API_URL", &self.content_api_url),
            ("YOUTUBE_API_URL", &self.youtube_api_url),
        ] {
            if let Err(e) = url::Url::parse(value) {
                return Err(ConfigError::InvalidValue {
                    name: name.to_string(),
                    message: format!("not a valid URL: {e}"),
                });
            }
        }
        if self.google_api_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "GOOGLE_API_KEY".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.cache_duration.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "YOUTUBE_CACHE_DURATION_MINUTES".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.http_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "HTTP_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Configuration pointing at local placeholder endpoints, for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            content_api_url: "http://127.0.0.1:9/umbraco/delivery/api/v2".to_string(),
            content_api_key: None,
            youtube_api_url: "http://127.0.0.1:9/youtube/v3".to_string(),
            google_api_key: "test-key".to_string(),
            cache_duration: Duration::from_secs(30 * 60),
            channel_cache_duration: Duration::from_secs(60),
            http_timeout: Duration::from_secs(5),
            web_host: "127.0.0.1".to_string(),
            web_port: 0,
            cors_allow_any: false,
        }
    }
}

fn trim_trailing_slash(value: String) -> String {
    match value.strip_suffix('/') {
        Some(trimmed) => trimmed.to_string(),
        None => value,
    }
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_minutes(name: &str, default: u64) -> Result<Duration, ConfigError> {
    let minutes = parse_env_u64(name, default)?;
    minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("{minutes} minutes is too large"),
        })
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::ParseBool {
                name: name.to_string(),
                value: val,
            }),
        },
        _ => Ok(default),
    }
}
