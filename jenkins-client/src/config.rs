//! Client configuration
//!
//! Connection settings for one Jenkins controller: where it lives, how to
//! authenticate, and transport tuning.

use std::fmt;
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Jenkins connection configuration
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Host name or address, without scheme (e.g., "ci.example.com")
    pub host: String,

    pub port: u16,

    /// User the API token belongs to
    pub username: String,

    /// API token (or password) used for basic authentication
    pub token: String,

    /// Talk `https://` unless explicitly switched to plaintext
    pub use_https: bool,

    /// Per-request timeout applied by the bundled transport
    pub timeout: Option<Duration>,
}

impl Config {
    /// Creates a new configuration with defaults (HTTPS, no timeout)
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            token: token.into(),
            use_https: true,
            timeout: None,
        }
    }

    pub fn with_https(mut self, use_https: bool) -> Self {
        self.use_https = use_https;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn scheme(&self) -> &'static str {
        if self.use_https { "https" } else { "http" }
    }

    /// Scheme, host and port every request path is appended to
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme(), self.host, self.port)
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - JENKINS_HOST (required)
    /// - JENKINS_USERNAME (required)
    /// - JENKINS_TOKEN (required)
    /// - JENKINS_USE_HTTPS (optional, default: true)
    /// - JENKINS_PORT (optional, default: 443, or 80 without HTTPS)
    /// - JENKINS_TIMEOUT (optional, seconds)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| {
                ClientError::Configuration(format!("{key} environment variable not set"))
            })
        };

        let host = required("JENKINS_HOST")?;
        let username = required("JENKINS_USERNAME")?;
        let token = required("JENKINS_TOKEN")?;

        let use_https = match lookup("JENKINS_USE_HTTPS") {
            Some(value) => parse_bool(&value).ok_or_else(|| {
                ClientError::Configuration(format!("JENKINS_USE_HTTPS is not a boolean: {value}"))
            })?,
            None => true,
        };

        let port = match lookup("JENKINS_PORT") {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .ok()
                .and_then(|port| u16::try_from(port).ok())
                .ok_or_else(|| {
                    ClientError::Configuration(format!(
                        "JENKINS_PORT must be between 1 and 65535, got {value}"
                    ))
                })?,
            None if use_https => 443,
            None => 80,
        };

        let timeout = lookup("JENKINS_TIMEOUT")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let config = Self {
            host,
            port,
            username,
            token,
            use_https,
            timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ClientError::Configuration("host cannot be empty".into()));
        }

        if self.host.contains("://") {
            return Err(ClientError::Configuration(
                "host must not include a scheme; use with_https instead".into(),
            ));
        }

        if self.port == 0 {
            return Err(ClientError::Configuration(
                "port must be between 1 and 65535".into(),
            ));
        }

        if self.username.is_empty() {
            return Err(ClientError::Configuration("username cannot be empty".into()));
        }

        if self.token.is_empty() {
            return Err(ClientError::Configuration("token cannot be empty".into()));
        }

        if self.timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err(ClientError::Configuration(
                "timeout must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .field("use_https", &self.use_https)
            .field("timeout", &self.timeout)
            .finish()
    }
}
