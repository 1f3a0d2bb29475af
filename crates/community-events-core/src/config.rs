//! Service configuration.
//!
//! A [`ServiceConfig`] is either built in code with the `with_*` methods or
//! read from a TOML file containing a `[service]` table:
//!
//! ```toml
//! [service]
//! base_url = "https://apps.na.collabserv.com/communities/"
//! auth_type = "basic"
//! username = "jane@example.com"
//! password = "secret"
//! timeout_secs = 20
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while building a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The base URL did not parse.
    #[error("invalid base url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML or misses required keys.
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Connection settings for the community calendar service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Base URL every request URI is resolved against. Always ends with `/`.
    pub base_url: Url,

    /// Default value for the `{authType}` URI segment, e.g. `basic` or
    /// `oauth`. `None` drops the segment.
    pub auth_type: Option<String>,

    /// Username for HTTP basic authentication.
    pub username: Option<String>,

    /// Password for HTTP basic authentication.
    pub password: Option<String>,

    /// Whether to verify TLS certificates.
    pub verify_tls: bool,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl ServiceConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a configuration for the given base URL.
    ///
    /// A trailing slash is appended when missing so that relative request
    /// URIs join below the base path instead of replacing its last segment.
    pub fn new(base_url: impl AsRef<str>) -> ConfigResult<Self> {
        let raw = base_url.as_ref();
        let base_url = if raw.ends_with('/') {
            Url::parse(raw)?
        } else {
            Url::parse(&format!("{raw}/"))?
        };

        Ok(Self {
            base_url,
            auth_type: None,
            username: None,
            password: None,
            verify_tls: true,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("community-events/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Sets the default auth type.
    pub fn with_auth_type(mut self, auth_type: impl Into<String>) -> Self {
        self.auth_type = Some(auth_type.into());
        self
    }

    /// Sets the credentials for basic authentication.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Disables TLS verification (for testing only).
    pub fn with_insecure_tls(mut self) -> Self {
        self.verify_tls = false;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns true if credentials are configured.
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        file.service.into_config()
    }

    /// Loads a configuration from a TOML file.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    service: ServiceSettings,
}

/// The `[service]` table as written in the file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServiceSettings {
    base_url: String,
    auth_type: Option<String>,
    username: Option<String>,
    password: Option<String>,
    #[serde(default = "default_verify_tls")]
    verify_tls: bool,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

fn default_verify_tls() -> bool {
    true
}

impl ServiceSettings {
    fn into_config(self) -> ConfigResult<ServiceConfig> {
        let mut config = ServiceConfig::new(&self.base_url)?;
        config.auth_type = self.auth_type.filter(|a| !a.is_empty());
        config.username = self.username;
        config.password = self.password;
        config.verify_tls = self.verify_tls;
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }
        Ok(config)
    }
}
