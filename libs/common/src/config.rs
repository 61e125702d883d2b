//! Configuration module for the glowbook client
//!
//! Settings are layered with the `config` crate: built-in defaults first,
//! then `GLOWBOOK_*` environment variables.

use crate::error::{ConfigError, ConfigResult};
use config::{Config, Environment};
use serde::Deserialize;
use std::path::PathBuf;

/// Default backend base URL
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Default location of the persisted session slots
pub const DEFAULT_SESSION_FILE: &str = ".glowbook/session.json";

/// Default login entry point used for 401 redirects
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";

/// Client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    /// Base URL every endpoint path is appended to
    pub api_base_url: String,
    /// File holding the durable session slots
    pub session_file: PathBuf,
    /// Route the user is sent to when the backend answers 401
    pub login_route: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
        }
    }
}

impl PortalConfig {
    /// Create a new PortalConfig from environment variables
    ///
    /// # Environment Variables
    /// - `GLOWBOOK_API_BASE_URL`: backend base URL (default: "http://localhost:8080/api")
    /// - `GLOWBOOK_SESSION_FILE`: session file path (default: ".glowbook/session.json")
    /// - `GLOWBOOK_LOGIN_ROUTE`: login route (default: "/login")
    pub fn from_env() -> ConfigResult<Self> {
        let settings = Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("session_file", DEFAULT_SESSION_FILE)?
            .set_default("login_route", DEFAULT_LOGIN_ROUTE)?
            .add_source(Environment::with_prefix("GLOWBOOK"))
            .build()?;

        let config: PortalConfig = settings.try_deserialize()?;
        config.normalized()
    }

    /// Create a config pointing at a specific backend, keeping the other defaults
    pub fn with_base_url(base_url: impl Into<String>) -> ConfigResult<Self> {
        Self {
            api_base_url: base_url.into(),
            ..Self::default()
        }
        .normalized()
    }

    fn normalized(mut self) -> ConfigResult<Self> {
        let trimmed = self.api_base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::Invalid {
                key: "api_base_url",
                reason: "must not be empty".to_string(),
            });
        }
        self.api_base_url = trimmed.to_string();

        if !self.login_route.starts_with('/') {
            return Err(ConfigError::Invalid {
                key: "login_route",
                reason: format!("'{}' is not an absolute route", self.login_route),
            });
        }

        Ok(self)
    }

    /// Join an endpoint path onto the base URL
    pub fn endpoint_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_base_url, path)
        } else {
            format!("{}/{}", self.api_base_url, path)
        }
    }
}
