use crate::error::AuthError;
use config::{Config, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Overrides the credential file location
    #[serde(default)]
    pub session_path: Option<PathBuf>,
}

fn default_api_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout(),
            session_path: None,
        }
    }
}

impl Settings {
    /// Load `config.toml` (or the file named by `RENTAL_CONFIG`) overlaid by
    /// `RENTAL__*` environment variables
    pub fn new() -> Result<Self, AuthError> {
        let config_path =
            std::env::var("RENTAL_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let settings = Config::builder()
            .add_source(File::with_name(&config_path).required(false))
            .add_source(config::Environment::with_prefix("RENTAL").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api_url.is_empty() {
            return Err("api_url is required".to_string());
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err("api_url must be a valid HTTP(S) URL".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
