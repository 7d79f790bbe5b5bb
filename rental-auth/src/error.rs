use thiserror::Error;

/// Failures of the session layer: loading settings and touching the
/// credential file. Token endpoint failures are `AuthClientError`.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Session storage error: {0}")]
    TokenStorage(String),

    #[error("Session file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for AuthError {
    fn from(err: config::ConfigError) -> Self {
        AuthError::Configuration(err.to_string())
    }
}
