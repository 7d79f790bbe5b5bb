use crate::common::{ErrorBody, UserProfile};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

// POST /auth/login/
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

// POST /auth/refresh/
#[derive(Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

#[derive(Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

// POST /auth/register/
#[derive(Debug, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: UserProfile,
}

#[derive(Debug)]
pub enum AuthClientError {
    Http(reqwest::Error),
    Rejected(StatusCode, ErrorBody),
    ServerError(StatusCode, String),
}

impl std::fmt::Display for AuthClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(e) => write!(f, "HTTP error: {}", e),
            Self::Rejected(status, body) => write!(f, "Rejected ({}): {}", status, body),
            Self::ServerError(status, msg) => write!(f, "Server error ({}): {}", status, msg),
        }
    }
}

impl std::error::Error for AuthClientError {}

impl From<reqwest::Error> for AuthClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}
