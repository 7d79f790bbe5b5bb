use rental_auth::{AuthClientError, AuthError, ErrorBody};
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RentalApiError {
    /// The server could not be reached or the connection broke mid-call
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The session is gone: the refresh token was rejected or never existed.
    /// The credential store has been cleared; the user must log in again.
    #[error("Not authenticated: please log in again")]
    NotAuthenticated,

    /// The request was rejected with 401 even after a successful refresh
    #[error("Unauthorized: {0}")]
    Unauthorized(ErrorBody),

    #[error("Invalid username or password: {0}")]
    InvalidCredentials(ErrorBody),

    #[error("({0}) {1}")]
    Client(StatusCode, ErrorBody),

    #[error("({0}) Server error: {1}")]
    Server(StatusCode, String),

    #[error("Could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Credential storage error: {0}")]
    Storage(#[from] AuthError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl RentalApiError {
    /// True when the only way forward is a new login
    pub fn is_terminal(&self) -> bool {
        matches!(self, RentalApiError::NotAuthenticated)
    }

    /// Structured body of a rejected request, if the server sent one
    pub fn error_body(&self) -> Option<&ErrorBody> {
        match self {
            RentalApiError::Unauthorized(body)
            | RentalApiError::InvalidCredentials(body)
            | RentalApiError::Client(_, body) => Some(body),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RentalApiError::Transport(e) => e.status(),
            RentalApiError::Unauthorized(_) | RentalApiError::InvalidCredentials(_) => {
                Some(StatusCode::UNAUTHORIZED)
            }
            RentalApiError::Client(status, _) | RentalApiError::Server(status, _) => Some(*status),
            _ => None,
        }
    }
}

impl From<AuthClientError> for RentalApiError {
    fn from(err: AuthClientError) -> Self {
        match err {
            AuthClientError::Http(e) => RentalApiError::Transport(e),
            AuthClientError::Rejected(StatusCode::UNAUTHORIZED, body) => {
                RentalApiError::Unauthorized(body)
            }
            AuthClientError::Rejected(status, body) => RentalApiError::Client(status, body),
            AuthClientError::ServerError(status, text) => RentalApiError::Server(status, text),
        }
    }
}
