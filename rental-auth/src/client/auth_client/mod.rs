mod models;

use crate::common::{ErrorBody, NewUser, Session, UserProfile};
pub use models::AuthClientError;
use models::*;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};

const LOGIN_PATH: &str = "/auth/login/";
const REFRESH_PATH: &str = "/auth/refresh/";
const CURRENT_USER_PATH: &str = "/auth/user/";
const REGISTER_PATH: &str = "/auth/register/";

/// Calls to the token endpoints.
///
/// None of these go through credential recovery: a rejected login or refresh is
/// reported as is.
#[derive(Clone)]
pub struct AuthClient {
    http_client: Client,
    base_url: String,
}

impl AuthClient {
    /// Share the API client's connection pool and timeout
    pub fn with_http_client(http_client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Exchange credentials for a fresh token pair. The returned session has no profile yet.
    pub async fn obtain_tokens(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<Session, AuthClientError> {
        let req = LoginRequest {
            username,
            password: password.expose_secret(),
        };

        let resp = self
            .http_client
            .post(self.url(LOGIN_PATH))
            .json(&req)
            .send()
            .await?;
        let tokens = check_status(resp)
            .await?
            .json::<TokenPairResponse>()
            .await?;

        Ok(Session::new(tokens.access, tokens.refresh, None))
    }

    pub async fn refresh_access_token(
        &self,
        refresh_token: &SecretString,
    ) -> Result<SecretString, AuthClientError> {
        let req = RefreshRequest {
            refresh: refresh_token.expose_secret(),
        };

        let resp = self
            .http_client
            .post(self.url(REFRESH_PATH))
            .json(&req)
            .send()
            .await?;
        let refreshed = check_status(resp)
            .await?
            .json::<RefreshResponse>()
            .await?;

        Ok(SecretString::from(refreshed.access))
    }

    /// Profile of the token's owner, fetched with the given token only
    pub async fn fetch_profile(
        &self,
        access_token: &SecretString,
    ) -> Result<UserProfile, AuthClientError> {
        let resp = self
            .http_client
            .get(self.url(CURRENT_USER_PATH))
            .bearer_auth(access_token.expose_secret())
            .send()
            .await?;

        Ok(check_status(resp).await?.json::<UserProfile>().await?)
    }

    pub async fn register(&self, user: &NewUser) -> Result<UserProfile, AuthClientError> {
        let resp = self
            .http_client
            .post(self.url(REGISTER_PATH))
            .json(user)
            .send()
            .await?;
        let registered = check_status(resp)
            .await?
            .json::<RegisterResponse>()
            .await?;

        if let Some(message) = registered.message {
            tracing::debug!("{}", message);
        }
        Ok(registered.user)
    }
}

async fn check_status(resp: Response) -> Result<Response, AuthClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await?;
    if status.is_server_error() {
        Err(AuthClientError::ServerError(status, text.trim().to_string()))
    } else {
        Err(AuthClientError::Rejected(status, ErrorBody::from_text(&text)))
    }
}
