use crate::error::RentalApiError;
use crate::recovery::RecoveryState;
use crate::request::{Attempt, PendingRequest, Request as ApiRequest, decode};
use crate::session::SessionStatus;
use rental_auth::{AuthClient, CredentialStore, ErrorBody, FileCredentialStore, Settings};
use reqwest::{Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, warn};

/// HTTP client for the rental backend.
///
/// Every call reads the current access token from the credential store and
/// sends it as a bearer token. A 401 answer is handed to the recovery agent,
/// which refreshes the access token once and re-issues the call. The client is
/// meant to be shared (`Arc<Client>`) across tasks.
pub struct Client {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) auth: AuthClient,
    pub(crate) store: Arc<dyn CredentialStore>,
    pub(crate) refresh_lock: tokio::sync::Mutex<()>,
    pub(crate) recovery: Mutex<RecoveryState>,
    pub(crate) status: watch::Sender<SessionStatus>,
}

impl Client {
    pub fn new(
        base_url: impl Into<String>,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self, RentalApiError> {
        let http = reqwest::Client::builder()
            .timeout(Settings::default().request_timeout())
            .build()?;
        Ok(Self::with_http_client(http, base_url, store))
    }

    /// Build a client from loaded settings, persisting the session in a file
    pub fn from_settings(settings: &Settings) -> Result<Self, RentalApiError> {
        settings.validate().map_err(RentalApiError::Configuration)?;

        let store = match &settings.session_path {
            Some(path) => FileCredentialStore::at(path)?,
            None => FileCredentialStore::new()?,
        };
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()?;

        Ok(Self::with_http_client(
            http,
            settings.base_url(),
            Arc::new(store),
        ))
    }

    pub fn with_http_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let auth = AuthClient::with_http_client(http.clone(), base_url.clone());

        let initial = match store.load() {
            Some(session) => SessionStatus::SignedIn(session.profile),
            None => SessionStatus::SignedOut,
        };
        let (status, _) = watch::channel(initial);

        Self {
            http,
            base_url,
            auth,
            store,
            refresh_lock: tokio::sync::Mutex::new(()),
            recovery: Mutex::new(RecoveryState::Normal),
            status,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub async fn send<R>(&self, request: R) -> Result<R::Response, RentalApiError>
    where
        R: ApiRequest,
    {
        let pending = PendingRequest::from_request(&request)?;
        let body = self.execute(&pending).await?;
        Ok(decode(&body)?)
    }

    /// Send a captured request, recovering from at most one 401
    pub async fn execute(&self, request: &PendingRequest) -> Result<Vec<u8>, RentalApiError> {
        let mut attempt = Attempt::first(request);
        loop {
            let token = self.access_token();
            let response = self.dispatch(attempt, token.as_ref()).await?;

            if response.status() != StatusCode::UNAUTHORIZED {
                return read_body(response).await;
            }

            if attempt.retried {
                let body = ErrorBody::from_text(&response.text().await?);
                warn!(
                    method = %request.method,
                    path = %request.path,
                    "request rejected again after token refresh"
                );
                return Err(RentalApiError::Unauthorized(body));
            }

            self.recover(token.as_ref()).await?;
            attempt = attempt.retry();
        }
    }

    fn access_token(&self) -> Option<SecretString> {
        self.store.load().map(|session| session.access_token)
    }

    async fn dispatch(
        &self,
        attempt: Attempt<'_>,
        token: Option<&SecretString>,
    ) -> Result<Response, RentalApiError> {
        let request = attempt.request;
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self.http.request(request.method.clone(), url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        debug!(
            method = %request.method,
            path = %request.path,
            authenticated = token.is_some(),
            retried = attempt.retried,
            "dispatching request"
        );
        let response = builder.send().await?;
        debug!(
            method = %request.method,
            path = %request.path,
            status = %response.status(),
            "response received"
        );

        Ok(response)
    }
}

async fn read_body(response: Response) -> Result<Vec<u8>, RentalApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.bytes().await?.to_vec());
    }

    let text = response.text().await?;
    if status.is_server_error() {
        Err(RentalApiError::Server(status, text.trim().to_string()))
    } else {
        Err(RentalApiError::Client(status, ErrorBody::from_text(&text)))
    }
}
