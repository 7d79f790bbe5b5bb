use crate::Request;
use crate::client::Client;
use crate::error::RentalApiError;
use crate::recovery::RecoveryState;
use rental_auth::{AuthClientError, NewUser, ProfileUpdate, Session, UserProfile};
use reqwest::StatusCode;
use secrecy::SecretString;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Latest known session state, as published to observers
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    SignedOut,
    /// Signed in; the profile is missing only when it could not be fetched yet
    SignedIn(Option<UserProfile>),
}

impl SessionStatus {
    pub fn is_signed_in(&self) -> bool {
        matches!(self, SessionStatus::SignedIn(_))
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            SessionStatus::SignedIn(profile) => profile.as_ref(),
            SessionStatus::SignedOut => None,
        }
    }
}

impl Client {
    /// Exchange credentials for a session and remember it.
    ///
    /// Neither call here goes through recovery; a 401 means the credentials
    /// were wrong.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<UserProfile, RentalApiError> {
        let session = self
            .auth
            .obtain_tokens(username, password)
            .await
            .map_err(login_error)?;
        let profile = self.auth.fetch_profile(&session.access_token).await?;

        self.store.save(
            session.access_token,
            session.refresh_token,
            Some(profile.clone()),
        )?;
        self.set_recovery_state(RecoveryState::Normal);
        self.status
            .send_replace(SessionStatus::SignedIn(Some(profile.clone())));

        info!(username = %profile.username, role = %profile.role, "logged in");
        Ok(profile)
    }

    pub fn logout(&self) -> Result<(), RentalApiError> {
        self.store.clear()?;
        self.status.send_replace(SessionStatus::SignedOut);
        info!("logged out");
        Ok(())
    }

    /// Pick up a session left by a previous run.
    ///
    /// The cached profile is refreshed from the server when possible. Only a
    /// rejected refresh token ends the session; any other failure keeps the
    /// cached profile.
    pub async fn restore(&self) -> SessionStatus {
        let Some(session) = self.store.load() else {
            self.status.send_replace(SessionStatus::SignedOut);
            return SessionStatus::SignedOut;
        };

        let status = match self.current_user().await {
            Ok(profile) => SessionStatus::SignedIn(Some(profile)),
            Err(RentalApiError::NotAuthenticated) => SessionStatus::SignedOut,
            Err(err) => {
                warn!(error = %err, "could not refresh profile, using cached one");
                SessionStatus::SignedIn(session.profile)
            }
        };
        self.status.send_replace(status.clone());
        status
    }

    pub async fn current_user(&self) -> Result<UserProfile, RentalApiError> {
        let profile = self.send(Request::auth().current_user()).await?;
        self.remember_profile(&profile)?;
        Ok(profile)
    }

    /// Create an account. The new user still has to log in.
    pub async fn register(&self, user: &NewUser) -> Result<UserProfile, RentalApiError> {
        let profile = self.auth.register(user).await?;
        info!(username = %profile.username, role = %profile.role, "registered user");
        Ok(profile)
    }

    pub async fn update_profile(
        &self,
        update: ProfileUpdate,
    ) -> Result<UserProfile, RentalApiError> {
        let updated = self.send(Request::auth().update_profile(update)).await?;
        if let Some(message) = &updated.message {
            debug!("{}", message);
        }
        self.remember_profile(&updated.user)?;
        Ok(updated.user)
    }

    pub async fn dashboard_stats(&self) -> Result<Value, RentalApiError> {
        self.send(Request::dashboard().stats()).await
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    pub fn session(&self) -> Option<Session> {
        self.store.load()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.load().is_some()
    }

    fn remember_profile(&self, profile: &UserProfile) -> Result<(), RentalApiError> {
        if !self.is_authenticated() {
            return Ok(());
        }
        self.store.update_profile(profile.clone())?;
        self.status
            .send_replace(SessionStatus::SignedIn(Some(profile.clone())));
        Ok(())
    }
}

fn login_error(err: AuthClientError) -> RentalApiError {
    match err {
        AuthClientError::Rejected(StatusCode::UNAUTHORIZED, body) => {
            RentalApiError::InvalidCredentials(body)
        }
        other => other.into(),
    }
}
