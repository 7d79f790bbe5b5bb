use crate::client::Client;
use crate::error::RentalApiError;
use crate::session::SessionStatus;
use secrecy::{ExposeSecret, SecretString};
use std::sync::PoisonError;
use tracing::{debug, info, warn};

/// Where the client stands with respect to credential recovery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryState {
    #[default]
    Normal,
    /// A refresh call is in flight
    Refreshing,
    /// The last refresh was rejected and the session was dropped.
    /// Cleared by the next successful login.
    Failed,
}

impl Client {
    pub fn recovery_state(&self) -> RecoveryState {
        *self.recovery.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn set_recovery_state(&self, state: RecoveryState) {
        *self.recovery.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Get a usable access token after an attempt carrying `failed_token` was
    /// answered with 401.
    ///
    /// Refreshes are serialized: whoever takes the lock after the token has
    /// already been replaced just retries with the new one.
    pub(crate) async fn recover(
        &self,
        failed_token: Option<&SecretString>,
    ) -> Result<(), RentalApiError> {
        let _guard = self.refresh_lock.lock().await;

        let Some(session) = self.store.load() else {
            warn!("received 401 with no stored session");
            return Err(self.fail_recovery());
        };

        if !same_token(failed_token, &session.access_token) {
            debug!("access token was refreshed by another request, retrying");
            return Ok(());
        }

        self.set_recovery_state(RecoveryState::Refreshing);
        match self.auth.refresh_access_token(&session.refresh_token).await {
            Ok(access_token) => {
                let stored = self.store.update_access_token(access_token);
                self.set_recovery_state(RecoveryState::Normal);
                stored?;
                info!("access token refreshed");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed, signing out");
                Err(self.fail_recovery())
            }
        }
    }

    fn fail_recovery(&self) -> RentalApiError {
        self.set_recovery_state(RecoveryState::Failed);
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear credential store");
        }
        self.status.send_replace(SessionStatus::SignedOut);
        RentalApiError::NotAuthenticated
    }
}

fn same_token(used: Option<&SecretString>, stored: &SecretString) -> bool {
    used.is_some_and(|used| used.expose_secret() == stored.expose_secret())
}
