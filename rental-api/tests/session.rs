mod common;

use std::sync::Arc;

use anyhow::Result;
use common::{MockBackend, PASSWORD, REFRESH_TOKEN, USERNAME, signed_in_store};
use rental_api::{
    CredentialStore, ExposeSecret, FileCredentialStore, MemoryCredentialStore, ProfileUpdate,
    RecoveryState, RentalApiError, Role, SecretString, SessionStatus,
};

fn password(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

#[tokio::test]
async fn login_stores_tokens_and_profile() -> Result<()> {
    let backend = MockBackend::start().await?;
    let store = Arc::new(MemoryCredentialStore::new());
    let client = backend.client(store.clone())?;
    let status = client.subscribe();
    assert_eq!(*status.borrow(), SessionStatus::SignedOut);

    let profile = client.login(USERNAME, &password(PASSWORD)).await?;

    assert_eq!(profile.username, USERNAME);
    assert_eq!(profile.role, Role::Landlord);
    assert_eq!(profile.display_name(), "Grace Hopper");

    let session = store.load().expect("session saved");
    assert_eq!(session.access_token.expose_secret(), "A1");
    assert_eq!(session.refresh_token.expose_secret(), REFRESH_TOKEN);
    assert_eq!(session.profile.as_ref(), Some(&profile));
    assert_eq!(*status.borrow(), SessionStatus::SignedIn(Some(profile)));
    Ok(())
}

#[tokio::test]
async fn bad_credentials_do_not_trigger_recovery() -> Result<()> {
    let backend = MockBackend::start().await?;
    let store = Arc::new(MemoryCredentialStore::new());
    let client = backend.client(store.clone())?;

    let err = client
        .login(USERNAME, &password("wrong"))
        .await
        .unwrap_err();

    match &err {
        RentalApiError::InvalidCredentials(body) => assert_eq!(
            body.detail(),
            Some("No active account found with the given credentials")
        ),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(backend.state.refresh_calls(), 0);
    assert!(store.load().is_none());
    assert_eq!(client.recovery_state(), RecoveryState::Normal);
    Ok(())
}

#[tokio::test]
async fn login_after_failed_recovery_resets_state() -> Result<()> {
    let backend = MockBackend::start().await?;
    backend.state.set_valid_access("expired");
    backend.state.reject_refresh();
    let store = signed_in_store("A1");
    let client = backend.client(store.clone())?;

    let err = client.dashboard_stats().await.unwrap_err();
    assert!(err.is_terminal());
    assert_eq!(client.recovery_state(), RecoveryState::Failed);

    client.login(USERNAME, &password(PASSWORD)).await?;
    assert_eq!(client.recovery_state(), RecoveryState::Normal);

    let stats = client.dashboard_stats().await?;
    assert_eq!(stats["total_properties"], 3);
    Ok(())
}

#[tokio::test]
async fn logout_clears_everything() -> Result<()> {
    let backend = MockBackend::start().await?;
    let store = signed_in_store("A1");
    let client = backend.client(store.clone())?;
    assert!(client.is_authenticated());

    client.logout()?;

    assert!(store.load().is_none());
    assert!(client.session().is_none());
    assert_eq!(*client.subscribe().borrow(), SessionStatus::SignedOut);

    // Logging out twice is harmless
    client.logout()?;
    Ok(())
}

#[tokio::test]
async fn restore_refreshes_cached_profile() -> Result<()> {
    let backend = MockBackend::start().await?;
    let store = signed_in_store("A1");
    let client = backend.client(store.clone())?;

    let status = client.restore().await;

    let profile = status.profile().expect("signed in");
    assert_eq!(profile.email.as_deref(), Some("landlord@example.com"));
    assert_eq!(backend.state.authorization(), vec![Some("Bearer A1".to_string())]);
    Ok(())
}

#[tokio::test]
async fn restore_without_session_is_signed_out() -> Result<()> {
    let backend = MockBackend::start().await?;
    let client = backend.client(Arc::new(MemoryCredentialStore::new()))?;

    assert_eq!(client.restore().await, SessionStatus::SignedOut);
    assert!(backend.state.authorization().is_empty());
    Ok(())
}

#[tokio::test]
async fn restore_keeps_cached_profile_when_offline() -> Result<()> {
    let store = signed_in_store("A1");
    let client = rental_api::Client::new("http://127.0.0.1:9/api", store.clone())?;

    let status = client.restore().await;

    assert!(status.is_signed_in());
    assert_eq!(
        status.profile().map(|p| p.username.as_str()),
        Some(USERNAME)
    );
    assert!(store.load().is_some());
    Ok(())
}

#[tokio::test]
async fn restore_with_revoked_session_signs_out() -> Result<()> {
    let backend = MockBackend::start().await?;
    backend.state.set_valid_access("expired");
    backend.state.reject_refresh();
    let store = signed_in_store("A1");
    let client = backend.client(store.clone())?;

    assert_eq!(client.restore().await, SessionStatus::SignedOut);
    assert!(store.load().is_none());
    Ok(())
}

#[tokio::test]
async fn update_profile_refreshes_cache() -> Result<()> {
    let backend = MockBackend::start().await?;
    let store = signed_in_store("A1");
    let client = backend.client(store.clone())?;

    let update = ProfileUpdate {
        phone: Some("+1 555 0199".to_string()),
        ..Default::default()
    };
    let profile = client.update_profile(update).await?;

    assert_eq!(profile.phone.as_deref(), Some("+1 555 0199"));
    let cached = store.load().and_then(|s| s.profile).expect("profile cached");
    assert_eq!(cached.phone.as_deref(), Some("+1 555 0199"));
    // Tokens untouched
    assert_eq!(
        store.load().map(|s| s.access_token.expose_secret().to_string()),
        Some("A1".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn update_profile_surfaces_field_errors() -> Result<()> {
    let backend = MockBackend::start().await?;
    let client = backend.client(signed_in_store("A1"))?;

    let update = ProfileUpdate {
        email: Some(String::new()),
        ..Default::default()
    };
    let err = client.update_profile(update).await.unwrap_err();

    let fields = err.error_body().map(|b| b.field_errors()).unwrap_or_default();
    assert_eq!(
        fields.get("email"),
        Some(&vec!["Enter a valid email address.".to_string()])
    );
    Ok(())
}

#[tokio::test]
async fn session_survives_client_restart() -> Result<()> {
    let backend = MockBackend::start().await?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("session.json");

    {
        let store = Arc::new(FileCredentialStore::at(&path)?);
        let client = backend.client(store)?;
        client.login(USERNAME, &password(PASSWORD)).await?;
    }

    let store = Arc::new(FileCredentialStore::at(&path)?);
    let client = backend.client(store.clone())?;
    assert!(client.subscribe().borrow().is_signed_in());

    let profile = client.current_user().await?;
    assert_eq!(profile.id, 7);
    assert_eq!(
        store.load().map(|s| s.refresh_token.expose_secret().to_string()),
        Some(REFRESH_TOKEN.to_string())
    );
    Ok(())
}
