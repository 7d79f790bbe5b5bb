// Session and profile types shared with the API client
pub mod common;

// Credential storage, settings and the token endpoints
mod client;
mod error;

pub use client::{
    AuthClient, AuthClientError, CredentialStore, FileCredentialStore, MemoryCredentialStore,
    Settings,
};
pub use common::{ErrorBody, NewUser, ProfileUpdate, Role, Session, UserProfile};
pub use error::AuthError;
pub use secrecy::{ExposeSecret, SecretString};
