mod auth_client;
mod config;
mod credential_store;

pub use auth_client::{AuthClient, AuthClientError};
pub use config::Settings;
pub use credential_store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
