mod client;
pub mod endpoints;
mod error;
mod macros;
mod recovery;
pub mod repositories;
pub mod request;
mod resources;
mod session;

pub use crate::client::Client;
pub use crate::endpoints::{ListQuery, Listing, Resource, ResourceId, auth::ProfileUpdated};
pub use crate::error::RentalApiError;
pub use crate::recovery::RecoveryState;
pub use crate::request::{NoContent, PendingRequest};
pub use crate::session::SessionStatus;
pub use rental_auth::{
    CredentialStore, ErrorBody, ExposeSecret, FileCredentialStore, MemoryCredentialStore, NewUser,
    ProfileUpdate, Role, SecretString, Session, Settings, UserProfile,
};
use repositories::*;

pub struct Request;

impl Request {
    pub fn new() -> Self {
        Self {}
    }

    pub fn resource(resource: Resource) -> ResourceRepository {
        ResourceRepository::new(resource)
    }

    pub fn auth() -> AuthRepository {
        AuthRepository::new()
    }

    pub fn dashboard() -> DashboardRepository {
        DashboardRepository::new()
    }
}
