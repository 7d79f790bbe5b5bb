mod error_body;
mod models;

pub use error_body::ErrorBody;
pub use models::{NewUser, ProfileUpdate, Role, Session, UserProfile};
