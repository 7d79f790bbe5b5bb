use crate::request::{Method, Request, RequestData};
use rental_auth::{ProfileUpdate, UserProfile};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

// GET /auth/user/

#[derive(Default, Debug, Clone)]
pub struct CurrentUser;

impl Request for CurrentUser {
    type Data = ();
    type Response = UserProfile;

    fn endpoint(&self) -> Cow<'_, str> {
        "/auth/user/".into()
    }
}

// PUT /auth/user/update/

#[derive(Debug, Clone)]
pub struct UpdateProfile {
    update: ProfileUpdate,
}

impl UpdateProfile {
    pub fn new(update: ProfileUpdate) -> Self {
        Self { update }
    }
}

impl Request for UpdateProfile {
    type Data = ProfileUpdate;
    type Response = ProfileUpdated;
    const METHOD: Method = Method::PUT;

    fn endpoint(&self) -> Cow<'_, str> {
        "/auth/user/update/".into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(&self.update)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdated {
    #[serde(default)]
    pub message: Option<String>,
    pub user: UserProfile,
}

// GET /dashboard/stats/

/// Role-dependent summary counters; the shape differs per role so it stays untyped
#[derive(Default, Debug, Clone)]
pub struct DashboardStats;

impl Request for DashboardStats {
    type Data = ();
    type Response = Value;

    fn endpoint(&self) -> Cow<'_, str> {
        "/dashboard/stats/".into()
    }
}
