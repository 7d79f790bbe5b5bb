use crate::endpoints::{
    Resource, ResourceId,
    auth::{CurrentUser, DashboardStats, UpdateProfile},
    resources::{
        CreateResource, DeleteResource, GetResource, ListResources, PatchResource, ResourceAction,
        UpdateResource,
    },
};
use rental_auth::ProfileUpdate;

pub struct ResourceRepository {
    resource: Resource,
}

impl ResourceRepository {
    pub fn new(resource: Resource) -> Self {
        Self { resource }
    }

    pub fn list<Item>(&self) -> ListResources<Item> {
        ListResources::new(self.resource.clone())
    }

    pub fn get<Item>(&self, id: impl Into<ResourceId>) -> GetResource<Item> {
        GetResource::new(self.resource.clone(), id.into())
    }

    pub fn create<Body, Item>(&self, body: Body) -> CreateResource<Body, Item> {
        CreateResource::new(self.resource.clone(), body)
    }

    pub fn update<Body, Item>(
        &self,
        id: impl Into<ResourceId>,
        body: Body,
    ) -> UpdateResource<Body, Item> {
        UpdateResource::new(self.resource.clone(), id.into(), body)
    }

    pub fn patch<Body, Item>(
        &self,
        id: impl Into<ResourceId>,
        body: Body,
    ) -> PatchResource<Body, Item> {
        PatchResource::new(self.resource.clone(), id.into(), body)
    }

    pub fn delete(&self, id: impl Into<ResourceId>) -> DeleteResource {
        DeleteResource::new(self.resource.clone(), id.into())
    }

    pub fn action<Body, Item>(
        &self,
        id: impl Into<ResourceId>,
        action: impl Into<String>,
        body: Body,
    ) -> ResourceAction<Body, Item> {
        ResourceAction::new(self.resource.clone(), id.into(), action, body)
    }
}

pub struct AuthRepository;

impl AuthRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn current_user(&self) -> CurrentUser {
        CurrentUser
    }

    pub fn update_profile(&self, update: ProfileUpdate) -> UpdateProfile {
        UpdateProfile::new(update)
    }
}

pub struct DashboardRepository;

impl DashboardRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats
    }
}
