use crate::Request;
use crate::client::Client;
use crate::endpoints::{ListQuery, Listing, Resource, ResourceId};
use crate::error::RentalApiError;
use serde::Serialize;
use serde::de::DeserializeOwned;

// Shorthands over `Request::resource(..)` for the common verbs.
impl Client {
    pub async fn list<T>(
        &self,
        resource: Resource,
        query: ListQuery,
    ) -> Result<Vec<T>, RentalApiError>
    where
        T: DeserializeOwned,
    {
        Ok(self.list_page(resource, query).await?.into_items())
    }

    /// One page of a collection, with pagination metadata when the server sends it
    pub async fn list_page<T>(
        &self,
        resource: Resource,
        query: ListQuery,
    ) -> Result<Listing<T>, RentalApiError>
    where
        T: DeserializeOwned,
    {
        self.send(Request::resource(resource).list::<T>().query(query)).await
    }

    pub async fn get<T>(
        &self,
        resource: Resource,
        id: impl Into<ResourceId>,
    ) -> Result<T, RentalApiError>
    where
        T: DeserializeOwned,
    {
        self.send(Request::resource(resource).get::<T>(id)).await
    }

    pub async fn create<B, T>(&self, resource: Resource, body: B) -> Result<T, RentalApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        self.send(Request::resource(resource).create::<B, T>(body)).await
    }

    pub async fn update<B, T>(
        &self,
        resource: Resource,
        id: impl Into<ResourceId>,
        body: B,
    ) -> Result<T, RentalApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        self.send(Request::resource(resource).update::<B, T>(id, body)).await
    }

    pub async fn patch<B, T>(
        &self,
        resource: Resource,
        id: impl Into<ResourceId>,
        body: B,
    ) -> Result<T, RentalApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        self.send(Request::resource(resource).patch::<B, T>(id, body)).await
    }

    pub async fn delete(
        &self,
        resource: Resource,
        id: impl Into<ResourceId>,
    ) -> Result<(), RentalApiError> {
        self.send(Request::resource(resource).delete(id)).await?;
        Ok(())
    }

    /// `POST /{resource}/{id}/{action}/`, e.g. answering a notification
    pub async fn action<B, T>(
        &self,
        resource: Resource,
        id: impl Into<ResourceId>,
        action: &str,
        body: B,
    ) -> Result<T, RentalApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        self.send(Request::resource(resource).action::<B, T>(id, action, body))
            .await
    }
}
