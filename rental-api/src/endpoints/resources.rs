use super::{ListQuery, Listing, Resource, ResourceId};
use crate::macros::setter;
use crate::request::{Method, NoContent, Request, RequestData};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::borrow::Cow;
use std::marker::PhantomData;

fn collection_path(resource: &Resource) -> String {
    format!("/{}/", resource.path())
}

fn item_path(resource: &Resource, id: &ResourceId) -> String {
    format!("/{}/{}/", resource.path(), id)
}

// GET /{resource}/

#[derive(Debug, Clone)]
pub struct ListResources<Item = Value> {
    resource: Resource,
    query: ListQuery,
    item: PhantomData<fn() -> Item>,
}

impl<Item> ListResources<Item> {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            query: ListQuery::default(),
            item: PhantomData,
        }
    }

    setter!(query: ListQuery);
    setter!(opt query.search: String);
    setter!(opt query.ordering: String);
    setter!(opt query.page: u32);

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.query = self.query.filter(field, value);
        self
    }
}

impl<Item> Request for ListResources<Item>
where
    Item: DeserializeOwned,
{
    type Data = ListQuery;
    type Response = Listing<Item>;

    fn endpoint(&self) -> Cow<'_, str> {
        collection_path(&self.resource).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        if self.query.is_empty() {
            RequestData::Empty
        } else {
            RequestData::Query(&self.query)
        }
    }
}

// GET /{resource}/{id}/

#[derive(Debug, Clone)]
pub struct GetResource<Item = Value> {
    resource: Resource,
    id: ResourceId,
    item: PhantomData<fn() -> Item>,
}

impl<Item> GetResource<Item> {
    pub fn new(resource: Resource, id: ResourceId) -> Self {
        Self {
            resource,
            id,
            item: PhantomData,
        }
    }
}

impl<Item> Request for GetResource<Item>
where
    Item: DeserializeOwned,
{
    type Data = ();
    type Response = Item;

    fn endpoint(&self) -> Cow<'_, str> {
        item_path(&self.resource, &self.id).into()
    }
}

// POST /{resource}/

#[derive(Debug, Clone)]
pub struct CreateResource<Body = Value, Item = Value> {
    resource: Resource,
    body: Body,
    item: PhantomData<fn() -> Item>,
}

impl<Body, Item> CreateResource<Body, Item> {
    pub fn new(resource: Resource, body: Body) -> Self {
        Self {
            resource,
            body,
            item: PhantomData,
        }
    }
}

impl<Body, Item> Request for CreateResource<Body, Item>
where
    Body: Serialize,
    Item: DeserializeOwned,
{
    type Data = Body;
    type Response = Item;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        collection_path(&self.resource).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(&self.body)
    }
}

// PUT /{resource}/{id}/

#[derive(Debug, Clone)]
pub struct UpdateResource<Body = Value, Item = Value> {
    resource: Resource,
    id: ResourceId,
    body: Body,
    item: PhantomData<fn() -> Item>,
}

impl<Body, Item> UpdateResource<Body, Item> {
    pub fn new(resource: Resource, id: ResourceId, body: Body) -> Self {
        Self {
            resource,
            id,
            body,
            item: PhantomData,
        }
    }
}

impl<Body, Item> Request for UpdateResource<Body, Item>
where
    Body: Serialize,
    Item: DeserializeOwned,
{
    type Data = Body;
    type Response = Item;
    const METHOD: Method = Method::PUT;

    fn endpoint(&self) -> Cow<'_, str> {
        item_path(&self.resource, &self.id).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(&self.body)
    }
}

// PATCH /{resource}/{id}/

#[derive(Debug, Clone)]
pub struct PatchResource<Body = Value, Item = Value> {
    resource: Resource,
    id: ResourceId,
    body: Body,
    item: PhantomData<fn() -> Item>,
}

impl<Body, Item> PatchResource<Body, Item> {
    pub fn new(resource: Resource, id: ResourceId, body: Body) -> Self {
        Self {
            resource,
            id,
            body,
            item: PhantomData,
        }
    }
}

impl<Body, Item> Request for PatchResource<Body, Item>
where
    Body: Serialize,
    Item: DeserializeOwned,
{
    type Data = Body;
    type Response = Item;
    const METHOD: Method = Method::PATCH;

    fn endpoint(&self) -> Cow<'_, str> {
        item_path(&self.resource, &self.id).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(&self.body)
    }
}

// DELETE /{resource}/{id}/

#[derive(Debug, Clone)]
pub struct DeleteResource {
    resource: Resource,
    id: ResourceId,
}

impl DeleteResource {
    pub fn new(resource: Resource, id: ResourceId) -> Self {
        Self { resource, id }
    }
}

impl Request for DeleteResource {
    type Data = ();
    type Response = NoContent;
    const METHOD: Method = Method::DELETE;

    fn endpoint(&self) -> Cow<'_, str> {
        item_path(&self.resource, &self.id).into()
    }
}

// POST /{resource}/{id}/{action}/

#[derive(Debug, Clone)]
pub struct ResourceAction<Body = Value, Item = Value> {
    resource: Resource,
    id: ResourceId,
    action: String,
    body: Body,
    item: PhantomData<fn() -> Item>,
}

impl<Body, Item> ResourceAction<Body, Item> {
    pub fn new(resource: Resource, id: ResourceId, action: impl Into<String>, body: Body) -> Self {
        Self {
            resource,
            id,
            action: action.into().trim_matches('/').to_string(),
            body,
            item: PhantomData,
        }
    }
}

impl<Body, Item> Request for ResourceAction<Body, Item>
where
    Body: Serialize,
    Item: DeserializeOwned,
{
    type Data = Body;
    type Response = Item;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/{}/{}/{}/", self.resource.path(), self.id, self.action).into()
    }

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Json(&self.body)
    }
}
