use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::borrow::Cow;

pub use reqwest::Method;

/// What a request carries besides its path
pub enum RequestData<T> {
    Empty,
    Query(T),
    Json(T),
}

/// A typed call against the API.
///
/// Implementors describe the call; the [`crate::Client`] turns it into a
/// [`PendingRequest`], attaches credentials and decodes `Response`.
pub trait Request {
    type Data: Serialize;
    type Response: DeserializeOwned;

    const METHOD: Method = Method::GET;

    fn endpoint(&self) -> Cow<'_, str>;

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Empty
    }
}

/// Response of calls that answer with no body (`204 No Content`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoContent;

impl<'de> Deserialize<'de> for NoContent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        IgnoredAny::deserialize(deserializer)?;
        Ok(NoContent)
    }
}

/// A captured outbound call. Never mutated once built; retries reuse it as is.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl PendingRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn from_request<R>(request: &R) -> Result<Self, serde_json::Error>
    where
        R: Request,
    {
        let mut pending = Self::new(R::METHOD, request.endpoint().into_owned());
        match request.data() {
            RequestData::Empty => {}
            RequestData::Query(query) => pending.query = query_pairs(serde_json::to_value(query)?),
            RequestData::Json(body) => pending.body = Some(serde_json::to_value(body)?),
        }
        Ok(pending)
    }
}

/// Flatten a serialized query object into `key=value` pairs, skipping nulls
/// and repeating keys for arrays
fn query_pairs(value: Value) -> Vec<(String, String)> {
    let Value::Object(map) = value else {
        return Vec::new();
    };

    let mut pairs = Vec::new();
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                pairs.extend(
                    items
                        .into_iter()
                        .filter_map(scalar)
                        .map(|item| (key.clone(), item)),
                );
            }
            other => {
                if let Some(item) = scalar(other) {
                    pairs.push((key, item));
                }
            }
        }
    }
    pairs
}

fn scalar(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Decode a response body; an empty body decodes as JSON `null`
pub(crate) fn decode<T>(body: &[u8]) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_slice(b"null")
    } else {
        serde_json::from_slice(body)
    }
}

/// Mark an attempt at sending a [`PendingRequest`].
///
/// `retried` is set once the request has been re-issued after a credential
/// refresh; such an attempt never triggers another refresh.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Attempt<'a> {
    pub request: &'a PendingRequest,
    pub retried: bool,
}

impl<'a> Attempt<'a> {
    pub fn first(request: &'a PendingRequest) -> Self {
        Self {
            request,
            retried: false,
        }
    }

    pub fn retry(self) -> Self {
        Self {
            request: self.request,
            retried: true,
        }
    }
}
