pub mod auth;
pub mod resources;

use crate::macros::setter;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

/// A collection exposed by the API under `/{path}/`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
    Properties,
    PropertyImages,
    Units,
    Tenants,
    Leases,
    Payments,
    Expenses,
    Documents,
    Notifications,
    Accounts,
    JournalEntries,
    JournalEntryLines,
    /// Any collection not listed above
    Other(String),
}

impl Resource {
    pub const KNOWN: [Resource; 13] = [
        Resource::Users,
        Resource::Properties,
        Resource::PropertyImages,
        Resource::Units,
        Resource::Tenants,
        Resource::Leases,
        Resource::Payments,
        Resource::Expenses,
        Resource::Documents,
        Resource::Notifications,
        Resource::Accounts,
        Resource::JournalEntries,
        Resource::JournalEntryLines,
    ];

    pub fn path(&self) -> &str {
        match self {
            Resource::Users => "users",
            Resource::Properties => "properties",
            Resource::PropertyImages => "property-images",
            Resource::Units => "units",
            Resource::Tenants => "tenants",
            Resource::Leases => "leases",
            Resource::Payments => "payments",
            Resource::Expenses => "expenses",
            Resource::Documents => "documents",
            Resource::Notifications => "notifications",
            Resource::Accounts => "accounts",
            Resource::JournalEntries => "journal-entries",
            Resource::JournalEntryLines => "journal-entry-lines",
            Resource::Other(path) => path,
        }
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Resource {
    type Err = ResourceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim().trim_matches('/');
        if path.is_empty()
            || !path
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ResourceParseError(s.to_string()));
        }

        let resource = Self::KNOWN
            .into_iter()
            .find(|known| known.path() == path)
            .unwrap_or_else(|| Resource::Other(path.to_string()));
        Ok(resource)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceParseError(String);

impl std::fmt::Display for ResourceParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid resource '{}': expected a collection name such as 'properties' or 'journal-entries'",
            self.0
        )
    }
}

impl std::error::Error for ResourceParseError {}

/// Primary key of a single record, as it appears in the URL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for ResourceId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<i32> for ResourceId {
    fn from(id: i32) -> Self {
        Self(id.to_string())
    }
}

impl From<u32> for ResourceId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self(id.trim().trim_matches('/').to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        ResourceId::from(id.as_str())
    }
}

/// Filters for list calls: search, ordering, page and exact-match fields
#[derive(Default, Debug, Clone, PartialEq, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ordering: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
    #[serde(flatten)]
    filters: BTreeMap<String, String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    setter!(opt search: String);
    setter!(opt ordering: String);
    setter!(opt page: u32);

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.ordering.is_none()
            && self.page.is_none()
            && self.filters.is_empty()
    }
}

/// The records of a list call, whatever shape the server answered with.
///
/// Collections come back either as a bare JSON array or as a paginated
/// envelope `{count, next, previous, results}`; both end up here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing<T> {
    pub items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}

impl<T> Listing<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> IntoIterator for Listing<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListingShape<T> {
    Page {
        results: Vec<T>,
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
    },
    Bare(Vec<T>),
}

impl<'de, T> Deserialize<'de> for Listing<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let listing = match ListingShape::deserialize(deserializer)? {
            ListingShape::Page {
                results,
                count,
                next,
                previous,
            } => Listing {
                items: results,
                count,
                next,
                previous,
            },
            ListingShape::Bare(items) => Listing {
                items,
                count: None,
                next: None,
                previous: None,
            },
        };
        Ok(listing)
    }
}
