//! Remote key-value tables the session store persists into.
//!
//! A table holds [`Item`]s: flat maps of attribute names to string values,
//! addressed by a single key attribute ([`ItemKey`]).

use std::collections::BTreeMap;
use std::future::Future;

pub mod memory;
pub use memory::MemoryTable;

#[cfg(feature = "redis-table")]
pub mod redis;

#[cfg(feature = "postgres-table")]
pub mod postgres;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Backend(String),

    #[error("Decoding failed with: {0}")]
    Decode(String),
}

#[cfg(feature = "redis-table")]
impl From<fred::error::Error> for Error {
    fn from(err: fred::error::Error) -> Self {
        Error::Backend(err.to_string())
    }
}

#[cfg(feature = "postgres-table")]
impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Backend(err.to_string())
    }
}

/// The primary key of an item: one attribute name and its value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemKey {
    attribute: String,
    value: String,
}

impl ItemKey {
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A stored item. Its attribute map always contains the key attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    key: ItemKey,
    attributes: BTreeMap<String, String>,
}

impl Item {
    pub fn new(key: ItemKey) -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert(key.attribute.clone(), key.value.clone());
        Self { key, attributes }
    }

    /// Rebuilds an item read back from a table.
    ///
    /// Fails when the key attribute is missing from `attributes`.
    pub fn from_attributes<I>(key_attribute: &str, attributes: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let attributes: BTreeMap<String, String> = attributes.into_iter().collect();
        let value = attributes.get(key_attribute).cloned().ok_or_else(|| {
            Error::Decode(format!("item is missing its key attribute `{key_attribute}`"))
        })?;

        Ok(Self {
            key: ItemKey::new(key_attribute, value),
            attributes,
        })
    }

    /// Sets `name` to `value`. The key attribute cannot be overwritten.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        if name != self.key.attribute {
            self.attributes.insert(name, value.into());
        }
        self
    }

    pub fn key(&self) -> &ItemKey {
        &self.key
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// All attributes, key attribute included, in name order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// The item API of a remote key-value table.
///
/// Every method is a single round trip. Implementations do not retry.
pub trait TableClient: Send + Sync + 'static {
    /// Fetches the item stored under `key` in `table`, if any.
    fn get_item(
        &self,
        table: &str,
        key: &ItemKey,
    ) -> impl Future<Output = Result<Option<Item>, Error>> + Send;

    /// Stores `item`, replacing every attribute of a previous item with the same key.
    fn put_item(&self, table: &str, item: &Item) -> impl Future<Output = Result<(), Error>> + Send;

    /// Deletes the item stored under `key`. Deleting a missing item is not an error.
    fn delete_item(
        &self,
        table: &str,
        key: &ItemKey,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}
