use crate::table::{Error, Item, ItemKey, TableClient};
use dashmap::DashMap;

/// An in-memory table client.
///
/// Items live in a process-local map keyed by table name and key value.
///
/// ### Note
///
/// Do not use this in a production environment.
#[derive(Debug, Default)]
pub struct MemoryTable {
    items: DashMap<(String, String), Item>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    /// Number of items stored across all tables.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl TableClient for MemoryTable {
    async fn get_item(&self, table: &str, key: &ItemKey) -> Result<Option<Item>, Error> {
        let item = self
            .items
            .get(&(table.to_string(), key.value().to_string()))
            .map(|entry| entry.value().clone());

        Ok(item)
    }

    async fn put_item(&self, table: &str, item: &Item) -> Result<(), Error> {
        self.items.insert(
            (table.to_string(), item.key().value().to_string()),
            item.clone(),
        );
        Ok(())
    }

    async fn delete_item(&self, table: &str, key: &ItemKey) -> Result<(), Error> {
        self.items
            .remove(&(table.to_string(), key.value().to_string()));
        Ok(())
    }
}
