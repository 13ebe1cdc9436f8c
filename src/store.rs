use std::sync::Arc;

use crate::table::{self, Item, ItemKey, MemoryTable, TableClient};
use crate::{KeyPrefix, LOG_TARGET, ReadOutcome, SessionConfig, SessionHandler};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Table(#[from] table::Error),
}

/// A session store persisting each session as one item of a remote table.
///
/// Every operation maps to exactly one table request against the key
/// `prefix + session_id`:
///
/// | operation | table request |
/// |---|---|
/// | `read` | `get_item({id_column: key})` |
/// | `write` | `put_item({id_column: key, data_column?: data})` |
/// | `destroy` | `delete_item({id_column: key})` |
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use sessiontable::{ReadOutcome, SessionConfig, SessionHandler, TableSessionStore};
/// use sessiontable::table::MemoryTable;
///
/// # #[tokio::main]
/// # async fn main() {
/// let config = SessionConfig::builder("sessions")
///     .key_prefix("ab12c")
///     .build()
///     .unwrap();
/// let store = TableSessionStore::new(Arc::new(MemoryTable::new()), config);
///
/// assert_eq!(store.calculate_key("sess123"), "ab12csess123");
/// assert!(store.write("sess123", "user_id=42").await);
/// assert_eq!(store.read("sess123").await, ReadOutcome::Data("user_id=42".into()));
/// assert!(store.destroy("sess123").await);
/// assert_eq!(store.read("sess123").await, ReadOutcome::Empty);
/// # }
/// ```
#[derive(Debug)]
pub struct TableSessionStore<C: TableClient = MemoryTable> {
    client: Arc<C>,
    config: Arc<SessionConfig>,
}

impl<C: TableClient> Clone for TableSessionStore<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            config: Arc::clone(&self.config),
        }
    }
}

impl<C> TableSessionStore<C>
where
    C: TableClient,
{
    pub fn new(client: Arc<C>, config: SessionConfig) -> Self {
        tracing::debug!(
            target: LOG_TARGET,
            table = config.table_name(),
            key_prefix = %config.key_prefix(),
            "session store initialized"
        );

        Self {
            client,
            config: Arc::new(config),
        }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn key_prefix(&self) -> &KeyPrefix {
        self.config.key_prefix()
    }

    /// Returns the table key for `session_id`: the prefix followed by the id.
    pub fn calculate_key(&self, session_id: &str) -> String {
        self.config.key_prefix().key_for(session_id)
    }

    fn item_key(&self, session_id: &str) -> ItemKey {
        ItemKey::new(self.config.id_column(), self.calculate_key(session_id))
    }

    /// Reads the payload of `session_id`.
    ///
    /// Returns `None` when no record exists or the record has no payload.
    pub async fn try_read(&self, session_id: &str) -> Result<Option<String>, Error> {
        let item = self
            .client
            .get_item(self.config.table_name(), &self.item_key(session_id))
            .await?;

        Ok(item.and_then(|item| item.get(self.config.data_column()).map(str::to_string)))
    }

    /// Replaces the record of `session_id`.
    ///
    /// An empty `data` writes a record without the data attribute.
    pub async fn try_write(&self, session_id: &str, data: &str) -> Result<(), Error> {
        let mut item = Item::new(self.item_key(session_id));
        if !data.is_empty() {
            item = item.with_attribute(self.config.data_column(), data);
        }

        self.client
            .put_item(self.config.table_name(), &item)
            .await?;
        Ok(())
    }

    /// Deletes the record of `session_id`, if any.
    pub async fn try_destroy(&self, session_id: &str) -> Result<(), Error> {
        self.client
            .delete_item(self.config.table_name(), &self.item_key(session_id))
            .await?;
        Ok(())
    }
}

// Session ids are bearer secrets and never reach the log.
fn log_failure(operation: &'static str, key_prefix: &KeyPrefix, err: &Error) {
    tracing::error!(
        target: LOG_TARGET,
        component = "TableSessionStore",
        operation,
        key_prefix = %key_prefix,
        error = %err,
        "session store operation failed"
    );
}

impl<C> SessionHandler for TableSessionStore<C>
where
    C: TableClient,
{
    async fn read(&self, session_id: &str) -> ReadOutcome {
        match self.try_read(session_id).await {
            Ok(payload) => {
                tracing::trace!(target: LOG_TARGET, found = payload.is_some(), "session read");
                ReadOutcome::from(payload)
            }
            Err(err) => {
                log_failure("read", self.key_prefix(), &err);
                ReadOutcome::Failed
            }
        }
    }

    async fn write(&self, session_id: &str, data: &str) -> bool {
        match self.try_write(session_id, data).await {
            Ok(()) => {
                tracing::trace!(target: LOG_TARGET, len = data.len(), "session written");
                true
            }
            Err(err) => {
                log_failure("write", self.key_prefix(), &err);
                false
            }
        }
    }

    async fn destroy(&self, session_id: &str) -> bool {
        match self.try_destroy(session_id).await {
            Ok(()) => {
                tracing::trace!(target: LOG_TARGET, "session destroyed");
                true
            }
            Err(err) => {
                log_failure("destroy", self.key_prefix(), &err);
                false
            }
        }
    }

    fn uses_custom_storage(&self) -> bool {
        true
    }
}
