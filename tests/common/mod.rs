#![allow(dead_code)]

use parking_lot::Mutex;
use sessiontable::table::{self, Item, ItemKey, MemoryTable, TableClient};
use sessiontable::{SessionConfig, TableSessionStore};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

pub const TABLE: &str = "sessions";
pub const PREFIX: &str = "ab12c";

pub fn build_config(prefix: &str) -> SessionConfig {
    SessionConfig::builder(TABLE)
        .key_prefix(prefix)
        .build()
        .unwrap()
}

pub fn memory_store() -> TableSessionStore<MemoryTable> {
    TableSessionStore::new(Arc::new(MemoryTable::new()), build_config(PREFIX))
}

/// A table whose every request fails as if the server were down.
#[derive(Debug, Default)]
pub struct UnreachableTable;

impl TableClient for UnreachableTable {
    async fn get_item(&self, _table: &str, _key: &ItemKey) -> Result<Option<Item>, table::Error> {
        Err(table::Error::Backend("connection refused".to_string()))
    }

    async fn put_item(&self, _table: &str, _item: &Item) -> Result<(), table::Error> {
        Err(table::Error::Backend("connection refused".to_string()))
    }

    async fn delete_item(&self, _table: &str, _key: &ItemKey) -> Result<(), table::Error> {
        Err(table::Error::Backend("connection refused".to_string()))
    }
}

/// Wraps a `MemoryTable` and counts the requests it receives.
#[derive(Debug, Default)]
pub struct CountingTable {
    pub inner: MemoryTable,
    pub gets: AtomicUsize,
    pub puts: AtomicUsize,
    pub deletes: AtomicUsize,
}

impl CountingTable {
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.gets.load(Ordering::SeqCst),
            self.puts.load(Ordering::SeqCst),
            self.deletes.load(Ordering::SeqCst),
        )
    }
}

impl TableClient for CountingTable {
    async fn get_item(&self, table: &str, key: &ItemKey) -> Result<Option<Item>, table::Error> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get_item(table, key).await
    }

    async fn put_item(&self, table: &str, item: &Item) -> Result<(), table::Error> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put_item(table, item).await
    }

    async fn delete_item(&self, table: &str, key: &ItemKey) -> Result<(), table::Error> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_item(table, key).await
    }
}

#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub fields: HashMap<String, String>,
}

/// Collects every tracing event emitted while its guard is alive.
#[derive(Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl LogCapture {
    /// Installs the capture as the thread's default subscriber.
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn errors(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.level == Level::ERROR)
            .cloned()
            .collect()
    }

    pub fn all(&self) -> Vec<CapturedEvent> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

struct FieldVisitor(HashMap<String, String>);

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.0
            .insert(field.name().to_string(), format!("{value:?}"));
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor(HashMap::new());
        event.record(&mut visitor);

        self.events.lock().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            fields: visitor.0,
        });
    }
}
