//! # sessiontable: server-side sessions in a remote key-value table
//!
//! `sessiontable` persists server-side session state in a remote key-value
//! table instead of local files or memory. The host framework hands it a
//! session id and an opaque payload; it reads, writes and deletes one table
//! item per session, keyed by `prefix + session_id`.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use sessiontable::{SessionConfig, SessionHandler, TableSessionStore};
//! use sessiontable::table::MemoryTable;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = SessionConfig::builder("sessions")
//!     // The key prefix is derived from the application id unless set explicitly.
//!     .app_id("storefront")
//!     .build()
//!     .unwrap();
//!
//! let store = TableSessionStore::new(Arc::new(MemoryTable::new()), config);
//!
//! assert!(store.uses_custom_storage());
//! assert!(store.write("sess123", "user_id=42").await);
//!
//! let payload = store.read("sess123").await.unwrap_or_empty();
//! assert_eq!(payload, "user_id=42");
//! # }
//! ```
//!
//! # Operations
//!
//! The [`SessionHandler`] methods never fail loudly. A failed request is
//! logged once on the `sessiontable` tracing target and reported as
//! [`ReadOutcome::Failed`] or `false`:
//!
//! - `read` returns [`ReadOutcome::Data`], [`ReadOutcome::Empty`] for a missing
//!   record or payload, and [`ReadOutcome::Failed`] when the table errors.
//! - `write` fully replaces the record. An empty payload stores the record
//!   without its data attribute.
//! - `destroy` deletes the record. Destroying an unknown session succeeds.
//!
//! Callers wanting the error itself use [`TableSessionStore::try_read`],
//! [`TableSessionStore::try_write`] and [`TableSessionStore::try_destroy`].
//!
//! # Tables
//!
//! ## Redis
//!
//! Requires the `redis-table` feature. Each item is a Redis Hash at
//! `{table}:{key}`.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fred::clients::Client;
//! use fred::interfaces::ClientLike;
//! use sessiontable::table::redis::RedisTable;
//!
//! let client = Client::default();
//! client.init().await?;
//! let table = RedisTable::new(Arc::new(client));
//! ```
//!
//! ## Postgres
//!
//! Requires the `postgres-table` feature. Each item is a set of
//! `(item_key, attribute, value)` rows.
//!
//! ```rust,ignore
//! use sqlx::PgPool;
//! use sessiontable::table::postgres::PostgresTableBuilder;
//!
//! let pool = PgPool::connect(&database_url).await?;
//! let table = PostgresTableBuilder::new(pool, true)
//!     // .schema_name("my_app")
//!     .build()
//!     .await?;
//! ```
//!
//! ## Memory
//!
//! [`table::MemoryTable`] keeps items in process memory. Use it for tests only.
//!
//! # Configuration
//!
//! [`SessionConfig`] can also be deserialized from application settings:
//!
//! ```json
//! { "table_name": "sessions", "id_column": "ID", "data_column": "Data", "key_prefix": "ab12c" }
//! ```
//!
//! ## Sharing a table
//!
//! Applications sharing one table must use distinct key prefixes. Give each
//! application its own `app_id` or `key_prefix`.

/// The tracing target every diagnostic of this crate is emitted on.
pub const LOG_TARGET: &str = "sessiontable";

mod config;
pub use config::*;

mod handler;
pub use handler::*;

mod key;
pub use key::KeyPrefix;

mod store;
pub use store::{Error, TableSessionStore};

pub mod table;

#[cfg(feature = "redis-table")]
pub use fred;

#[cfg(feature = "postgres-table")]
pub use sqlx;
