use crate::table::{Error, Item, ItemKey, TableClient};
use dashmap::DashSet;
use sqlx::PgPool;
use std::sync::Arc;

/// A builder for creating a `PostgresTable`.
///
/// This allows for placing the session tables in a custom schema.
#[derive(Debug)]
pub struct PostgresTableBuilder {
    pool: PgPool,
    create_tables: bool,
    schema_name: Option<String>,
}

impl PostgresTableBuilder {
    /// Creates a new builder with a database pool.
    ///
    /// When `create_tables` is set, every table is created on its first use.
    pub fn new(pool: PgPool, create_tables: bool) -> Self {
        Self {
            pool,
            create_tables,
            schema_name: None,
        }
    }

    /// Sets a custom schema name for the tables.
    pub fn schema_name(mut self, schema_name: impl Into<String>) -> Self {
        self.schema_name = Some(schema_name.into());
        self
    }

    /// Builds the `PostgresTable`, creating the schema if it doesn't exist.
    pub async fn build(self) -> Result<PostgresTable, sqlx::Error> {
        if self.create_tables {
            if let Some(schema) = &self.schema_name {
                sqlx::query(&format!("create schema if not exists {}", quote_ident(schema)))
                    .execute(&self.pool)
                    .await?;
            }
        }

        Ok(PostgresTable {
            pool: self.pool,
            create_tables: self.create_tables,
            schema_name: self.schema_name,
            ensured: Arc::new(DashSet::new()),
        })
    }
}

/// A Postgres-backed table client.
///
/// Every logical table is one relation holding a row per item attribute:
///
/// ```sql
/// create table "sessions" (
///     item_key text not null,
///     attribute text not null,
///     value text not null,
///     primary key (item_key, attribute)
/// );
/// ```
#[derive(Clone, Debug)]
pub struct PostgresTable {
    pool: PgPool,
    create_tables: bool,
    schema_name: Option<String>,
    ensured: Arc<DashSet<String>>,
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

impl PostgresTable {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn qualified_name(&self, table: &str) -> String {
        match &self.schema_name {
            Some(schema) => format!("{}.{}", quote_ident(schema), quote_ident(table)),
            None => quote_ident(table),
        }
    }

    /// Returns the qualified relation name, creating it first if needed.
    async fn relation(&self, table: &str) -> Result<String, Error> {
        let name = self.qualified_name(table);
        if !self.create_tables || self.ensured.contains(&name) {
            return Ok(name);
        }

        sqlx::raw_sql(&format!(
            r#"
            create table if not exists {name} (
                item_key text not null,
                attribute text not null,
                value text not null,
                primary key (item_key, attribute)
            );
            "#
        ))
        .execute(&self.pool)
        .await?;

        self.ensured.insert(name.clone());
        Ok(name)
    }
}

impl TableClient for PostgresTable {
    async fn get_item(&self, table: &str, key: &ItemKey) -> Result<Option<Item>, Error> {
        let relation = self.relation(table).await?;
        let query = format!("select attribute, value from {relation} where item_key = $1");

        let rows: Vec<(String, String)> = sqlx::query_as(&query)
            .bind(key.value())
            .fetch_all(&self.pool)
            .await?;

        if rows.is_empty() {
            return Ok(None);
        }

        Ok(Some(Item::from_attributes(key.attribute(), rows)?))
    }

    async fn put_item(&self, table: &str, item: &Item) -> Result<(), Error> {
        let relation = self.relation(table).await?;
        let item_key = item.key().value();

        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!("delete from {relation} where item_key = $1"))
            .bind(item_key)
            .execute(&mut *tx)
            .await?;

        let insert = format!("insert into {relation} (item_key, attribute, value) values ($1, $2, $3)");
        for (name, value) in item.attributes() {
            sqlx::query(&insert)
                .bind(item_key)
                .bind(name)
                .bind(value)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_item(&self, table: &str, key: &ItemKey) -> Result<(), Error> {
        let relation = self.relation(table).await?;

        sqlx::query(&format!("delete from {relation} where item_key = $1"))
            .bind(key.value())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
