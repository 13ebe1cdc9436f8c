mod lua;

use crate::table::redis::lua::PUT_ITEM_SCRIPT;
use crate::table::{Error, Item, ItemKey, TableClient};
use fred::clients::Pool;
use fred::interfaces::{HashesInterface, KeysInterface};
use fred::prelude::LuaInterface;
use std::collections::HashMap;
use std::{fmt::Debug, sync::Arc};

/// A redis table client.
///
/// Each item is a Redis Hash stored at `{table}:{key}`, one hash field per
/// attribute. Writes replace the whole hash atomically through a Lua script
/// invoked by hash, reloaded whenever the server has lost it.
#[derive(Clone, Debug)]
pub struct RedisTable<C: HashesInterface + KeysInterface + LuaInterface + Clone + Send + Sync = Pool>
{
    client: Arc<C>,
    put_item_hash: Arc<str>,
}

impl<C> RedisTable<C>
where
    C: HashesInterface + KeysInterface + LuaInterface + Clone + Send + Sync,
{
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            put_item_hash: fred::util::sha1_hash(PUT_ITEM_SCRIPT).into(),
        }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }
}

// The server answers `NOSCRIPT` after a restart, failover or `SCRIPT FLUSH`.
fn is_noscript(err: &fred::error::Error) -> bool {
    err.details().contains("NOSCRIPT")
}

#[inline]
fn redis_key(table: &str, key: &ItemKey) -> String {
    format!("{table}:{}", key.value())
}

impl<C> TableClient for RedisTable<C>
where
    C: HashesInterface + KeysInterface + LuaInterface + Clone + Send + Sync + 'static,
{
    async fn get_item(&self, table: &str, key: &ItemKey) -> Result<Option<Item>, Error> {
        let fields = self
            .client
            .hgetall::<HashMap<String, String>, _>(redis_key(table, key))
            .await?;

        if fields.is_empty() {
            return Ok(None);
        }

        Ok(Some(Item::from_attributes(key.attribute(), fields)?))
    }

    async fn put_item(&self, table: &str, item: &Item) -> Result<(), Error> {
        let key = redis_key(table, item.key());

        let mut args: Vec<String> = Vec::with_capacity(item.len() * 2);
        for (name, value) in item.attributes() {
            args.push(name.to_string());
            args.push(value.to_string());
        }

        let hash = &*self.put_item_hash;
        let result: Result<i64, _> = self
            .client
            .evalsha(hash, vec![key.clone()], args.clone())
            .await;

        match result {
            Err(err) if is_noscript(&err) => {
                tracing::debug!(target: crate::LOG_TARGET, "reloading put_item script");
                let _: () = self.client.script_load(PUT_ITEM_SCRIPT).await?;
                let _: i64 = self.client.evalsha(hash, vec![key], args).await?;
            }
            result => {
                result?;
            }
        }

        Ok(())
    }

    async fn delete_item(&self, table: &str, key: &ItemKey) -> Result<(), Error> {
        let _: i64 = self.client.del(redis_key(table, key)).await?;
        Ok(())
    }
}
