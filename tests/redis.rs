#![cfg(feature = "redis-table")]

mod common;

#[cfg(test)]
mod tests {
    use super::*;

    use common::*;
    use fred::interfaces::{ClientLike, LuaInterface};
    use fred::clients::Client;
    use sessiontable::table::redis::RedisTable;
    use sessiontable::table::{Item, ItemKey, TableClient};
    use sessiontable::{ReadOutcome, SessionHandler, TableSessionStore};
    use std::sync::Arc;

    async fn setup_table() -> Arc<RedisTable<Client>> {
        let client = Client::default();
        client.connect();
        client.wait_for_connect().await.unwrap();
        Arc::new(RedisTable::new(Arc::new(client)))
    }

    fn unique_id(name: &str) -> String {
        format!("{name}-{}", std::process::id())
    }

    #[tokio::test]
    async fn test_item_operations() {
        let table = setup_table().await;
        let key = ItemKey::new("ID", unique_id("item"));

        assert!(table.get_item(TABLE, &key).await.unwrap().is_none());

        let item = Item::new(key.clone())
            .with_attribute("Data", "user_id=42")
            .with_attribute("Extra", "x");
        table.put_item(TABLE, &item).await.unwrap();
        assert_eq!(table.get_item(TABLE, &key).await.unwrap(), Some(item));

        // A put replaces every attribute
        let replacement = Item::new(key.clone());
        table.put_item(TABLE, &replacement).await.unwrap();
        assert_eq!(
            table.get_item(TABLE, &key).await.unwrap(),
            Some(replacement)
        );

        table.delete_item(TABLE, &key).await.unwrap();
        assert!(table.get_item(TABLE, &key).await.unwrap().is_none());

        // Deleting again is fine
        table.delete_item(TABLE, &key).await.unwrap();
    }

    #[tokio::test]
    async fn test_put_item_survives_script_flush() {
        let table = setup_table().await;
        let key = ItemKey::new("ID", unique_id("flush"));

        let first = Item::new(key.clone()).with_attribute("Data", "before");
        table.put_item(TABLE, &first).await.unwrap();

        // The server forgets every cached script, as after a restart
        let _: () = table.client().script_flush(false).await.unwrap();

        let second = Item::new(key.clone()).with_attribute("Data", "after");
        table.put_item(TABLE, &second).await.unwrap();
        assert_eq!(table.get_item(TABLE, &key).await.unwrap(), Some(second));

        // A fresh table on the same server loads the script on its own
        let other = setup_table().await;
        let _: () = other.client().script_flush(false).await.unwrap();
        let third = Item::new(key.clone()).with_attribute("Data", "other");
        other.put_item(TABLE, &third).await.unwrap();
        assert_eq!(table.get_item(TABLE, &key).await.unwrap(), Some(third));

        table.delete_item(TABLE, &key).await.unwrap();
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let table = setup_table().await;
        let store = TableSessionStore::new(table, build_config(PREFIX));
        let id = unique_id("sess");

        assert_eq!(store.read(&id).await, ReadOutcome::Empty);

        assert!(store.write(&id, "user_id=42").await);
        assert_eq!(
            store.read(&id).await,
            ReadOutcome::Data("user_id=42".to_string())
        );

        assert!(store.write(&id, "user_id=43").await);
        assert_eq!(
            store.read(&id).await,
            ReadOutcome::Data("user_id=43".to_string())
        );

        assert!(store.write(&id, "").await);
        assert_eq!(store.read(&id).await, ReadOutcome::Empty);

        assert!(store.destroy(&id).await);
        assert!(store.destroy(&id).await);
        assert_eq!(store.read(&id).await, ReadOutcome::Empty);
    }
}
