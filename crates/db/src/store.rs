use std::collections::BTreeSet;

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, Transaction};
use tracing::debug;

use cartview_core::domain::product::ProductId;
use cartview_core::store::{CartStore, CartStoreError};

use crate::DbPool;

/// Cart store backed by a single JSON array blob in `kv_store`.
///
/// The blob keeps insertion order and never holds the same id twice. Clearing
/// deletes the row, so a cleared cart and a never-used cart look the same.
pub struct SqlCartStore {
    pool: DbPool,
    storage_key: String,
}

impl SqlCartStore {
    pub fn new(pool: DbPool, storage_key: impl Into<String>) -> Self {
        Self { pool, storage_key: storage_key.into() }
    }

    async fn read_blob(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> Result<Vec<ProductId>, CartStoreError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(&self.storage_key)
            .fetch_optional(&mut **tx)
            .await
            .map_err(backend)?;
        decode_row(row)
    }

    async fn write_blob(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        ids: &[ProductId],
    ) -> Result<(), CartStoreError> {
        let raw = serde_json::to_string(ids).map_err(|e| CartStoreError::Decode(e.to_string()))?;

        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(&self.storage_key)
        .bind(raw)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut **tx)
        .await
        .map_err(backend)?;
        Ok(())
    }
}

fn backend(error: sqlx::Error) -> CartStoreError {
    CartStoreError::Backend(error.to_string())
}

/// A missing row is an empty cart. Ids may be stored as strings or integers.
fn decode_row(row: Option<SqliteRow>) -> Result<Vec<ProductId>, CartStoreError> {
    let Some(row) = row else {
        return Ok(Vec::new());
    };
    let raw: String = row.try_get("value").map_err(|e| CartStoreError::Decode(e.to_string()))?;
    serde_json::from_str::<Vec<ProductId>>(&raw).map_err(|error| {
        CartStoreError::Decode(format!("stored cart is not a JSON array of ids: {error}"))
    })
}

#[async_trait::async_trait]
impl CartStore for SqlCartStore {
    async fn get_cart_ids(&self) -> Result<BTreeSet<ProductId>, CartStoreError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(&self.storage_key)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        Ok(decode_row(row)?.into_iter().collect())
    }

    async fn add_cart_id(&self, id: &ProductId) -> Result<(), CartStoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;
        let mut ids = self.read_blob(&mut tx).await?;
        if ids.contains(id) {
            return Ok(());
        }

        ids.push(id.clone());
        self.write_blob(&mut tx, &ids).await?;
        tx.commit().await.map_err(backend)?;

        debug!(event_name = "cart_store.id_added", key = %self.storage_key, product_id = %id);
        Ok(())
    }

    async fn remove_cart_id(&self, id: &ProductId) -> Result<(), CartStoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;
        let mut ids = self.read_blob(&mut tx).await?;
        let before = ids.len();
        ids.retain(|stored| stored != id);
        if ids.len() == before {
            return Ok(());
        }

        self.write_blob(&mut tx, &ids).await?;
        tx.commit().await.map_err(backend)?;

        debug!(event_name = "cart_store.id_removed", key = %self.storage_key, product_id = %id);
        Ok(())
    }

    async fn clear(&self) -> Result<(), CartStoreError> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(&self.storage_key)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        debug!(event_name = "cart_store.cleared", key = %self.storage_key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use cartview_core::domain::product::ProductId;
    use cartview_core::store::{CartStore, CartStoreError};

    use cartview_core::config::DatabaseConfig;

    use super::SqlCartStore;
    use crate::{connect, migrations, DbPool};

    async fn setup() -> DbPool {
        let database = DatabaseConfig {
            url: "sqlite::memory:".to_owned(),
            max_connections: 1,
            timeout_secs: 30,
        };
        let pool = connect(&database).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        pool
    }

    async fn raw_value(pool: &DbPool, key: &str) -> Option<String> {
        sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await
            .expect("query kv_store")
            .map(|row| row.get::<String, _>("value"))
    }

    #[tokio::test]
    async fn empty_store_reads_as_empty_set() {
        let store = SqlCartStore::new(setup().await, "cart-item");

        let ids = store.get_cart_ids().await.expect("read");

        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn add_keeps_insertion_order_without_duplicates() {
        let pool = setup().await;
        let store = SqlCartStore::new(pool.clone(), "cart-item");

        store.add_cart_id(&ProductId::from("b")).await.expect("add b");
        store.add_cart_id(&ProductId::from("a")).await.expect("add a");
        store.add_cart_id(&ProductId::from("b")).await.expect("add b again");

        assert_eq!(raw_value(&pool, "cart-item").await.as_deref(), Some(r#"["b","a"]"#));
        assert_eq!(store.get_cart_ids().await.expect("read").len(), 2);
    }

    #[tokio::test]
    async fn remove_drops_only_that_id_and_ignores_absent_ids() {
        let store = SqlCartStore::new(setup().await, "cart-item");
        store.add_cart_id(&ProductId::from("1")).await.expect("add 1");
        store.add_cart_id(&ProductId::from("3")).await.expect("add 3");

        store.remove_cart_id(&ProductId::from("3")).await.expect("remove 3");
        store.remove_cart_id(&ProductId::from("9")).await.expect("remove absent");

        let ids = store.get_cart_ids().await.expect("read");
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![ProductId::from("1")]);
    }

    #[tokio::test]
    async fn clear_removes_the_whole_key() {
        let pool = setup().await;
        let store = SqlCartStore::new(pool.clone(), "cart-item");
        store.add_cart_id(&ProductId::from("1")).await.expect("add");

        store.clear().await.expect("clear");

        assert_eq!(raw_value(&pool, "cart-item").await, None);
        assert!(store.get_cart_ids().await.expect("read").is_empty());
    }

    #[tokio::test]
    async fn storage_keys_are_isolated() {
        let pool = setup().await;
        let shop = SqlCartStore::new(pool.clone(), "cart-item");
        let other = SqlCartStore::new(pool.clone(), "wishlist");
        shop.add_cart_id(&ProductId::from("1")).await.expect("add to cart");
        other.add_cart_id(&ProductId::from("2")).await.expect("add to wishlist");

        shop.clear().await.expect("clear cart");

        assert!(shop.get_cart_ids().await.expect("read cart").is_empty());
        assert_eq!(other.get_cart_ids().await.expect("read wishlist").len(), 1);
    }

    #[tokio::test]
    async fn integer_ids_in_blob_read_and_remove_as_text() {
        let pool = setup().await;
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES ('cart-item', '[1,3]', 'now')",
        )
        .execute(&pool)
        .await
        .expect("seed numeric blob");
        let store = SqlCartStore::new(pool.clone(), "cart-item");

        let ids = store.get_cart_ids().await.expect("read numeric ids");
        assert_eq!(
            ids.into_iter().collect::<Vec<_>>(),
            vec![ProductId::from("1"), ProductId::from("3")]
        );

        store.remove_cart_id(&ProductId::from("3")).await.expect("remove 3");
        assert_eq!(raw_value(&pool, "cart-item").await.as_deref(), Some(r#"["1"]"#));
    }

    #[tokio::test]
    async fn malformed_blob_surfaces_decode_error() {
        let pool = setup().await;
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES ('cart-item', '{oops', 'now')",
        )
        .execute(&pool)
        .await
        .expect("seed malformed blob");
        let store = SqlCartStore::new(pool, "cart-item");

        let error = store.get_cart_ids().await.expect_err("decode failure");

        assert!(matches!(error, CartStoreError::Decode(_)));
    }
}
