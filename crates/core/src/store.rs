use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::product::ProductId;

#[derive(Debug, Error)]
pub enum CartStoreError {
    #[error("cart store backend error: {0}")]
    Backend(String),
    #[error("cart store decode error: {0}")]
    Decode(String),
}

/// Persistence boundary for the set of product ids a shopper has put in the cart.
///
/// Implementations treat ids as a set: adding a present id and removing an
/// absent id are both no-ops.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn get_cart_ids(&self) -> Result<BTreeSet<ProductId>, CartStoreError>;
    async fn add_cart_id(&self, id: &ProductId) -> Result<(), CartStoreError>;
    async fn remove_cart_id(&self, id: &ProductId) -> Result<(), CartStoreError>;
    /// Drops the whole stored cart, not just the ids currently in view.
    async fn clear(&self) -> Result<(), CartStoreError>;
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryCartStore {
    ids: Arc<Mutex<BTreeSet<ProductId>>>,
}

impl InMemoryCartStore {
    pub fn with_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = ProductId>,
    {
        Self { ids: Arc::new(Mutex::new(ids.into_iter().collect())) }
    }

    pub fn ids(&self) -> BTreeSet<ProductId> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeSet<ProductId>> {
        match self.ids.lock() {
            Ok(ids) => ids,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn get_cart_ids(&self) -> Result<BTreeSet<ProductId>, CartStoreError> {
        Ok(self.ids())
    }

    async fn add_cart_id(&self, id: &ProductId) -> Result<(), CartStoreError> {
        self.lock().insert(id.clone());
        Ok(())
    }

    async fn remove_cart_id(&self, id: &ProductId) -> Result<(), CartStoreError> {
        self.lock().remove(id);
        Ok(())
    }

    async fn clear(&self) -> Result<(), CartStoreError> {
        self.lock().clear();
        Ok(())
    }
}
