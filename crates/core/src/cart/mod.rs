pub mod derive;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::domain::product::{Product, ProductId};
use crate::notify::{Notification, Notifier};
use crate::store::{CartStore, CartStoreError};

/// What the confirmation dialog shows after a purchase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub total: Decimal,
    pub item_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryView {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
}

impl From<&Product> for EntryView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            description: product.description.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
        }
    }
}

/// Everything a presentation layer needs to draw the cart once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub entries: Vec<EntryView>,
    pub total: Decimal,
    pub purchase_disabled: bool,
    pub dialog: Option<PurchaseReceipt>,
}

/// In-memory cart state for one mounted view.
///
/// Entries are the only tracked state; the total and the purchase-disabled
/// flag are derived from them on every read. The store is read once on load
/// (and again on [`CartView::reload`]) and written point-wise on removal or
/// cleared entirely on purchase.
pub struct CartView<S, N> {
    store: S,
    notifier: N,
    entries: Vec<Product>,
    dialog: Option<PurchaseReceipt>,
}

impl<S, N> CartView<S, N>
where
    S: CartStore,
    N: Notifier,
{
    pub async fn load(catalog: &Catalog, store: S, notifier: N) -> Result<Self, CartStoreError> {
        let mut view = Self { store, notifier, entries: Vec::new(), dialog: None };
        view.reload(catalog).await?;
        Ok(view)
    }

    /// Re-derives entries against a new catalog. Any open dialog is dismissed.
    pub async fn reload(&mut self, catalog: &Catalog) -> Result<(), CartStoreError> {
        let stored_ids = self.store.get_cart_ids().await?;
        self.entries = derive::filter_entries(catalog, &stored_ids);
        self.dialog = None;

        info!(
            event_name = "cart.loaded",
            catalog_size = catalog.len(),
            stored_ids = stored_ids.len(),
            entries = self.entries.len(),
            total = %self.total(),
            "cart derived from catalog"
        );
        Ok(())
    }

    pub fn entries(&self) -> &[Product] {
        &self.entries
    }

    pub fn total(&self) -> Decimal {
        derive::total_cost(&self.entries)
    }

    pub fn purchase_disabled(&self) -> bool {
        derive::purchase_disabled(&self.entries)
    }

    pub fn dialog(&self) -> Option<&PurchaseReceipt> {
        self.dialog.as_ref()
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog.is_some()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sort_by_price(&mut self) {
        self.entries = derive::sorted_by_price_desc(&self.entries);
        debug!(event_name = "cart.sorted", entries = self.entries.len(), "sorted cart by price");
    }

    /// Removes `id` from the store, then every entry carrying it from the view.
    ///
    /// Returns how many entries were dropped; an id that is not in view is not
    /// an error. When the store call fails the entries are left untouched.
    pub async fn remove(&mut self, id: &ProductId) -> Result<usize, CartStoreError> {
        self.store.remove_cart_id(id).await?;

        let before = self.entries.len();
        self.entries.retain(|entry| &entry.id != id);
        let removed = before - self.entries.len();

        info!(
            event_name = "cart.entry_removed",
            product_id = %id,
            removed,
            total = %self.total(),
            "removed cart entry"
        );
        Ok(removed)
    }

    /// Appends `entry` to the view again. Duplicates are allowed and the store
    /// is not touched.
    pub fn add_back(&mut self, entry: Product) {
        let message = format!("{} has been added to your cart.", entry.title);
        let product_id = entry.id.clone();
        self.entries.push(entry);

        info!(
            event_name = "cart.entry_added_back",
            product_id = %product_id,
            entries = self.entries.len(),
            total = %self.total(),
            "added entry back to cart"
        );
        self.notifier.notify(Notification::success("Success!", message));
    }

    /// Empties the view and the whole persisted cart, then opens the
    /// confirmation dialog with the purchased total.
    ///
    /// Nothing guards against an empty cart here; callers that honor
    /// [`CartView::purchase_disabled`] never reach that case.
    pub async fn purchase(&mut self) -> Result<PurchaseReceipt, CartStoreError> {
        let receipt = PurchaseReceipt { total: self.total(), item_count: self.entries.len() };

        self.store.clear().await?;
        self.entries.clear();
        self.dialog = Some(receipt.clone());

        info!(
            event_name = "cart.purchased",
            item_count = receipt.item_count,
            total = %receipt.total,
            "cart purchased"
        );
        Ok(receipt)
    }

    pub fn close_dialog(&mut self) {
        if self.dialog.take().is_some() {
            debug!(event_name = "cart.dialog_closed", "purchase dialog closed");
        }
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            entries: self.entries.iter().map(EntryView::from).collect(),
            total: self.total(),
            purchase_disabled: self.purchase_disabled(),
            dialog: self.dialog.clone(),
        }
    }
}
