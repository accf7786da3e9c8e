//! Cart view core: product catalog, cart store and notifier ports, and the
//! derivation logic that turns stored ids plus a catalog into a priced cart.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod notify;
pub mod store;

pub use cart::{CartSnapshot, CartView, EntryView, PurchaseReceipt};
pub use catalog::{Catalog, CatalogError, CatalogLoader, JsonCatalogLoader};
pub use domain::product::{Product, ProductId};
pub use errors::{ApplicationError, DomainError};
pub use notify::{InMemoryNotifier, Notification, NotificationKind, Notifier};
pub use store::{CartStore, CartStoreError, InMemoryCartStore};
