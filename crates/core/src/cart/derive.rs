//! Pure derivations over the cart entry sequence. Every state change in
//! [`super::CartView`] goes through these instead of tracking totals or flags
//! separately.

use std::collections::BTreeSet;

use rust_decimal::Decimal;

use crate::catalog::Catalog;
use crate::domain::product::{Product, ProductId};

/// Catalog products whose id is stored in the cart, in catalog order.
pub fn filter_entries(catalog: &Catalog, stored_ids: &BTreeSet<ProductId>) -> Vec<Product> {
    catalog.products().iter().filter(|product| stored_ids.contains(&product.id)).cloned().collect()
}

/// Sum of entry prices. Catalog prices are capped at
/// [`crate::catalog::MAX_PRICE`]; past that the sum saturates instead of
/// panicking.
pub fn total_cost(entries: &[Product]) -> Decimal {
    entries.iter().fold(Decimal::ZERO, |total, entry| total.saturating_add(entry.price))
}

pub fn purchase_disabled(entries: &[Product]) -> bool {
    entries.is_empty()
}

/// Highest price first. The sort is stable, so equal prices keep their
/// current relative order.
pub fn sorted_by_price_desc(entries: &[Product]) -> Vec<Product> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|left, right| right.price.cmp(&left.price));
    sorted
}
