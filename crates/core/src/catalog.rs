use std::fs;
use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::product::{Product, ProductId};
use crate::errors::DomainError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: serde_json::Error },
    #[error("could not parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Highest unit price a catalog may carry. Keeps any realistic number of
/// entries summable without leaving `Decimal` range.
// 1_000_000_000_000 = 0xE8_D4A5_1000 (`Decimal::new` is not const).
pub const MAX_PRICE: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Ordered product list. Order is significant: cart entries are derived in
/// catalog order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let products = serde_json::from_str::<Vec<Product>>(raw)?;
        let catalog = Self::new(products);
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        for product in &self.products {
            if product.price < Decimal::ZERO {
                return Err(DomainError::NegativePrice {
                    product_id: product.id.clone(),
                    price: product.price,
                });
            }
            if product.price > MAX_PRICE {
                return Err(DomainError::PriceAboveLimit {
                    product_id: product.id.clone(),
                    price: product.price,
                    limit: MAX_PRICE,
                });
            }
        }
        Ok(())
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

pub trait CatalogLoader: Send + Sync {
    fn load_catalog(&self) -> Result<Catalog, CatalogError>;
}

/// Reads the catalog from a JSON array of products on disk.
#[derive(Clone, Debug)]
pub struct JsonCatalogLoader {
    path: PathBuf,
}

impl JsonCatalogLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogLoader for JsonCatalogLoader {
    fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        let raw = fs::read_to_string(&self.path)
            .map_err(|source| CatalogError::ReadFile { path: self.path.clone(), source })?;

        let products = serde_json::from_str::<Vec<Product>>(&raw)
            .map_err(|source| CatalogError::ParseFile { path: self.path.clone(), source })?;

        let catalog = Catalog::new(products);
        catalog.validate()?;
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rust_decimal::Decimal;
    use tempfile::TempDir;

    use super::{Catalog, CatalogError, CatalogLoader, JsonCatalogLoader, MAX_PRICE};
    use crate::domain::product::ProductId;
    use crate::errors::DomainError;

    const CATALOG_JSON: &str = r#"[
        {"product_id": "p-1", "product_title": "Phone", "price": 10},
        {"product_id": "p-2", "product_title": "Laptop", "price": 30},
        {"product_id": "p-3", "product_title": "Watch", "price": 20}
    ]"#;

    #[test]
    fn from_json_preserves_order_and_finds_products() {
        let catalog = Catalog::from_json(CATALOG_JSON).expect("catalog");

        assert_eq!(catalog.len(), 3);
        let ids: Vec<&str> = catalog.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p-1", "p-2", "p-3"]);
        assert_eq!(
            catalog.find(&ProductId::from("p-2")).map(|p| p.price),
            Some(Decimal::new(30, 0))
        );
        assert!(catalog.find(&ProductId::from("missing")).is_none());
    }

    #[test]
    fn rejects_negative_prices() {
        let error = Catalog::from_json(r#"[{"id": "p-1", "title": "Broken", "price": -1}]"#)
            .expect_err("negative price should be rejected");

        assert!(matches!(
            error,
            CatalogError::Domain(DomainError::NegativePrice { ref product_id, .. })
                if product_id.as_str() == "p-1"
        ));
    }

    #[test]
    fn rejects_prices_above_the_limit_and_accepts_the_limit() {
        let error = Catalog::from_json(
            r#"[
                {"id": "p-1", "title": "Fine", "price": 5},
                {"id": "p-2", "title": "Huge", "price": "50000000000000000000000000000"}
            ]"#,
        )
        .expect_err("oversized price should be rejected");

        assert!(matches!(
            error,
            CatalogError::Domain(DomainError::PriceAboveLimit { ref product_id, limit, .. })
                if product_id.as_str() == "p-2" && limit == MAX_PRICE
        ));

        let at_limit = r#"[{"id": "p-1", "title": "Edge", "price": 1000000000000}]"#;
        let catalog = Catalog::from_json(at_limit).expect("price at the limit");
        assert_eq!(catalog.products()[0].price, MAX_PRICE);
    }

    #[test]
    fn numeric_ids_load_and_match_their_text_form() {
        let catalog = Catalog::from_json(
            r#"[{"id": 1, "title": "A", "price": 10}, {"id": 3, "title": "C", "price": 20}]"#,
        )
        .expect("numeric-id catalog");

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.find(&ProductId::from("3")).map(|p| p.price),
            Some(Decimal::new(20, 0))
        );
    }

    #[test]
    fn json_loader_reads_catalog_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("products.json");
        fs::write(&path, CATALOG_JSON).expect("write catalog");

        let catalog = JsonCatalogLoader::new(&path).load_catalog().expect("load catalog");

        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn json_loader_reports_missing_file_with_path() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("absent.json");

        let error = JsonCatalogLoader::new(&path).load_catalog().expect_err("missing file");

        assert!(matches!(error, CatalogError::ReadFile { .. }));
        assert!(error.to_string().contains("absent.json"));
    }

    #[test]
    fn json_loader_reports_malformed_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("products.json");
        fs::write(&path, "{not json").expect("write catalog");

        let error = JsonCatalogLoader::new(&path).load_catalog().expect_err("malformed file");

        assert!(matches!(error, CatalogError::ParseFile { .. }));
    }
}
