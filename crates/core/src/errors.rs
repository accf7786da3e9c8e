use rust_decimal::Decimal;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::domain::product::ProductId;
use crate::store::CartStoreError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("product `{product_id}` has a negative price ({price})")]
    NegativePrice { product_id: ProductId, price: Decimal },
    #[error("product `{product_id}` is priced above the {limit} limit ({price})")]
    PriceAboveLimit { product_id: ProductId, price: Decimal, limit: Decimal },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("catalog failure: {0}")]
    Catalog(String),
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<CatalogError> for ApplicationError {
    fn from(value: CatalogError) -> Self {
        match value {
            CatalogError::Domain(error) => Self::Domain(error),
            other => Self::Catalog(other.to_string()),
        }
    }
}

impl From<CartStoreError> for ApplicationError {
    fn from(value: CartStoreError) -> Self {
        Self::Persistence(value.to_string())
    }
}

impl ApplicationError {
    /// Stable machine-readable class for operator output.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(_) => "domain_validation",
            Self::Catalog(_) => "catalog_load",
            Self::Persistence(_) => "cart_store",
        }
    }
}
