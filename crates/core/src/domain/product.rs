use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Product identifier. Storefronts hand out both string and integer ids, so
/// deserialization accepts either and keeps the decimal text of integers.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProductId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = match RawProductId::deserialize(deserializer)? {
            RawProductId::Text(text) => text,
            RawProductId::Signed(number) => number.to_string(),
            RawProductId::Unsigned(number) => number.to_string(),
        };
        Ok(Self(id))
    }
}

impl ProductId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A catalog product. Cart entries are full snapshots of this type, so the
/// view never has to go back to the catalog to render a line.
///
/// Deserialization also accepts the storefront field names
/// (`product_id`, `product_title`, `product_image`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(alias = "product_id")]
    pub id: ProductId,
    #[serde(alias = "product_title")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(alias = "product_image", default)]
    pub image_url: String,
}
