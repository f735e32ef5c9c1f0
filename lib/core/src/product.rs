use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::garment::GarmentCategory;

/// Identifier of a product, stable across providers and the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub Uuid);

impl ProductId {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for ProductId {
    fn from(u: Uuid) -> Self {
        ProductId(u)
    }
}

impl FromStr for ProductId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(ProductId)
    }
}

/// Descriptive attributes a provider attaches to a listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, String>,
}

fn default_currency() -> String {
    "EUR".to_string()
}

/// A product listing, either from a provider or stored in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: ProductId,
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub product_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliate_link: Option<String>,
    pub category: String,
    #[serde(default)]
    pub attributes: ProductAttributes,
    /// Feature embedding; omitted from API responses
    #[serde(default, skip_serializing)]
    pub embedding: Option<Vec<f32>>,
}

impl Product {
    /// Create a product with the required fields; everything else defaults
    pub fn new(provider: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: ProductId::new(),
            provider: provider.into(),
            external_id: None,
            name: name.into(),
            description: None,
            price: None,
            currency: default_currency(),
            image_url: String::new(),
            product_url: String::new(),
            affiliate_link: None,
            category: category.into(),
            attributes: ProductAttributes::default(),
            embedding: None,
        }
    }

    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.attributes.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Parsed category, if it belongs to the known taxonomy
    pub fn category_kind(&self) -> Option<GarmentCategory> {
        self.category.parse().ok()
    }

    /// Key used to collapse the same listing returned twice
    pub fn identity_key(&self) -> (String, String) {
        (self.name.to_lowercase(), self.provider.clone())
    }

    #[inline]
    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }
}
