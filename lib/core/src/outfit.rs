use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::product::{Product, ProductId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// Northern-hemisphere meteorological season for a month in `1..=12`
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Fall,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product as it appears inside an outfit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutfitItem {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub image_url: String,
    pub price: Option<f64>,
    pub product_url: String,
}

impl From<&Product> for OutfitItem {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            category: product.category.clone(),
            image_url: product.image_url.clone(),
            price: product.price,
            product_url: product.product_url.clone(),
        }
    }
}

/// A scored multi-item outfit bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutfitRecommendation {
    pub id: Uuid,
    pub items: Vec<OutfitItem>,
    pub occasion: String,
    pub season: Season,
    pub total_price: f64,
    pub compatibility_score: f32,
    pub description: String,
}
