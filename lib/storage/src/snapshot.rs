//! On-disk snapshot records.
//!
//! bincode is not self-describing, so these mirror the catalog types
//! field for field without skipped, flattened or untyped values.

use looq_core::{Product, ProductAttributes, ProductId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub version: u32,
    pub vector_dim: usize,
    pub distance: String,
    pub products: Vec<ProductRecord>,
    pub created_at: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: [u8; 16],
    pub provider: String,
    pub external_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub currency: String,
    pub image_url: String,
    pub product_url: String,
    pub affiliate_link: Option<String>,
    pub category: String,
    pub color: Option<String>,
    pub pattern: Option<String>,
    pub style: Option<String>,
    pub brand: Option<String>,
    pub extra: Vec<(String, String)>,
    pub embedding: Option<Vec<f32>>,
}

impl From<&Product> for ProductRecord {
    fn from(p: &Product) -> Self {
        Self {
            id: *p.id.0.as_bytes(),
            provider: p.provider.clone(),
            external_id: p.external_id.clone(),
            name: p.name.clone(),
            description: p.description.clone(),
            price: p.price,
            currency: p.currency.clone(),
            image_url: p.image_url.clone(),
            product_url: p.product_url.clone(),
            affiliate_link: p.affiliate_link.clone(),
            category: p.category.clone(),
            color: p.attributes.color.clone(),
            pattern: p.attributes.pattern.clone(),
            style: p.attributes.style.clone(),
            brand: p.attributes.brand.clone(),
            extra: p
                .attributes
                .extra
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            embedding: p.embedding.clone(),
        }
    }
}

impl From<ProductRecord> for Product {
    fn from(r: ProductRecord) -> Self {
        Product {
            id: ProductId(Uuid::from_bytes(r.id)),
            provider: r.provider,
            external_id: r.external_id,
            name: r.name,
            description: r.description,
            price: r.price,
            currency: r.currency,
            image_url: r.image_url,
            product_url: r.product_url,
            affiliate_link: r.affiliate_link,
            category: r.category,
            attributes: ProductAttributes {
                color: r.color,
                pattern: r.pattern,
                style: r.style,
                brand: r.brand,
                extra: r.extra.into_iter().collect::<BTreeMap<_, _>>(),
            },
            embedding: r.embedding,
        }
    }
}
