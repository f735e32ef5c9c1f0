//! Core trait for e-commerce product providers.

use async_trait::async_trait;
use looq_core::{GarmentPrediction, Product};

use crate::error::ProviderError;

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Upper bound on listings any single mock search returns
pub const MOCK_RESULTS_CAP: usize = 5;

/// A catalog of purchasable products behind an external API
#[async_trait]
pub trait ProductProvider: Send + Sync {
    /// Provider identifier, stored in `Product::provider`.
    fn name(&self) -> &str;

    /// Search listings matching a garment prediction.
    async fn search_products(
        &self,
        prediction: &GarmentPrediction,
        limit: usize,
    ) -> ProviderResult<Vec<Product>>;

    /// Look up a single listing by the provider's own identifier.
    async fn get_product(&self, product_id: &str) -> ProviderResult<Product>;

    /// Whether listings are generated locally instead of fetched.
    fn is_mock(&self) -> bool;
}
