//! Zalando partner API provider.

use async_trait::async_trait;
use looq_core::{GarmentPrediction, Product};
use tracing::{info, warn};

use crate::error::ProviderError;
use crate::provider::{ProductProvider, ProviderResult, MOCK_RESULTS_CAP};

pub const PROVIDER_NAME: &str = "zalando";

pub struct ZalandoProvider {
    mock_mode: bool,
}

impl ZalandoProvider {
    pub fn new(api_key: Option<String>) -> Self {
        let mock_mode = api_key.as_deref().map_or(true, str::is_empty);
        if mock_mode {
            warn!("Zalando API key not configured - provider will return mock data");
        }
        Self { mock_mode }
    }

    fn mock_search(&self, prediction: &GarmentPrediction, limit: usize) -> Vec<Product> {
        info!("Mock Zalando search for {}", prediction.category);

        let category = prediction.category.as_str();
        let title = prediction.category.display_title();

        (0..limit.min(MOCK_RESULTS_CAP))
            .map(|i| {
                let n = i + 1;
                let mut product = Product::new(
                    PROVIDER_NAME,
                    format!(
                        "{} {} - Zalando Mock {}",
                        title,
                        prediction.color.as_deref().unwrap_or("Style"),
                        n
                    ),
                    category,
                );
                product.external_id = Some(format!("zalando-mock-{}", n));
                product.description = Some(format!("Trendy {} from Zalando", category));
                product.price = Some(39.99 + i as f64 * 15.0);
                product.image_url =
                    format!("https://via.placeholder.com/300?text=Zalando+{}", category);
                product.product_url = format!("https://zalando.com/mock-product-{}", n);
                product.attributes.color = prediction.color.clone();
                product.attributes.pattern = prediction.pattern.clone();
                product.attributes.brand = Some(format!("Brand{}", n));
                product
            })
            .collect()
    }
}

#[async_trait]
impl ProductProvider for ZalandoProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn search_products(
        &self,
        prediction: &GarmentPrediction,
        limit: usize,
    ) -> ProviderResult<Vec<Product>> {
        Ok(self.mock_search(prediction, limit))
    }

    async fn get_product(&self, _product_id: &str) -> ProviderResult<Product> {
        Err(ProviderError::Unsupported {
            provider: PROVIDER_NAME.to_string(),
            operation: "product lookup",
        })
    }

    fn is_mock(&self) -> bool {
        self.mock_mode
    }
}
