//! Amazon Product Advertising API provider.

use async_trait::async_trait;
use looq_core::{GarmentPrediction, Product};
use tracing::{info, warn};

use crate::error::ProviderError;
use crate::provider::{ProductProvider, ProviderResult, MOCK_RESULTS_CAP};

pub const PROVIDER_NAME: &str = "amazon";

/// Credentials for the Product Advertising API.
#[derive(Debug, Clone, Default)]
pub struct AmazonCredentials {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub associate_tag: Option<String>,
}

impl AmazonCredentials {
    fn is_complete(&self) -> bool {
        [&self.access_key, &self.secret_key, &self.associate_tag]
            .iter()
            .all(|v| v.as_deref().is_some_and(|s| !s.is_empty()))
    }
}

pub struct AmazonProvider {
    credentials: AmazonCredentials,
    mock_mode: bool,
}

impl AmazonProvider {
    pub fn new(credentials: AmazonCredentials) -> Self {
        let mock_mode = !credentials.is_complete();
        if mock_mode {
            warn!("Amazon API credentials not configured - provider will return mock data");
        }
        Self {
            credentials,
            mock_mode,
        }
    }

    fn associate_tag(&self) -> &str {
        self.credentials.associate_tag.as_deref().unwrap_or_default()
    }

    fn mock_search(&self, prediction: &GarmentPrediction, limit: usize) -> Vec<Product> {
        info!("Mock Amazon search for {}", prediction.category);

        let category = prediction.category.as_str();
        let title = prediction.category.display_title();
        let color = prediction.color.as_deref();

        (0..limit.min(MOCK_RESULTS_CAP))
            .map(|i| {
                let n = i + 1;
                let url = format!("https://amazon.com/mock-product-{}", n);

                let mut product = Product::new(
                    PROVIDER_NAME,
                    format!("{} {} - Mock Product {}", title, color.unwrap_or("Classic"), n),
                    category,
                );
                product.external_id = Some(format!("mock-product-{}", n));
                product.description = Some(format!(
                    "High-quality {} in {}",
                    category,
                    color.unwrap_or("various colors")
                ));
                product.price = Some(29.99 + i as f64 * 10.0);
                product.image_url = format!("https://via.placeholder.com/300?text={}", category);
                product.affiliate_link = Some(format!("{}?tag={}", url, self.associate_tag()));
                product.product_url = url;
                product.attributes.color = prediction.color.clone();
                product.attributes.pattern = prediction.pattern.clone();
                product.attributes.style = prediction.style.clone();
                product
            })
            .collect()
    }
}

#[async_trait]
impl ProductProvider for AmazonProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn search_products(
        &self,
        prediction: &GarmentPrediction,
        limit: usize,
    ) -> ProviderResult<Vec<Product>> {
        // Live PA-API calls are out of scope; both modes serve generated listings.
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
