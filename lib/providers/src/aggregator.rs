//! Fan-out search across every configured provider.

use ahash::AHashSet;
use futures_util::future::join_all;
use looq_core::{GarmentPrediction, Product};
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::amazon::{AmazonCredentials, AmazonProvider};
use crate::error::ProviderError;
use crate::provider::{ProductProvider, ProviderResult};
use crate::zalando::ZalandoProvider;

/// Sort key for listings without a price
const UNPRICED_SORT_KEY: f64 = 999_999.0;

pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Credentials and limits used to build the default provider set
#[derive(Debug, Clone)]
pub struct ProvidersConfig {
    pub amazon: AmazonCredentials,
    pub zalando_api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            amazon: AmazonCredentials::default(),
            zalando_api_key: None,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }
}

/// Queries all providers concurrently and merges their listings
#[derive(Clone)]
pub struct ProductAggregator {
    providers: Vec<Arc<dyn ProductProvider>>,
    timeout: Duration,
}

impl ProductAggregator {
    pub fn new(providers: Vec<Arc<dyn ProductProvider>>, timeout: Duration) -> Self {
        Self { providers, timeout }
    }

    /// Amazon followed by Zalando
    pub fn from_config(config: ProvidersConfig) -> Self {
        let providers: Vec<Arc<dyn ProductProvider>> = vec![
            Arc::new(AmazonProvider::new(config.amazon)),
            Arc::new(ZalandoProvider::new(config.zalando_api_key)),
        ];
        info!("Initialized {} product providers", providers.len());
        Self::new(providers, config.timeout)
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn search_one(
        &self,
        provider: &Arc<dyn ProductProvider>,
        prediction: &GarmentPrediction,
        limit: usize,
    ) -> ProviderResult<Vec<Product>> {
        match tokio::time::timeout(self.timeout, provider.search_products(prediction, limit)).await
        {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                provider: provider.name().to_string(),
                millis: self.timeout.as_millis() as u64,
            }),
        }
    }

    /// Search every provider and return at most `limit` unique listings,
    /// cheapest first.
    ///
    /// A failing or slow provider only removes its own listings from the
    /// result.
    pub async fn search_products(
        &self,
        prediction: &GarmentPrediction,
        limit: usize,
    ) -> Vec<Product> {
        let searches = self
            .providers
            .iter()
            .map(|provider| self.search_one(provider, prediction, limit));
        let results = join_all(searches).await;

        let mut seen = AHashSet::new();
        let mut products = Vec::new();
        for (provider, result) in self.providers.iter().zip(results) {
            match result {
                Ok(listings) => {
                    debug!("{} returned {} listings", provider.name(), listings.len());
                    products.extend(
                        listings
                            .into_iter()
                            .filter(|p| seen.insert(p.identity_key())),
                    );
                }
                Err(e) => warn!("Provider {} failed: {}", provider.name(), e),
            }
        }

        products.sort_by(|a, b| {
            let pa = a.price.unwrap_or(UNPRICED_SORT_KEY);
            let pb = b.price.unwrap_or(UNPRICED_SORT_KEY);
            pa.partial_cmp(&pb).unwrap_or(Ordering::Equal)
        });
        products.truncate(limit);

        info!(
            "Aggregated {} products for {}",
            products.len(),
            prediction.category
        );
        products
    }

    pub async fn get_product(&self, provider: &str, product_id: &str) -> ProviderResult<Product> {
        let provider = self
            .providers
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(provider))
            .ok_or_else(|| ProviderError::UnknownProvider(provider.to_string()))?;
        provider.get_product(product_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use looq_core::GarmentCategory;

    struct StaticProvider {
        name: &'static str,
        listings: Vec<(&'static str, Option<f64>)>,
        delay: Option<Duration>,
        fail: bool,
    }

    impl StaticProvider {
        fn new(name: &'static str, listings: Vec<(&'static str, Option<f64>)>) -> Self {
            Self {
                name,
                listings,
                delay: None,
                fail: false,
            }
        }
    }

    #[async_trait]
    impl ProductProvider for StaticProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn search_products(
            &self,
            prediction: &GarmentPrediction,
            limit: usize,
        ) -> ProviderResult<Vec<Product>> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(ProviderError::Upstream {
                    provider: self.name.to_string(),
                    message: "503".to_string(),
                });
            }
            Ok(self
                .listings
                .iter()
                .take(limit)
                .map(|(name, price)| {
                    let mut p = Product::new(self.name, *name, prediction.category.as_str());
                    p.price = *price;
                    p
                })
                .collect())
        }

        async fn get_product(&self, product_id: &str) -> ProviderResult<Product> {
            Ok(Product::new(self.name, product_id, "shirt"))
        }

        fn is_mock(&self) -> bool {
            true
        }
    }

    fn prediction() -> GarmentPrediction {
        GarmentPrediction::new(GarmentCategory::Shirt, 0.9)
    }

    #[tokio::test]
    async fn test_merge_dedup_and_sort() {
        let a = StaticProvider::new(
            "a",
            vec![("Blue Shirt", Some(30.0)), ("blue shirt", Some(10.0)), ("Unpriced", None)],
        );
        let b = StaticProvider::new("b", vec![("Blue Shirt", Some(20.0)), ("Cheap", Some(5.0))]);
        let aggregator =
            ProductAggregator::new(vec![Arc::new(a), Arc::new(b)], Duration::from_secs(1));

        let products = aggregator.search_products(&prediction(), 10).await;
        let summary: Vec<(&str, &str)> = products
            .iter()
            .map(|p| (p.provider.as_str(), p.name.as_str()))
            .collect();

        // "blue shirt" from `a` collapses into the first listing
        assert_eq!(
            summary,
            vec![
                ("b", "Cheap"),
                ("b", "Blue Shirt"),
                ("a", "Blue Shirt"),
                ("a", "Unpriced"),
            ]
        );
    }

    #[tokio::test]
    async fn test_truncates_to_limit() {
        let a = StaticProvider::new("a", vec![("x", Some(3.0)), ("y", Some(1.0))]);
        let b = StaticProvider::new("b", vec![("z", Some(2.0))]);
        let aggregator =
            ProductAggregator::new(vec![Arc::new(a), Arc::new(b)], Duration::from_secs(1));

        let products = aggregator.search_products(&prediction(), 2).await;
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["y", "z"]);
    }

    #[tokio::test]
    async fn test_failing_provider_is_skipped() {
        let mut broken = StaticProvider::new("broken", vec![("never", Some(1.0))]);
        broken.fail = true;
        let ok = StaticProvider::new("ok", vec![("Shirt", Some(12.0))]);
        let aggregator =
            ProductAggregator::new(vec![Arc::new(broken), Arc::new(ok)], Duration::from_secs(1));

        let products = aggregator.search_products(&prediction(), 10).await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].provider, "ok");
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out() {
        let mut slow = StaticProvider::new("slow", vec![("late", Some(1.0))]);
        slow.delay = Some(Duration::from_secs(30));
        let fast = StaticProvider::new("fast", vec![("early", Some(2.0))]);
        let aggregator =
            ProductAggregator::new(vec![Arc::new(slow), Arc::new(fast)], Duration::from_millis(200));

        let products = aggregator.search_products(&prediction(), 10).await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "early");

        let err = aggregator
            .search_one(&aggregator.providers[0], &prediction(), 10)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProviderError::Timeout {
                provider: "slow".to_string(),
                millis: 200
            }
        );
    }

    #[tokio::test]
    async fn test_default_providers() {
        let aggregator = ProductAggregator::from_config(ProvidersConfig::default());
        assert_eq!(aggregator.provider_names(), vec!["amazon", "zalando"]);

        let products = aggregator.search_products(&prediction(), 20).await;
        assert_eq!(products.len(), 10);
        assert!(products
            .windows(2)
            .all(|w| w[0].price.unwrap() <= w[1].price.unwrap()));
        assert_eq!(products[0].provider, "amazon");
    }

    #[tokio::test]
    async fn test_get_product_routing() {
        let aggregator = ProductAggregator::from_config(ProvidersConfig::default());
        assert!(matches!(
            aggregator.get_product("ebay", "1").await,
            Err(ProviderError::UnknownProvider(_))
        ));
        assert!(matches!(
            aggregator.get_product("Amazon", "1").await,
            Err(ProviderError::Unsupported { .. })
        ));
    }
}
