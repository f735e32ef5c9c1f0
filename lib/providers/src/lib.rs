//! # looq-providers
//!
//! E-commerce product providers and the aggregator that queries them
//! concurrently.
//!
//! Every provider implements [`ProductProvider`]. Without credentials a
//! provider runs in mock mode and generates deterministic listings, which
//! keeps the full recognition-to-outfit flow usable offline.

pub mod aggregator;
pub mod amazon;
pub mod error;
pub mod provider;
pub mod zalando;

pub use aggregator::{ProductAggregator, ProvidersConfig, DEFAULT_PROVIDER_TIMEOUT};
pub use amazon::{AmazonCredentials, AmazonProvider};
pub use error::ProviderError;
pub use provider::{ProductProvider, ProviderResult, MOCK_RESULTS_CAP};
pub use zalando::ZalandoProvider;
