//! # LOOQ
//!
//! Fashion recognition backend: turns a garment photo into a prediction,
//! finds matching products across shops and composes outfits around them.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! looq --port 8000 --data-dir ./data
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use looq::prelude::*;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(ProductCatalog::new(CatalogConfig::default()));
//! let search = VisualSearch::new(Arc::new(ColorHistogramEmbedder::new()), catalog.clone()).unwrap();
//! let recognizer = GarmentRecognizer::new(search, Arc::new(PrototypeClassifier::from_catalog(&catalog)));
//!
//! let bytes = std::fs::read("shirt.jpg").unwrap();
//! let image = looq::vision::decode_image(&bytes).unwrap();
//! let recognition = recognizer.recognize(&image).unwrap();
//! println!("{} ({:.2})", recognition.prediction.category, recognition.prediction.confidence);
//! ```
//!
//! ## Crate Structure
//!
//! - `looq-core` - Garment taxonomy, products, vector math and catalog search
//! - `looq-vision` - Image embeddings, classification and visual search
//! - `looq-providers` - Shop providers and the concurrent aggregator
//! - `looq-styling` - Outfit engine and look suggestions
//! - `looq-storage` - Catalog snapshots
//! - `looq-api` - actix-web REST API

pub mod logging;

// Re-export core types
pub use looq_core::{
    CatalogConfig, CategoryGroup, Distance, Error, Filter, FilterCondition, GarmentCategory,
    GarmentPrediction, OutfitItem, OutfitRecommendation, Product, ProductAttributes,
    ProductCatalog, ProductFilter, ProductId, Result, ScoredProduct, Season, Vector,
};

// Re-export vision
pub use looq_vision::{
    ColorHistogramEmbedder, FixedClassifier, GarmentClassifier, GarmentRecognizer,
    ImageEmbedder, PrototypeClassifier, Recognition, VisionError, VisualSearch,
};

// Re-export providers, styling and storage
pub use looq_providers::{ProductAggregator, ProductProvider, ProviderError, ProvidersConfig};
pub use looq_storage::{CatalogStore, StorageError};
pub use looq_styling::{suggest_looks, LookSuggestion, OutfitEngine};

// Re-export API
pub use looq_api::{AppState, RestApi, Settings};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CatalogConfig, CatalogStore, ColorHistogramEmbedder, Distance, GarmentCategory,
        GarmentPrediction, GarmentRecognizer, OutfitEngine, Product, ProductAggregator,
        ProductCatalog, PrototypeClassifier, RestApi, Settings, VisualSearch,
    };
}

/// Image decoding and embedding helpers
pub mod vision {
    pub use looq_vision::{decode_image, dominant_color};
    #[cfg(feature = "clip")]
    pub use looq_vision::{ClipConfig, ClipEmbedder};
}
