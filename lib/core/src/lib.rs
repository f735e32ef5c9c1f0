//! # LOOQ Core
//!
//! Core library for the LOOQ fashion recognition service.
//!
//! This crate provides the domain model and the retrieval primitives:
//!
//! - [`GarmentCategory`] - Garment taxonomy and outfit slot groups
//! - [`Product`] - A product listing with optional embedding
//! - [`OutfitRecommendation`] - A scored outfit bundle
//! - [`Vector`] - Dense embedding vector with distance helpers
//! - [`ProductCatalog`] - Exact nearest-neighbour search over product embeddings
//!
//! ## Example
//!
//! ```rust
//! use looq_core::{CatalogConfig, Distance, Product, ProductCatalog};
//!
//! let catalog = ProductCatalog::new(CatalogConfig { vector_dim: 3, distance: Distance::Cosine });
//!
//! let shirt = Product::new("catalog", "Oxford Shirt", "shirt").with_embedding(vec![1.0, 0.0, 0.0]);
//! catalog.upsert(shirt).unwrap();
//!
//! let results = catalog.search(&[0.9, 0.1, 0.0], 10, None).unwrap();
//! assert_eq!(results[0].product.name, "Oxford Shirt");
//! ```

pub mod catalog;
pub mod error;
pub mod filter;
pub mod garment;
pub mod outfit;
pub mod product;
pub mod vector;

pub use catalog::{CatalogConfig, Distance, ProductCatalog, ScoredProduct, DEFAULT_VECTOR_DIM};
pub use error::{Error, Result};
pub use filter::{Filter, FilterCondition, ProductFilter};
pub use garment::{CategoryGroup, GarmentCategory, GarmentPrediction};
pub use outfit::{OutfitItem, OutfitRecommendation, Season};
pub use product::{Product, ProductAttributes, ProductId};
pub use vector::Vector;
