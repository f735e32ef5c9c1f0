//! # LOOQ Vision
//!
//! Turns garment photos into embeddings and predictions.
//!
//! - [`ImageEmbedder`] - image to normalized feature vector
//!   ([`ColorHistogramEmbedder`], or `ClipEmbedder` with the `clip` feature)
//! - [`GarmentClassifier`] - embedding to garment category
//! - [`VisualSearch`] - nearest catalog products for an image
//! - [`GarmentRecognizer`] - the full photo to prediction pipeline

pub mod classifier;
#[cfg(feature = "clip")]
pub mod clip;
pub mod embedder;
pub mod error;
pub mod imaging;
pub mod recognizer;
pub mod visual_search;

pub use classifier::{Classification, FixedClassifier, GarmentClassifier, PrototypeClassifier};
#[cfg(feature = "clip")]
pub use clip::{ClipConfig, ClipEmbedder};
pub use embedder::{ColorHistogramEmbedder, ImageEmbedder, HISTOGRAM_DIM};
pub use error::{Result, VisionError};
pub use imaging::{decode_image, dominant_color};
pub use recognizer::{GarmentRecognizer, Recognition, DEFAULT_SIMILAR_LIMIT};
pub use visual_search::VisualSearch;

pub use image::DynamicImage;
