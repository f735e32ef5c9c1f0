use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VisionError>;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Model file not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Embedder produces {embedder}-d vectors but the catalog expects {catalog}-d")]
    DimensionMismatch { embedder: usize, catalog: usize },

    #[error("Either an image or a precomputed embedding is required")]
    MissingInput,

    #[error(transparent)]
    Core(#[from] looq_core::Error),
}

impl From<image::ImageError> for VisionError {
    fn from(e: image::ImageError) -> Self {
        VisionError::Decode(e.to_string())
    }
}
