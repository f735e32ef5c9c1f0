//! Image embedders.
//!
//! Every embedder returns an L2-normalized vector of exactly
//! [`ImageEmbedder::dimension`] components.

use image::DynamicImage;
use looq_core::vector::normalize_in_place;

use crate::error::Result;
use crate::imaging::thumbnail;

/// Turns an image into a fixed-length feature vector
pub trait ImageEmbedder: Send + Sync {
    /// Compute the normalized embedding of an image.
    fn embed(&self, image: &DynamicImage) -> Result<Vec<f32>>;

    /// Length of the vectors produced by [`embed`](Self::embed).
    fn dimension(&self) -> usize;

    /// Identifier of the underlying model.
    fn model_name(&self) -> &str;
}

/// Bins per color channel of the joint histogram
pub const HISTOGRAM_BINS: usize = 8;

/// 8 x 8 x 8 bins, the same width as CLIP ViT-B/32 embeddings
pub const HISTOGRAM_DIM: usize = HISTOGRAM_BINS * HISTOGRAM_BINS * HISTOGRAM_BINS;

/// Joint RGB color histogram embedder.
///
/// Needs no model files, which makes it the default for development and
/// tests. Images with similar color distributions land close together under
/// cosine distance.
#[derive(Debug, Clone, Default)]
pub struct ColorHistogramEmbedder;

impl ColorHistogramEmbedder {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn bin(value: u8) -> usize {
        usize::from(value) * HISTOGRAM_BINS / 256
    }
}

impl ImageEmbedder for ColorHistogramEmbedder {
    fn embed(&self, image: &DynamicImage) -> Result<Vec<f32>> {
        let mut histogram = vec![0.0f32; HISTOGRAM_DIM];

        if image.width() > 0 && image.height() > 0 {
            for pixel in thumbnail(image).pixels() {
                let [r, g, b] = pixel.0;
                let idx = (Self::bin(r) * HISTOGRAM_BINS + Self::bin(g)) * HISTOGRAM_BINS
                    + Self::bin(b);
                histogram[idx] += 1.0;
            }
        }

        normalize_in_place(&mut histogram);
        Ok(histogram)
    }

    fn dimension(&self) -> usize {
        HISTOGRAM_DIM
    }

    fn model_name(&self) -> &str {
        "color-histogram-8x8x8"
    }
}
