//! CLIP vision tower running on ONNX Runtime.
//!
//! Expects an exported image encoder taking `pixel_values` of shape
//! `[1, 3, 224, 224]` and producing image embeddings as its first output.

use image::imageops::FilterType;
use image::DynamicImage;
use looq_core::vector::normalize_in_place;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::embedder::ImageEmbedder;
use crate::error::{Result, VisionError};

const INPUT_SIZE: u32 = 224;
const CLIP_MEAN: [f32; 3] = [0.481_454_66, 0.457_827_5, 0.408_210_73];
const CLIP_STD: [f32; 3] = [0.268_629_54, 0.261_302_58, 0.275_777_11];

/// Configuration for the ONNX CLIP embedder.
#[derive(Debug, Clone)]
pub struct ClipConfig {
    /// Path to the ONNX image encoder.
    pub model_path: PathBuf,
    /// Output embedding dimension.
    pub dimension: usize,
    /// Model name for identification.
    pub model_name: String,
    /// Intra-op threads for the session.
    pub intra_threads: usize,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./models/clip-vit-b-32-vision.onnx"),
            dimension: 512,
            model_name: "clip-ViT-B-32".to_string(),
            intra_threads: 4,
        }
    }
}

pub struct ClipEmbedder {
    session: Mutex<Session>,
    config: ClipConfig,
}

fn inference_error(e: ort::Error) -> VisionError {
    VisionError::Inference(e.to_string())
}

impl ClipEmbedder {
    pub fn new(config: ClipConfig) -> Result<Self> {
        info!("Initializing CLIP image encoder: {}", config.model_name);

        if !Path::new(&config.model_path).exists() {
            return Err(VisionError::ModelNotFound(config.model_path.clone()));
        }

        let session = Session::builder()
            .map_err(inference_error)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(inference_error)?
            .with_intra_threads(config.intra_threads)
            .map_err(inference_error)?
            .commit_from_file(&config.model_path)
            .map_err(inference_error)?;

        info!("ONNX session created for {}", config.model_name);

        Ok(Self {
            session: Mutex::new(session),
            config,
        })
    }

    /// Resize the short side to 224, center-crop, scale and normalize into
    /// an NCHW buffer.
    fn preprocess(image: &DynamicImage) -> Vec<f32> {
        let (w, h) = (image.width().max(1), image.height().max(1));
        let scale = INPUT_SIZE as f32 / w.min(h) as f32;
        let rw = ((w as f32 * scale).round() as u32).max(INPUT_SIZE);
        let rh = ((h as f32 * scale).round() as u32).max(INPUT_SIZE);

        let resized = image.resize_exact(rw, rh, FilterType::CatmullRom);
        let x = (rw - INPUT_SIZE) / 2;
        let y = (rh - INPUT_SIZE) / 2;
        let cropped = resized.crop_imm(x, y, INPUT_SIZE, INPUT_SIZE).to_rgb8();

        let plane = (INPUT_SIZE * INPUT_SIZE) as usize;
        let mut data = vec![0.0f32; 3 * plane];
        for (i, pixel) in cropped.pixels().enumerate() {
            for c in 0..3 {
                let v = f32::from(pixel.0[c]) / 255.0;
                data[c * plane + i] = (v - CLIP_MEAN[c]) / CLIP_STD[c];
            }
        }
        data
    }
}

impl ImageEmbedder for ClipEmbedder {
    fn embed(&self, image: &DynamicImage) -> Result<Vec<f32>> {
        let pixels = Self::preprocess(image);
        let size = INPUT_SIZE as usize;
        let input = Tensor::from_array(([1usize, 3, size, size], pixels.into_boxed_slice()))
            .map_err(inference_error)?;

        let mut session = self.session.lock();
        let outputs = session.run(ort::inputs![input]).map_err(inference_error)?;

        let output = outputs
            .iter()
            .next()
            .ok_or_else(|| VisionError::Inference("no output tensor found".to_string()))?
            .1;
        let (shape, data) = output.try_extract_tensor::<f32>().map_err(inference_error)?;
        debug!("CLIP output shape: {:?}", shape);

        if data.len() < self.config.dimension {
            return Err(VisionError::Inference(format!(
                "output has {} values, expected at least {}",
                data.len(),
                self.config.dimension
            )));
        }

        let mut embedding = data[..self.config.dimension].to_vec();
        normalize_in_place(&mut embedding);
        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    fn model_name(&self) -> &str {
        &self.config.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_file() {
        let config = ClipConfig {
            model_path: PathBuf::from("/nonexistent/clip.onnx"),
            ..ClipConfig::default()
        };
        assert!(matches!(
            ClipEmbedder::new(config),
            Err(VisionError::ModelNotFound(_))
        ));
    }

    #[test]
    fn test_preprocess_shape() {
        let img = crate::imaging::solid_image(300, 200, [255, 255, 255]);
        let data = ClipEmbedder::preprocess(&img);
        assert_eq!(data.len(), 3 * 224 * 224);
        let expected = (1.0 - CLIP_MEAN[0]) / CLIP_STD[0];
        assert!((data[0] - expected).abs() < 1e-4);
    }
}
