use image::DynamicImage;
use looq_core::{GarmentPrediction, ScoredProduct};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::classifier::GarmentClassifier;
use crate::error::Result;
use crate::imaging::dominant_color;
use crate::visual_search::VisualSearch;

/// Number of visually similar catalog products returned by default
pub const DEFAULT_SIMILAR_LIMIT: usize = 10;

/// Output of recognizing a garment photo
#[derive(Debug, Clone, Serialize)]
pub struct Recognition {
    pub prediction: GarmentPrediction,
    pub similar_products: Vec<ScoredProduct>,
    #[serde(skip)]
    pub embedding: Vec<f32>,
}

/// Embeds, classifies and looks up similar products for a photo
#[derive(Clone)]
pub struct GarmentRecognizer {
    search: VisualSearch,
    classifier: Arc<dyn GarmentClassifier>,
    similar_limit: usize,
}

impl GarmentRecognizer {
    pub fn new(search: VisualSearch, classifier: Arc<dyn GarmentClassifier>) -> Self {
        Self {
            search,
            classifier,
            similar_limit: DEFAULT_SIMILAR_LIMIT,
        }
    }

    #[must_use]
    pub fn with_similar_limit(mut self, limit: usize) -> Self {
        self.similar_limit = limit;
        self
    }

    pub fn search(&self) -> &VisualSearch {
        &self.search
    }

    pub fn classifier(&self) -> &Arc<dyn GarmentClassifier> {
        &self.classifier
    }

    pub fn recognize(&self, image: &DynamicImage) -> Result<Recognition> {
        let embedding = self.search.embed(image)?;
        let classification = self.classifier.classify(&embedding);

        let mut prediction =
            GarmentPrediction::new(classification.category, classification.confidence);
        prediction.color = dominant_color(image);
        prediction
            .attributes
            .insert("features_extracted".to_string(), serde_json::Value::Bool(true));
        prediction.attributes.insert(
            "embedding_model".to_string(),
            serde_json::Value::String(self.search.embedder().model_name().to_string()),
        );

        info!(
            "Recognized: {} (confidence: {:.2})",
            prediction.category, prediction.confidence
        );

        let similar_products = self
            .search
            .search_embedding(&embedding, None, self.similar_limit)?;

        Ok(Recognition {
            prediction,
            similar_products,
            embedding,
        })
    }
}
