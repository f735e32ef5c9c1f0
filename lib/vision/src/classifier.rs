//! Garment category classifiers operating on image embeddings.

use looq_core::vector::cosine_similarity;
use looq_core::{GarmentCategory, ProductCatalog, Vector};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub category: GarmentCategory,
    pub confidence: f32,
}

/// Maps an embedding to the garment taxonomy
pub trait GarmentClassifier: Send + Sync {
    fn classify(&self, embedding: &[f32]) -> Classification;

    /// Rebuild any state derived from the catalog. No-op by default.
    fn refresh(&self, _catalog: &ProductCatalog) {}
}

/// Always answers with the same category
#[derive(Debug, Clone, Copy)]
pub struct FixedClassifier {
    category: GarmentCategory,
    confidence: f32,
}

impl FixedClassifier {
    pub fn new(category: GarmentCategory, confidence: f32) -> Self {
        Self {
            category,
            confidence,
        }
    }
}

impl Default for FixedClassifier {
    fn default() -> Self {
        Self::new(GarmentCategory::Shirt, 0.95)
    }
}

impl GarmentClassifier for FixedClassifier {
    fn classify(&self, _embedding: &[f32]) -> Classification {
        Classification {
            category: self.category,
            confidence: self.confidence,
        }
    }
}

/// Softmax temperature applied to cosine similarities
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Nearest-prototype classifier.
///
/// Each category is represented by the mean embedding of its catalog
/// products; an image is assigned the category whose prototype has the
/// highest cosine similarity. Confidence is the softmax probability of the
/// winner. Without prototypes the fallback classifier answers.
pub struct PrototypeClassifier {
    prototypes: RwLock<Vec<(GarmentCategory, Vector)>>,
    temperature: f32,
    fallback: FixedClassifier,
}

impl PrototypeClassifier {
    pub fn new(prototypes: Vec<(GarmentCategory, Vector)>) -> Self {
        Self {
            prototypes: RwLock::new(prototypes),
            temperature: DEFAULT_TEMPERATURE,
            fallback: FixedClassifier::default(),
        }
    }

    pub fn from_catalog(catalog: &ProductCatalog) -> Self {
        Self::new(catalog.category_prototypes())
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.max(f32::EPSILON);
        self
    }

    pub fn prototype_count(&self) -> usize {
        self.prototypes.read().len()
    }
}

impl GarmentClassifier for PrototypeClassifier {
    fn classify(&self, embedding: &[f32]) -> Classification {
        let prototypes = self.prototypes.read();
        if prototypes.is_empty() {
            return self.fallback.classify(embedding);
        }

        let scores: Vec<(GarmentCategory, f32)> = prototypes
            .iter()
            .map(|(category, proto)| (*category, cosine_similarity(embedding, proto.as_slice())))
            .collect();

        let Some(&(best, best_score)) = scores
            .iter()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        else {
            return self.fallback.classify(embedding);
        };

        // exp((s - max) / t) keeps the softmax numerically stable
        let denom: f32 = scores
            .iter()
            .map(|(_, s)| ((s - best_score) / self.temperature).exp())
            .sum();

        Classification {
            category: best,
            confidence: 1.0 / denom,
        }
    }

    fn refresh(&self, catalog: &ProductCatalog) {
        let prototypes = catalog.category_prototypes();
        debug!("Refreshed {} category prototypes", prototypes.len());
        *self.prototypes.write() = prototypes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use looq_core::{CatalogConfig, Distance, Product};

    #[test]
    fn test_fixed_classifier() {
        let c = FixedClassifier::default().classify(&[0.0; 4]);
        assert_eq!(c.category, GarmentCategory::Shirt);
        assert!((c.confidence - 0.95).abs() < 1e-6);
    }

    #[test]
    fn test_prototype_picks_nearest() {
        let classifier = PrototypeClassifier::new(vec![
            (GarmentCategory::Shirt, Vector::new(vec![1.0, 0.0])),
            (GarmentCategory::Jeans, Vector::new(vec![0.0, 1.0])),
        ]);

        let c = classifier.classify(&[0.1, 0.9]);
        assert_eq!(c.category, GarmentCategory::Jeans);
        assert!(c.confidence > 0.5 && c.confidence <= 1.0);
    }

    #[test]
    fn test_single_prototype_full_confidence() {
        let classifier =
            PrototypeClassifier::new(vec![(GarmentCategory::Hoodie, Vector::new(vec![1.0, 0.0]))]);
        let c = classifier.classify(&[0.0, 1.0]);
        assert_eq!(c.category, GarmentCategory::Hoodie);
        assert!((c.confidence - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_falls_back_then_refreshes() {
        let catalog = ProductCatalog::new(CatalogConfig {
            vector_dim: 2,
            distance: Distance::Cosine,
        });
        let classifier = PrototypeClassifier::from_catalog(&catalog);
        assert_eq!(classifier.prototype_count(), 0);
        assert_eq!(classifier.classify(&[0.0, 1.0]).category, GarmentCategory::Shirt);

        catalog
            .upsert(Product::new("catalog", "boots", "boots").with_embedding(vec![0.0, 1.0]))
            .unwrap();
        classifier.refresh(&catalog);
        assert_eq!(classifier.prototype_count(), 1);
        assert_eq!(classifier.classify(&[0.0, 1.0]).category, GarmentCategory::Boots);
    }
}
