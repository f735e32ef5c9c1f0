use looq_core::ProductCatalog;
use looq_providers::ProductAggregator;
use looq_styling::OutfitEngine;
use looq_vision::{GarmentRecognizer, VisualSearch};
use std::sync::Arc;

use crate::settings::Settings;

/// Shared services handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub recognizer: GarmentRecognizer,
    pub aggregator: ProductAggregator,
    pub outfits: Arc<OutfitEngine>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        recognizer: GarmentRecognizer,
        aggregator: ProductAggregator,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            recognizer,
            aggregator,
            outfits: Arc::new(OutfitEngine::default()),
        }
    }

    pub fn visual_search(&self) -> &VisualSearch {
        self.recognizer.search()
    }

    pub fn catalog(&self) -> &Arc<ProductCatalog> {
        self.recognizer.search().catalog()
    }

    /// Rebuild classifier state after a catalog mutation
    pub fn catalog_changed(&self) {
        self.recognizer.classifier().refresh(self.catalog());
    }
}
