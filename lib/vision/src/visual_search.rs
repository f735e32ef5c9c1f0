use image::DynamicImage;
use looq_core::{GarmentCategory, ProductCatalog, ProductFilter, ProductId, ScoredProduct};
use std::sync::Arc;
use tracing::{debug, info};

use crate::embedder::ImageEmbedder;
use crate::error::{Result, VisionError};

/// Finds catalog products that look like a query image
#[derive(Clone)]
pub struct VisualSearch {
    embedder: Arc<dyn ImageEmbedder>,
    catalog: Arc<ProductCatalog>,
}

impl VisualSearch {
    /// Fails when the embedder and the catalog disagree on vector width.
    pub fn new(embedder: Arc<dyn ImageEmbedder>, catalog: Arc<ProductCatalog>) -> Result<Self> {
        if embedder.dimension() != catalog.vector_dim() {
            return Err(VisionError::DimensionMismatch {
                embedder: embedder.dimension(),
                catalog: catalog.vector_dim(),
            });
        }
        Ok(Self { embedder, catalog })
    }

    pub fn embedder(&self) -> &dyn ImageEmbedder {
        self.embedder.as_ref()
    }

    pub fn catalog(&self) -> &Arc<ProductCatalog> {
        &self.catalog
    }

    pub fn embed(&self, image: &DynamicImage) -> Result<Vec<f32>> {
        self.embedder.embed(image)
    }

    /// Nearest catalog products to an already computed embedding
    pub fn search_embedding(
        &self,
        embedding: &[f32],
        category: Option<GarmentCategory>,
        limit: usize,
    ) -> Result<Vec<ScoredProduct>> {
        let filter = category.map(ProductFilter::category);
        let results = self.catalog.search(
            embedding,
            limit,
            filter.as_ref().map(|f| f as &dyn looq_core::Filter),
        )?;
        debug!("Visual search returned {} products", results.len());
        Ok(results)
    }

    /// Find products similar to the query image, optionally restricted to
    /// one category
    pub fn find_similar(
        &self,
        image: &DynamicImage,
        category: Option<GarmentCategory>,
        limit: usize,
    ) -> Result<Vec<ScoredProduct>> {
        info!(
            "Visual search for category: {:?}, limit: {}",
            category.map(|c| c.as_str()),
            limit
        );
        let embedding = self.embed(image)?;
        self.search_embedding(&embedding, category, limit)
    }

    /// Attach an embedding to a catalog product so it becomes searchable.
    ///
    /// A precomputed embedding takes precedence over the image.
    pub fn index_product(
        &self,
        product_id: &ProductId,
        image: Option<&DynamicImage>,
        embedding: Option<Vec<f32>>,
    ) -> Result<()> {
        let embedding = match (embedding, image) {
            (Some(embedding), _) => embedding,
            (None, Some(image)) => self.embed(image)?,
            (None, None) => return Err(VisionError::MissingInput),
        };
        self.catalog.set_embedding(product_id, embedding)?;
        debug!("Indexed product {}", product_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedder::ColorHistogramEmbedder;
    use crate::imaging::solid_image;
    use looq_core::{CatalogConfig, Distance, Product};

    fn search() -> VisualSearch {
        let catalog = Arc::new(ProductCatalog::new(CatalogConfig {
            vector_dim: 512,
            distance: Distance::Cosine,
        }));
        VisualSearch::new(Arc::new(ColorHistogramEmbedder::new()), catalog).unwrap()
    }

    #[test]
    fn test_dimension_mismatch() {
        let catalog = Arc::new(ProductCatalog::new(CatalogConfig {
            vector_dim: 8,
            distance: Distance::Cosine,
        }));
        let err = VisualSearch::new(Arc::new(ColorHistogramEmbedder::new()), catalog).err();
        assert!(matches!(
            err,
            Some(VisionError::DimensionMismatch { embedder: 512, catalog: 8 })
        ));
    }

    #[test]
    fn test_index_then_find_similar() {
        let search = search();
        let red_shirt = Product::new("catalog", "Red Shirt", "shirt");
        let blue_jeans = Product::new("catalog", "Blue Jeans", "jeans");
        let (red_id, blue_id) = (red_shirt.id, blue_jeans.id);
        search.catalog().upsert(red_shirt).unwrap();
        search.catalog().upsert(blue_jeans).unwrap();

        search
            .index_product(&red_id, Some(&solid_image(20, 20, [200, 20, 20])), None)
            .unwrap();
        search
            .index_product(&blue_id, Some(&solid_image(20, 20, [20, 20, 200])), None)
            .unwrap();

        let results = search
            .find_similar(&solid_image(10, 10, [210, 25, 25]), None, 2)
            .unwrap();
        assert_eq!(results[0].product.id, red_id);

        let jeans_only = search
            .find_similar(&solid_image(10, 10, [210, 25, 25]), Some(GarmentCategory::Jeans), 5)
            .unwrap();
        assert_eq!(jeans_only.len(), 1);
        assert_eq!(jeans_only[0].product.id, blue_id);
    }

    #[test]
    fn test_index_requires_input_and_known_product() {
        let search = search();
        let id = ProductId::new();
        assert!(matches!(
            search.index_product(&id, None, None),
            Err(VisionError::MissingInput)
        ));
        assert!(matches!(
            search.index_product(&id, None, Some(vec![1.0; 512])),
            Err(VisionError::Core(looq_core::Error::ProductNotFound(_)))
        ));
    }
}
