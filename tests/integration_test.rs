// End-to-end tests across the LOOQ crates
use image::{DynamicImage, Rgb, RgbImage};
use looq::prelude::*;
use looq::{suggest_looks, ProvidersConfig};
use std::sync::Arc;
use tempfile::TempDir;

fn solid(rgb: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 40, Rgb(rgb)))
}

fn seeded_recognizer() -> (Arc<ProductCatalog>, GarmentRecognizer) {
    let catalog = Arc::new(ProductCatalog::new(CatalogConfig::default()));
    let embedder = Arc::new(ColorHistogramEmbedder::new());
    let search = VisualSearch::new(embedder, catalog.clone()).unwrap();

    let seed = [
        ("White Oxford", "shirt", [245, 245, 245], 35.0),
        ("Black Tee", "t-shirt", [10, 10, 10], 15.0),
        ("Navy Chinos", "pants", [20, 30, 110], 55.0),
        ("Brown Boots", "boots", [120, 70, 30], 95.0),
    ];
    for (name, category, rgb, price) in seed {
        let product = Product::new("catalog", name, category).with_price(price);
        let id = product.id;
        catalog.upsert(product).unwrap();
        search.index_product(&id, Some(&solid(rgb)), None).unwrap();
    }

    let classifier = Arc::new(PrototypeClassifier::from_catalog(&catalog));
    (catalog, GarmentRecognizer::new(search, classifier))
}

#[test]
fn test_recognition_pipeline() {
    let (_catalog, recognizer) = seeded_recognizer();

    let recognition = recognizer.recognize(&solid([22, 28, 112])).unwrap();
    assert_eq!(recognition.prediction.category, GarmentCategory::Pants);
    assert_eq!(recognition.similar_products[0].product.name, "Navy Chinos");
    assert!(recognition.prediction.confidence > 0.5);
    assert_eq!(recognition.embedding.len(), 512);

    let looks = suggest_looks(recognition.prediction.category.as_str());
    assert_eq!(looks[0].name, "Classic shirt");
}

#[tokio::test]
async fn test_complete_flow() {
    let (catalog, recognizer) = seeded_recognizer();
    let aggregator = ProductAggregator::from_config(ProvidersConfig::default());
    let engine = OutfitEngine::default();

    let recognition = recognizer.recognize(&solid([250, 250, 250])).unwrap();
    assert_eq!(recognition.prediction.category, GarmentCategory::Shirt);

    let products = aggregator.search_products(&recognition.prediction, 20).await;
    assert_eq!(products.len(), 10);
    assert!(products.iter().all(|p| p.category == "shirt"));

    let anchor = &products[0];
    let mut pool = products.clone();
    pool.extend(catalog.products());
    let outfits = engine.generate_outfits(anchor, &recognition.prediction, &pool, 10);

    // one bottom and one footwear in the catalog
    assert_eq!(outfits.len(), 2);
    assert_eq!(outfits[0].items.len(), 3);
    assert_eq!(outfits[0].items[0].id, anchor.id);
    assert_eq!(outfits[1].items.len(), 2);
    assert!(outfits
        .iter()
        .all(|o| (0.0..=1.0).contains(&o.compatibility_score)));
}

#[test]
fn test_catalog_survives_restart() {
    let dir = TempDir::new().unwrap();
    let (catalog, _) = seeded_recognizer();

    let store = CatalogStore::open(dir.path()).unwrap();
    assert_eq!(store.save(&catalog).unwrap(), 4);

    let reopened = CatalogStore::open(dir.path()).unwrap();
    let restored = Arc::new(reopened.restore(CatalogConfig::default()).unwrap());
    assert_eq!(restored.count(), 4);
    assert_eq!(restored.embedded_count(), 4);

    let search = VisualSearch::new(Arc::new(ColorHistogramEmbedder::new()), restored).unwrap();
    let results = search.find_similar(&solid([118, 72, 28]), None, 1).unwrap();
    assert_eq!(results[0].product.name, "Brown Boots");
}
