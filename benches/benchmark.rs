// Catalog search and outfit generation benchmarks
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use looq_core::{
    CatalogConfig, Distance, Filter, GarmentCategory, GarmentPrediction, Product, ProductCatalog,
    ProductFilter,
};
use looq_styling::OutfitEngine;
use rand::prelude::*;
use std::sync::Arc;

const DIM: usize = 512;
const CATEGORIES: [&str; 6] = ["shirt", "t-shirt", "jeans", "pants", "sneakers", "boots"];

fn random_embedding(rng: &mut impl Rng) -> Vec<f32> {
    (0..DIM).map(|_| rng.random_range(-1.0f32..1.0f32)).collect()
}

fn random_product(rng: &mut impl Rng, i: usize) -> Product {
    let category = CATEGORIES[i % CATEGORIES.len()];
    Product::new("catalog", format!("product {}", i), category)
        .with_price(rng.random_range(10.0..200.0))
        .with_embedding(random_embedding(rng))
}

fn filled_catalog(size: usize) -> ProductCatalog {
    let mut rng = rand::rng();
    let catalog = ProductCatalog::new(CatalogConfig {
        vector_dim: DIM,
        distance: Distance::Cosine,
    });
    let products = (0..size).map(|i| random_product(&mut rng, i)).collect();
    catalog.upsert_many(products).unwrap();
    catalog
}

fn benchmark_upsert(c: &mut Criterion) {
    let mut group = c.benchmark_group("upsert");

    for size in [100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("looq", size), size, |b, &size| {
            let mut rng = rand::rng();
            let products: Vec<Product> = (0..size).map(|i| random_product(&mut rng, i)).collect();
            b.iter(|| {
                let catalog = ProductCatalog::new(CatalogConfig::default());
                catalog.upsert_many(black_box(products.clone())).unwrap();
            });
        });
    }

    group.finish();
}

fn benchmark_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    for size in [1_000, 10_000].iter() {
        let catalog = filled_catalog(*size);
        let query = random_embedding(&mut rand::rng());

        group.bench_with_input(BenchmarkId::new("top10", size), size, |b, _| {
            b.iter(|| black_box(catalog.search(black_box(&query), 10, None).unwrap()));
        });
    }

    let catalog = filled_catalog(10_000);
    let query = random_embedding(&mut rand::rng());
    let filter = ProductFilter::category(GarmentCategory::Jeans);
    group.bench_function("top10_category_filter", |b| {
        b.iter(|| {
            black_box(
                catalog
                    .search(black_box(&query), 10, Some(&filter as &dyn Filter))
                    .unwrap(),
            )
        });
    });

    group.finish();
}

fn benchmark_concurrent_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_search");

    let catalog = Arc::new(filled_catalog(1_000));
    let query = random_embedding(&mut rand::rng());

    group.bench_function("looq_concurrent", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..10)
                .map(|_| {
                    let catalog = catalog.clone();
                    let q = query.clone();
                    std::thread::spawn(move || catalog.search(&q, 10, None))
                })
                .collect();

            for handle in handles {
                black_box(handle.join().unwrap().unwrap());
            }
        });
    });

    group.finish();
}

fn benchmark_outfits(c: &mut Criterion) {
    let mut rng = rand::rng();
    let pool: Vec<Product> = (0..200).map(|i| random_product(&mut rng, i)).collect();
    let anchor = Product::new("catalog", "anchor", "shirt").with_price(30.0);
    let prediction = GarmentPrediction::new(GarmentCategory::Shirt, 0.9);
    let engine = OutfitEngine::default();

    c.bench_function("generate_outfits", |b| {
        b.iter(|| black_box(engine.generate_outfits(&anchor, &prediction, black_box(&pool), 10)));
    });
}

criterion_group!(
    benches,
    benchmark_upsert,
    benchmark_search,
    benchmark_concurrent_search,
    benchmark_outfits
);
criterion_main!(benches);
