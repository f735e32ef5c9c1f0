use crate::vector::{cosine_similarity, dot, l2_distance, normalize_in_place, Vector};
use crate::{Error, Filter, GarmentCategory, Product, ProductId, Result};
use ordered_float::OrderedFloat;
use parking_lot::RwLock;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BinaryHeap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Embedding width of CLIP ViT-B/32
pub const DEFAULT_VECTOR_DIM: usize = 512;

/// Configuration for a product catalog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogConfig {
    pub vector_dim: usize,
    pub distance: Distance,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            vector_dim: DEFAULT_VECTOR_DIM,
            distance: Distance::Cosine,
        }
    }
}

/// Vector distance metric. Smaller distances mean more similar products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distance {
    #[default]
    Cosine,
    Euclidean,
    Dot,
}

impl Distance {
    /// `1 - cos` for cosine, L2 for euclidean, negative inner product for dot
    #[inline]
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Distance::Cosine => 1.0 - cosine_similarity(a, b),
            Distance::Euclidean => l2_distance(a, b),
            Distance::Dot => -dot(a, b),
        }
    }

    #[inline]
    pub fn similarity(&self, distance: f32) -> f32 {
        match self {
            Distance::Cosine => 1.0 - distance,
            Distance::Euclidean | Distance::Dot => -distance,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Distance::Cosine => "cosine",
            Distance::Euclidean => "euclidean",
            Distance::Dot => "dot",
        };
        f.write_str(name)
    }
}

impl FromStr for Distance {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cosine" => Ok(Distance::Cosine),
            "euclidean" | "euclid" | "l2" => Ok(Distance::Euclidean),
            "dot" | "inner" => Ok(Distance::Dot),
            other => Err(Error::InvalidConfig(format!("unknown distance metric: {}", other))),
        }
    }
}

/// A catalog product paired with its distance to the query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredProduct {
    pub product: Product,
    pub distance: f32,
    pub similarity: f32,
}

type ProductMap = HashMap<ProductId, Product, ahash::RandomState>;

/// In-memory product catalog with exact nearest-neighbour search over
/// product embeddings
pub struct ProductCatalog {
    config: CatalogConfig,
    products: Arc<RwLock<ProductMap>>,
}

impl ProductCatalog {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            products: Arc::new(RwLock::new(ProductMap::default())),
        }
    }

    pub fn vector_dim(&self) -> usize {
        self.config.vector_dim
    }

    pub fn distance(&self) -> Distance {
        self.config.distance
    }

    pub fn count(&self) -> usize {
        self.products.read().len()
    }

    /// Number of products that carry an embedding and are therefore searchable
    pub fn embedded_count(&self) -> usize {
        self.products.read().values().filter(|p| p.has_embedding()).count()
    }

    fn prepare_embedding(&self, embedding: &mut Vec<f32>) -> Result<()> {
        if embedding.len() != self.config.vector_dim {
            return Err(Error::InvalidDimension {
                expected: self.config.vector_dim,
                actual: embedding.len(),
            });
        }
        if self.config.distance == Distance::Cosine {
            normalize_in_place(embedding);
        }
        Ok(())
    }

    /// Insert or update a product
    pub fn upsert(&self, mut product: Product) -> Result<()> {
        if let Some(embedding) = product.embedding.as_mut() {
            self.prepare_embedding(embedding)?;
        }
        self.products.write().insert(product.id, product);
        Ok(())
    }

    /// Insert several products. Validation happens up front so a bad
    /// embedding leaves the catalog untouched.
    pub fn upsert_many(&self, products: Vec<Product>) -> Result<usize> {
        let mut prepared = Vec::with_capacity(products.len());
        for mut product in products {
            if let Some(embedding) = product.embedding.as_mut() {
                self.prepare_embedding(embedding)?;
            }
            prepared.push(product);
        }

        let count = prepared.len();
        let mut map = self.products.write();
        for product in prepared {
            map.insert(product.id, product);
        }
        Ok(count)
    }

    /// Attach or replace the embedding of an existing product
    pub fn set_embedding(&self, id: &ProductId, mut embedding: Vec<f32>) -> Result<()> {
        self.prepare_embedding(&mut embedding)?;
        let mut map = self.products.write();
        let product = map
            .get_mut(id)
            .ok_or_else(|| Error::ProductNotFound(id.to_string()))?;
        product.embedding = Some(embedding);
        Ok(())
    }

    /// Get a product by ID
    pub fn get(&self, id: &ProductId) -> Option<Product> {
        self.products.read().get(id).cloned()
    }

    /// Delete a product by ID
    pub fn delete(&self, id: &ProductId) -> bool {
        self.products.write().remove(id).is_some()
    }

    /// Get all products
    pub fn products(&self) -> Vec<Product> {
        self.products.read().values().cloned().collect()
    }

    /// All products accepted by `filter`, ordered by id
    pub fn products_matching(&self, filter: &dyn Filter) -> Vec<Product> {
        let mut matching: Vec<Product> = self
            .products
            .read()
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        matching.sort_by_key(|p| p.id);
        matching
    }

    /// Mean normalized embedding of every known category present in the catalog
    pub fn category_prototypes(&self) -> Vec<(GarmentCategory, Vector)> {
        let products = self.products.read();
        let mut sums: BTreeMap<GarmentCategory, Vector> = BTreeMap::new();

        for product in products.values() {
            let (Some(category), Some(embedding)) = (product.category_kind(), &product.embedding)
            else {
                continue;
            };
            let mut unit = Vector::from_slice(embedding);
            unit.normalize();
            sums.entry(category)
                .and_modify(|acc| *acc = &*acc + &unit)
                .or_insert(unit);
        }

        sums.into_iter()
            .map(|(category, mut sum)| {
                sum.normalize();
                (category, sum)
            })
            .collect()
    }

    /// Exact k-nearest-neighbour search.
    ///
    /// Products without an embedding, or rejected by `filter`, are skipped.
    /// Results are ordered by ascending distance; equal distances are
    /// ordered by product id.
    pub fn search(
        &self,
        query: &[f32],
        limit: usize,
        filter: Option<&dyn Filter>,
    ) -> Result<Vec<ScoredProduct>> {
        if query.is_empty() {
            return Err(Error::EmptyVector);
        }
        if query.len() != self.config.vector_dim {
            return Err(Error::InvalidDimension {
                expected: self.config.vector_dim,
                actual: query.len(),
            });
        }
        if limit == 0 {
            return Ok(Vec::new());
        }

        let distance = self.config.distance;
        let query: Vec<f32> = if distance == Distance::Cosine {
            let mut q = query.to_vec();
            normalize_in_place(&mut q);
            q
        } else {
            query.to_vec()
        };

        let products = self.products.read();
        let scored: Vec<(OrderedFloat<f32>, ProductId)> = products
            .par_iter()
            .filter_map(|(id, product)| {
                let embedding = product.embedding.as_ref()?;
                if let Some(f) = filter {
                    if !f.matches(product) {
                        return None;
                    }
                }
                Some((OrderedFloat(distance.distance(&query, embedding)), *id))
            })
            .collect();

        // Bounded max-heap keeps the k closest; k never exceeds the candidates
        let limit = limit.min(scored.len());
        let mut heap: BinaryHeap<(OrderedFloat<f32>, ProductId)> =
            BinaryHeap::with_capacity(limit.saturating_add(1));
        for entry in scored {
            heap.push(entry);
            if heap.len() > limit {
                heap.pop();
            }
        }

        Ok(heap
            .into_sorted_vec()
            .into_iter()
            .filter_map(|(d, id)| {
                products.get(&id).map(|product| ScoredProduct {
                    product: product.clone(),
                    distance: d.0,
                    similarity: distance.similarity(d.0),
                })
            })
            .collect())
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::new(CatalogConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FilterCondition, ProductFilter};

    fn catalog(dim: usize, distance: Distance) -> ProductCatalog {
        ProductCatalog::new(CatalogConfig { vector_dim: dim, distance })
    }

    fn product(name: &str, category: &str, embedding: Vec<f32>) -> Product {
        Product::new("catalog", name, category).with_embedding(embedding)
    }

    #[test]
    fn test_upsert_rejects_wrong_dimension() {
        let catalog = catalog(3, Distance::Cosine);
        let err = catalog.upsert(product("a", "shirt", vec![1.0, 0.0])).unwrap_err();
        assert!(matches!(err, Error::InvalidDimension { expected: 3, actual: 2 }));
        assert_eq!(catalog.count(), 0);
    }

    #[test]
    fn test_upsert_normalizes_for_cosine() {
        let catalog = catalog(2, Distance::Cosine);
        let p = product("a", "shirt", vec![3.0, 4.0]);
        let id = p.id;
        catalog.upsert(p).unwrap();
        let stored = catalog.get(&id).unwrap().embedding.unwrap();
        assert!((stored[0] - 0.6).abs() < 1e-6);
        assert!((stored[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_search_orders_by_distance() {
        let catalog = catalog(2, Distance::Cosine);
        let near = product("near", "shirt", vec![1.0, 0.1]);
        let mid = product("mid", "shirt", vec![1.0, 1.0]);
        let far = product("far", "shirt", vec![0.0, 1.0]);
        catalog.upsert_many(vec![far.clone(), near.clone(), mid.clone()]).unwrap();

        let results = catalog.search(&[1.0, 0.0], 2, None).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].product.id, near.id);
        assert_eq!(results[1].product.id, mid.id);
        assert!(results[0].distance <= results[1].distance);
        assert!(results[0].similarity > 0.99);
    }

    #[test]
    fn test_search_skips_unembedded_and_filtered() {
        let catalog = catalog(2, Distance::Cosine);
        catalog.upsert(Product::new("catalog", "no vector", "shirt")).unwrap();
        catalog.upsert(product("jeans", "jeans", vec![1.0, 0.0])).unwrap();
        catalog.upsert(product("shirt", "shirt", vec![1.0, 0.0])).unwrap();

        let all = catalog.search(&[1.0, 0.0], 10, None).unwrap();
        assert_eq!(all.len(), 2);

        let filter = ProductFilter::new(FilterCondition::Category(GarmentCategory::Jeans));
        let jeans = catalog.search(&[1.0, 0.0], 10, Some(&filter)).unwrap();
        assert_eq!(jeans.len(), 1);
        assert_eq!(jeans[0].product.name, "jeans");
    }

    #[test]
    fn test_search_errors_and_zero_limit() {
        let catalog = catalog(2, Distance::Cosine);
        catalog.upsert(product("a", "shirt", vec![1.0, 0.0])).unwrap();
        assert!(matches!(catalog.search(&[], 5, None), Err(Error::EmptyVector)));
        assert!(matches!(
            catalog.search(&[1.0, 0.0, 0.0], 5, None),
            Err(Error::InvalidDimension { .. })
        ));
        assert!(catalog.search(&[1.0, 0.0], 0, None).unwrap().is_empty());
    }

    #[test]
    fn test_search_ties_ordered_by_id() {
        let catalog = catalog(2, Distance::Euclidean);
        let a = product("a", "shirt", vec![1.0, 0.0]);
        let b = product("b", "shirt", vec![1.0, 0.0]);
        catalog.upsert_many(vec![a.clone(), b.clone()]).unwrap();

        let results = catalog.search(&[1.0, 0.0], 2, None).unwrap();
        let mut expected = vec![a.id, b.id];
        expected.sort();
        let got: Vec<ProductId> = results.iter().map(|r| r.product.id).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_euclidean_and_dot_metrics() {
        let l2 = catalog(2, Distance::Euclidean);
        l2.upsert(product("a", "shirt", vec![3.0, 4.0])).unwrap();
        let r = l2.search(&[0.0, 0.0], 1, None).unwrap();
        assert!((r[0].distance - 5.0).abs() < 1e-6);
        assert!((r[0].similarity + 5.0).abs() < 1e-6);

        let ip = catalog(2, Distance::Dot);
        let small = product("small", "shirt", vec![1.0, 0.0]);
        let big = product("big", "shirt", vec![2.0, 0.0]);
        ip.upsert_many(vec![small, big.clone()]).unwrap();
        let r = ip.search(&[1.0, 0.0], 1, None).unwrap();
        assert_eq!(r[0].product.id, big.id);
    }

    #[test]
    fn test_set_embedding_and_delete() {
        let catalog = catalog(2, Distance::Cosine);
        let p = Product::new("catalog", "a", "shirt");
        let id = p.id;
        catalog.upsert(p).unwrap();
        assert_eq!(catalog.embedded_count(), 0);

        catalog.set_embedding(&id, vec![0.0, 2.0]).unwrap();
        assert_eq!(catalog.embedded_count(), 1);

        let missing = ProductId::new();
        assert!(matches!(
            catalog.set_embedding(&missing, vec![0.0, 1.0]),
            Err(Error::ProductNotFound(_))
        ));

        assert!(catalog.delete(&id));
        assert!(!catalog.delete(&id));
    }

    #[test]
    fn test_category_prototypes() {
        let catalog = catalog(2, Distance::Cosine);
        catalog
            .upsert_many(vec![
                product("s1", "shirt", vec![1.0, 0.0]),
                product("s2", "shirt", vec![1.0, 0.2]),
                product("j1", "jeans", vec![0.0, 1.0]),
                product("u1", "hat", vec![1.0, 1.0]),
            ])
            .unwrap();

        let prototypes = catalog.category_prototypes();
        assert_eq!(prototypes.len(), 2);
        let (category, shirt_proto) = &prototypes[0];
        assert_eq!(*category, GarmentCategory::Shirt);
        assert!((shirt_proto.norm() - 1.0).abs() < 1e-5);
        assert_eq!(prototypes[1].0, GarmentCategory::Jeans);
    }

    #[test]
    fn test_search_limit_larger_than_catalog() {
        let catalog = catalog(2, Distance::Cosine);
        catalog
            .upsert_many(vec![
                product("a", "shirt", vec![1.0, 0.0]),
                product("b", "jeans", vec![0.0, 1.0]),
                product("c", "boots", vec![0.6, 0.8]),
                Product::new("catalog", "no embedding", "shirt"),
            ])
            .unwrap();

        let all = catalog.search(&[1.0, 0.0], usize::MAX, None).unwrap();
        let names: Vec<_> = all.iter().map(|s| s.product.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);

        let huge = catalog.search(&[1.0, 0.0], 1usize << 61, None).unwrap();
        assert_eq!(huge.len(), 3);

        let empty = ProductCatalog::new(CatalogConfig { vector_dim: 2, distance: Distance::Cosine });
        assert!(empty.search(&[1.0, 0.0], usize::MAX, None).unwrap().is_empty());
    }

    #[test]
    fn test_distance_from_str() {
        assert_eq!("Cosine".parse::<Distance>().unwrap(), Distance::Cosine);
        assert_eq!("l2".parse::<Distance>().unwrap(), Distance::Euclidean);
        assert!("manhattan".parse::<Distance>().is_err());
    }
}
