use atomicwrites::{AtomicFile, OverwriteBehavior};
use chrono::{DateTime, Utc};
use looq_core::{CatalogConfig, Distance, Product, ProductCatalog};
use parking_lot::Mutex;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::error::{Result, StorageError};
use crate::snapshot::{CatalogSnapshot, ProductRecord, SNAPSHOT_VERSION};

pub const SNAPSHOT_FILENAME: &str = "catalog.snapshot";
pub const DEFAULT_SAVE_INTERVAL: Duration = Duration::from_secs(300);

/// Persists the product catalog as a single bincode snapshot file
pub struct CatalogStore {
    data_dir: PathBuf,
    snapshot_path: PathBuf,
    last_save: Mutex<Option<DateTime<Utc>>>,
    shutdown: Arc<AtomicBool>,
}

impl CatalogStore {
    /// Open a store rooted at `data_dir`, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;
        let snapshot_path = data_dir.join(SNAPSHOT_FILENAME);

        Ok(Self {
            data_dir,
            snapshot_path,
            last_save: Mutex::new(None),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    pub fn last_save(&self) -> Option<DateTime<Utc>> {
        *self.last_save.lock()
    }

    /// Read the snapshot file, if one exists
    pub fn read_snapshot(&self) -> Result<Option<CatalogSnapshot>> {
        if !self.snapshot_path.exists() {
            return Ok(None);
        }

        let data = std::fs::read(&self.snapshot_path)?;
        let snapshot: CatalogSnapshot = bincode::deserialize(&data)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StorageError::UnsupportedVersion(snapshot.version));
        }
        Ok(Some(snapshot))
    }

    /// Restore products from disk into `catalog`.
    ///
    /// Returns the number of products restored. Products whose embedding no
    /// longer fits the catalog are skipped.
    pub fn load(&self, catalog: &ProductCatalog) -> Result<usize> {
        let Some(snapshot) = self.read_snapshot()? else {
            debug!("No snapshot at {:?}", self.snapshot_path);
            return Ok(0);
        };

        if snapshot.vector_dim != catalog.vector_dim() {
            warn!(
                "Snapshot vector dimension {} differs from catalog dimension {}",
                snapshot.vector_dim,
                catalog.vector_dim()
            );
        }

        if let Some(stored) = distance_mismatch(&snapshot, catalog) {
            warn!(
                "Snapshot was written with the {} metric but the catalog uses {}; rankings may differ",
                stored,
                catalog.distance()
            );
        }

        let mut restored = 0;
        for record in snapshot.products {
            let product = Product::from(record);
            let id = product.id;
            match catalog.upsert(product) {
                Ok(()) => restored += 1,
                Err(e) => warn!("Failed to restore product {}: {}", id, e),
            }
        }

        info!(
            "Loaded {} products from {:?}",
            restored, self.snapshot_path
        );
        Ok(restored)
    }

    /// Build a catalog from the snapshot, falling back to `config` when the
    /// snapshot does not exist
    pub fn restore(&self, config: CatalogConfig) -> Result<ProductCatalog> {
        let catalog = ProductCatalog::new(config);
        self.load(&catalog)?;
        Ok(catalog)
    }

    /// Write the full catalog to disk atomically.
    pub fn save(&self, catalog: &ProductCatalog) -> Result<usize> {
        let mut products = catalog.products();
        products.sort_by_key(|p| p.id);

        let now = Utc::now();
        let snapshot = CatalogSnapshot {
            version: SNAPSHOT_VERSION,
            vector_dim: catalog.vector_dim(),
            distance: catalog.distance().to_string(),
            products: products.iter().map(ProductRecord::from).collect(),
            created_at: now.timestamp() as u64,
        };
        let data =
            bincode::serialize(&snapshot).map_err(|e| StorageError::Encode(e.to_string()))?;

        AtomicFile::new(&self.snapshot_path, OverwriteBehavior::AllowOverwrite)
            .write(|f| f.write_all(&data))
            .map_err(|e| match e {
                atomicwrites::Error::Internal(e) | atomicwrites::Error::User(e) => {
                    StorageError::Io(e)
                }
            })?;

        *self.last_save.lock() = Some(now);
        debug!(
            "Saved {} products ({} bytes) to {:?}",
            products.len(),
            data.len(),
            self.snapshot_path
        );
        Ok(products.len())
    }

    /// Periodically save `catalog` on a dedicated thread until
    /// [`CatalogStore::stop_background_save`] is called.
    pub fn spawn_background_save(
        self: &Arc<Self>,
        catalog: Arc<ProductCatalog>,
        interval: Duration,
    ) -> JoinHandle<()> {
        let store = Arc::clone(self);
        let tick = interval.min(Duration::from_millis(250));

        std::thread::spawn(move || {
            let mut elapsed = Duration::ZERO;
            while !store.shutdown.load(Ordering::Acquire) {
                std::thread::sleep(tick);
                elapsed += tick;
                if elapsed < interval {
                    continue;
                }
                elapsed = Duration::ZERO;
                if let Err(e) = store.save(&catalog) {
                    error!("Background save error: {}", e);
                }
            }
            debug!("Background save thread stopped");
        })
    }

    pub fn stop_background_save(&self) {
        self.shutdown.store(true, Ordering::Release);
    }
}

/// The snapshot's metric when it differs from the catalog's.
///
/// An unreadable metric name is reported as a mismatch with the catalog's
/// default metric.
pub fn distance_mismatch(snapshot: &CatalogSnapshot, catalog: &ProductCatalog) -> Option<Distance> {
    let stored = snapshot.distance.parse::<Distance>().unwrap_or_else(|_| {
        warn!("Snapshot has unknown distance metric {:?}", snapshot.distance);
        Distance::default()
    });
    (stored != catalog.distance()).then_some(stored)
}
