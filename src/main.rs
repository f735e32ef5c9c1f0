use clap::Parser;
use looq::logging;
use looq_api::{AppState, RestApi, Settings};
use looq_core::{CatalogConfig, Distance};
use looq_providers::{AmazonCredentials, ProductAggregator, ProvidersConfig};
use looq_storage::CatalogStore;
use looq_vision::{
    ColorHistogramEmbedder, GarmentRecognizer, ImageEmbedder, PrototypeClassifier, VisualSearch,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Fashion recognition and outfit recommendation service
#[derive(Parser, Debug)]
#[command(name = "looq")]
#[command(about = "Garment recognition, product search and outfit recommendations", long_about = None)]
struct Args {
    /// Address to bind the HTTP server to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// HTTP API port
    #[arg(short, long, env = "PORT", default_value_t = 8000)]
    port: u16,

    /// Path to the data directory
    #[arg(short, long, env = "DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Log level, overridden by RUST_LOG
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Directory for daily rotated log files
    #[arg(long, env = "LOG_DIR", default_value = "./logs")]
    log_dir: PathBuf,

    /// Number of daily log files to keep
    #[arg(long, env = "LOG_RETENTION_DAYS", default_value_t = logging::DEFAULT_RETENTION_DAYS)]
    log_retention_days: usize,

    /// Comma separated CORS origins, `*` for any
    #[arg(
        long,
        env = "CORS_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000,http://localhost:8080,http://127.0.0.1:8080,http://localhost:8000"
    )]
    cors_origins: Vec<String>,

    #[arg(long, env = "AMAZON_ACCESS_KEY")]
    amazon_access_key: Option<String>,

    #[arg(long, env = "AMAZON_SECRET_KEY", hide_env_values = true)]
    amazon_secret_key: Option<String>,

    #[arg(long, env = "AMAZON_ASSOCIATE_TAG")]
    amazon_associate_tag: Option<String>,

    #[arg(long, env = "ZALANDO_API_KEY", hide_env_values = true)]
    zalando_api_key: Option<String>,

    /// ONNX CLIP image encoder; requires the `clip` feature
    #[arg(long, env = "CLIP_MODEL_PATH")]
    clip_model_path: Option<PathBuf>,

    /// Max upload size in bytes
    #[arg(long, env = "MAX_IMAGE_SIZE", default_value_t = 10 * 1024 * 1024)]
    max_image_size: usize,

    #[arg(long, env = "MAX_OUTFITS_PER_ITEM", default_value_t = 10)]
    max_outfits_per_item: usize,

    #[arg(long, env = "SIMILAR_PRODUCTS_LIMIT", default_value_t = 20)]
    similar_products_limit: usize,

    /// Per-provider search timeout in seconds
    #[arg(long, env = "PROVIDER_TIMEOUT_SECS", default_value_t = 10)]
    provider_timeout_secs: u64,

    /// Seconds between catalog snapshots
    #[arg(long, env = "SNAPSHOT_INTERVAL_SECS", default_value_t = 300)]
    snapshot_interval_secs: u64,

    /// Embedding dimension of the catalog
    #[arg(long, env = "VECTOR_DIM", default_value_t = 512)]
    vector_dim: usize,

    /// Distance metric: cosine, euclidean or dot
    #[arg(long, env = "DISTANCE", default_value = "cosine")]
    distance: String,
}

impl Args {
    fn settings(&self) -> Settings {
        Settings {
            host: self.host.clone(),
            port: self.port,
            data_dir: self.data_dir.clone(),
            cors_origins: self.cors_origins.clone(),
            max_image_size: self.max_image_size,
            max_outfits_per_item: self.max_outfits_per_item,
            similar_products_limit: self.similar_products_limit,
            ..Settings::default()
        }
    }

    fn providers_config(&self) -> ProvidersConfig {
        ProvidersConfig {
            amazon: AmazonCredentials {
                access_key: self.amazon_access_key.clone(),
                secret_key: self.amazon_secret_key.clone(),
                associate_tag: self.amazon_associate_tag.clone(),
            },
            zalando_api_key: self.zalando_api_key.clone(),
            timeout: Duration::from_secs(self.provider_timeout_secs),
        }
    }
}

#[cfg(feature = "clip")]
fn build_embedder(args: &Args) -> anyhow::Result<Arc<dyn ImageEmbedder>> {
    use looq_vision::{ClipConfig, ClipEmbedder};

    match &args.clip_model_path {
        Some(path) => {
            let config = ClipConfig {
                model_path: path.clone(),
                dimension: args.vector_dim,
                ..ClipConfig::default()
            };
            Ok(Arc::new(ClipEmbedder::new(config)?))
        }
        None => Ok(Arc::new(ColorHistogramEmbedder::new())),
    }
}

#[cfg(not(feature = "clip"))]
fn build_embedder(args: &Args) -> anyhow::Result<Arc<dyn ImageEmbedder>> {
    if args.clip_model_path.is_some() {
        warn!("CLIP_MODEL_PATH is set but looq was built without the `clip` feature");
    }
    Ok(Arc::new(ColorHistogramEmbedder::new()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let _log_guard = logging::init(&args.log_level, &args.log_dir, args.log_retention_days)?;

    info!("Starting LOOQ v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);
    info!("Log directory: {:?}", args.log_dir);

    let distance: Distance = args.distance.parse()?;
    let store = Arc::new(CatalogStore::open(&args.data_dir)?);
    let catalog = Arc::new(store.restore(CatalogConfig {
        vector_dim: args.vector_dim,
        distance,
    })?);
    info!("Catalog ready with {} products", catalog.count());

    let embedder = build_embedder(&args)?;
    info!("Image embedder: {}", embedder.model_name());

    let classifier = Arc::new(PrototypeClassifier::from_catalog(&catalog));
    let search = VisualSearch::new(embedder, catalog.clone())?;
    let recognizer = GarmentRecognizer::new(search, classifier);
    let aggregator = ProductAggregator::from_config(args.providers_config());
    let state = AppState::new(args.settings(), recognizer, aggregator);

    let save_handle = store.spawn_background_save(
        catalog.clone(),
        Duration::from_secs(args.snapshot_interval_secs.max(1)),
    );

    let http_handle = std::thread::spawn(move || {
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(state).await {
                error!("HTTP server error: {}", e);
            }
        })
    });

    info!("LOOQ started successfully");
    info!("HTTP API: http://localhost:{}/", args.port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    store.stop_background_save();
    if save_handle.join().is_err() {
        warn!("Background save thread panicked");
    }
    let saved = store.save(&catalog)?;
    info!("Saved {} products to {:?}", saved, store.snapshot_path());
    Ok(())
}
