use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;
pub const DEFAULT_MAX_OUTFITS_PER_ITEM: usize = 10;
pub const DEFAULT_SIMILAR_PRODUCTS_LIMIT: usize = 20;

/// Runtime settings for the HTTP layer
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Allowed CORS origins; `*` allows any origin
    pub cors_origins: Vec<String>,
    pub max_image_size: usize,
    pub allowed_image_types: Vec<String>,
    pub max_outfits_per_item: usize,
    pub similar_products_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from("./data"),
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:8080".to_string(),
                "http://127.0.0.1:8080".to_string(),
                "http://localhost:8000".to_string(),
            ],
            max_image_size: DEFAULT_MAX_IMAGE_SIZE,
            allowed_image_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
            max_outfits_per_item: DEFAULT_MAX_OUTFITS_PER_ITEM,
            similar_products_limit: DEFAULT_SIMILAR_PRODUCTS_LIMIT,
        }
    }
}

impl Settings {
    pub fn is_allowed_image_type(&self, content_type: &str) -> bool {
        self.allowed_image_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(content_type))
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}
