//! # looq-api
//!
//! actix-web REST layer for LOOQ: garment recognition, provider product
//! search, outfit generation and catalog management.

pub mod catalog;
pub mod error;
pub mod rest;
pub mod settings;
pub mod state;
pub mod upload;

pub use error::{ApiError, ApiResult};
pub use rest::{configure, RestApi, SERVICE_NAME};
pub use settings::Settings;
pub use state::AppState;
