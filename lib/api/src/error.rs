use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use looq_providers::ProviderError;
use looq_vision::VisionError;
use thiserror::Error;
use tracing::error;

/// Errors returned by HTTP handlers, rendered as `{"error": "..."}`
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    NotImplemented(String),

    #[error("{0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Internal(msg) = self {
            error!("Internal error: {}", msg);
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

impl From<looq_core::Error> for ApiError {
    fn from(e: looq_core::Error) -> Self {
        use looq_core::Error;
        match e {
            Error::ProductNotFound(_) => ApiError::NotFound(e.to_string()),
            Error::InvalidDimension { .. }
            | Error::EmptyVector
            | Error::UnknownCategory(_)
            | Error::InvalidConfig(_) => ApiError::BadRequest(e.to_string()),
            Error::Io(_) | Error::Serialization(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<VisionError> for ApiError {
    fn from(e: VisionError) -> Self {
        match e {
            VisionError::Decode(_) | VisionError::MissingInput => {
                ApiError::BadRequest(e.to_string())
            }
            VisionError::Core(inner) => inner.into(),
            VisionError::ModelNotFound(_)
            | VisionError::Inference(_)
            | VisionError::DimensionMismatch { .. } => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<ProviderError> for ApiError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Unsupported { .. } => ApiError::NotImplemented(e.to_string()),
            ProviderError::UnknownProvider(_) => ApiError::NotFound(e.to_string()),
            ProviderError::Timeout { .. } | ProviderError::Upstream { .. } => {
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<actix_web::error::BlockingError> for ApiError {
    fn from(e: actix_web::error::BlockingError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
