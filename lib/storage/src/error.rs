use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot encoding error: {0}")]
    Encode(String),

    #[error("Snapshot decoding error: {0}")]
    Decode(String),

    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),

    #[error("Catalog error: {0}")]
    Catalog(#[from] looq_core::Error),
}

impl From<bincode::Error> for StorageError {
    fn from(e: bincode::Error) -> Self {
        StorageError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
