mod local_fs;
mod naming;

pub use local_fs::LocalFileStorage;
pub use naming::{NamingScheme, StampClock, extension_of, is_plain_name};

use async_trait::async_trait;
use mime::Mime;
use std::path::Path;
use thiserror::Error;

#[derive(Debug)]
pub struct FileData {
    pub bytes: Vec<u8>,
    /// Name the client supplied; only its extension survives storage.
    pub filename: String,
}

#[derive(Debug)]
pub struct StoredFile {
    pub bytes: Vec<u8>,
    pub content_type: Mime,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("File not found")]
    NotFound,
    #[error("Invalid file name: {0}")]
    InvalidName(String),
    #[error("Could not find a free name after {0} attempts")]
    NameExhausted(u64),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait Storage: Send + Sync + 'static {
    async fn save(&self, file_data: FileData) -> Result<String, StorageError>;
    async fn get(&self, name: &str) -> Result<StoredFile, StorageError>;
    async fn list(&self) -> Result<Vec<String>, StorageError>;
    fn root(&self) -> &Path;
}
