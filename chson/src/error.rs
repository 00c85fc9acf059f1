use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChsonError {
    #[error("Invalid JSON in {source_id}: {message}")]
    Parse { source_id: String, message: String },

    #[error("Unexpected document shape in {source_id}: {message}")]
    Shape { source_id: String, message: String },

    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Glob error: {0}")]
    Glob(String),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChsonError>;
