use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("feedback file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("feedback JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("atomic rename failed: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("{0}")]
    Other(String),
}
