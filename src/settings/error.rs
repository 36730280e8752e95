use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("storage lock poisoned during {0}")]
    LockPoisoned(&'static str),

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}
