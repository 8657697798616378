use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Expected a JSON object at the root, found {0}")]
    RootNotObject(&'static str),

    #[error("Key {key:?} contains the path delimiter {delimiter:?}")]
    DelimiterInKey { key: String, delimiter: String },

    #[error("Path conflict at {0:?}: a value and a nested path share this prefix")]
    PathConflict(String),

    #[error("Flattened key {0:?} produced twice")]
    DuplicateKey(String),

    #[error("Malformed envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("URL error: {0}")]
    Url(String),
}

pub type Result<T> = std::result::Result<T, PersistError>;
