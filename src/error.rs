use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GchartError>;

#[derive(Error, Debug)]
pub enum GchartError {
    #[error("Repository unavailable: {path}: {reason}")]
    RepositoryUnavailable { path: PathBuf, reason: String },
    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),
    #[error("Invalid date range: {0}")]
    InvalidRange(String),
    #[error("Style mismatch: {0}")]
    StyleMismatch(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Object find error: {0}")]
    ObjectFind(#[from] Box<gix::object::find::existing::with_conversion::Error>),
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::reference::find::existing::Error> for GchartError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        GchartError::RefFind(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for GchartError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        GchartError::ObjectFind(Box::new(err))
    }
}
