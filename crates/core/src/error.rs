use std::path::PathBuf;

/// Error type for metadata parsing and validation
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("Metadata file not found below {}", .0.display())]
    NotFound(PathBuf),

    #[error("Malformed metadata: {0}")]
    Malformed(String),

    #[error("Invalid version: {0:?} (expected a dotted numeric version like 6.7.2)")]
    InvalidVersion(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for MetadataError {
    fn from(err: std::io::Error) -> Self {
        MetadataError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MetadataError {
    fn from(err: serde_json::Error) -> Self {
        MetadataError::Malformed(err.to_string())
    }
}
