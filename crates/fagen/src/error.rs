use fagen_core::MetadataError;

#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
pub enum Error {
    #[error("Generic {0}")]
    Generic(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed metadata: {0}")]
    MalformedMetadata(String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<MetadataError> for Error {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::NotFound(path) => {
                Error::NotFound(format!("metadata/icons.json below {}", path.display()))
            }
            MetadataError::Malformed(msg) => Error::MalformedMetadata(msg),
            MetadataError::InvalidVersion(version) => Error::InvalidVersion(version),
            MetadataError::Io(msg) => Error::Io(msg),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Archive(err.to_string())
    }
}
