use rocketfile_core::StructureError;
use thiserror::Error;

/// Fatal import errors. Anything recoverable becomes a warning instead.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid rocket structure: {0}")]
    Structure(#[from] StructureError),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid rocket structure: {0}")]
    Structure(#[from] StructureError),

    #[error("Failed to serialize document: {0}")]
    Serialize(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
