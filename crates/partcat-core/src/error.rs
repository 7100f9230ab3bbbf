//! Error types for partcat core library.
//!
//! Uses hierarchical domain-specific errors following the thiserror pattern.

use thiserror::Error;

/// Result type alias for partcat operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for partcat.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog-related error
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Catalog-specific errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The requested partition does not exist
    #[error("Partition {values:?} not found in table {table}")]
    PartitionNotFound { table: String, values: Vec<String> },

    /// The database or table does not exist
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// The partition being created already exists
    #[error("Partition {values:?} already exists in table {table}")]
    AlreadyExists { table: String, values: Vec<String> },

    /// The table has no partitions at all
    #[error("No partitions found in table {table}")]
    NoPartitions { table: String },

    /// Any other failure reported by the catalog service
    #[error("{operation} failed (status {status:?}): {message}")]
    Service {
        operation: &'static str,
        status: Option<u16>,
        message: String,
    },

    /// Rejected before reaching the service
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CatalogError {
    /// Whether this error means the addressed entity is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::PartitionNotFound { .. } | CatalogError::TableNotFound(_)
        )
    }

    /// HTTP status reported by the service, when known.
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::Service { status, .. } => *status,
            _ => None,
        }
    }
}

impl Error {
    /// Borrow the catalog error, if this is one.
    pub fn as_catalog(&self) -> Option<&CatalogError> {
        match self {
            Error::Catalog(err) => Some(err),
            _ => None,
        }
    }
}

// Conversion implementations for external error types

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
