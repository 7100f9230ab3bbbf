//! partcat core - cached access to AWS Glue Data Catalog partitions
//!
//! This library fetches, lists, creates and updates partitions of Hive-style
//! tables registered in Glue:
//!
//! - One explicitly constructed client owning the service handle and cache
//! - Per-table listings sorted descending by first partition value
//! - Not-found reads become absent or empty results
//! - Write failures are logged and returned as errors

pub mod catalog;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use catalog::{CreateOutcome, PartitionCatalogClient, PartitionKey, PartitionRecord};
pub use config::Config;
pub use error::{CatalogError, Error, Result};
