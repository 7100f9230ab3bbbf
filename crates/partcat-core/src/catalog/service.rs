//! Catalog service abstraction.
//!
//! A `PartitionService` is the remote metadata store holding databases,
//! tables and partitions. The client layers caching and not-found handling
//! on top of it; implementations report conditions as [`CatalogError`]s.
//!
//! [`CatalogError`]: crate::CatalogError

use crate::catalog::types::{PartitionKey, PartitionPage, PartitionRecord};
use crate::Result;
use async_trait::async_trait;

/// Trait defining partition operations of a catalog service.
#[async_trait]
pub trait PartitionService: Send + Sync {
    /// Fetch one partition by its exact values.
    ///
    /// Returns `CatalogError::PartitionNotFound` when it does not exist.
    async fn get_partition(
        &self,
        database: &str,
        table: &str,
        key: &PartitionKey,
    ) -> Result<PartitionRecord>;

    /// Fetch one page of a table's partitions.
    ///
    /// # Arguments
    /// * `page_size` - Maximum number of partitions in the page
    /// * `next_token` - Continuation token from the previous page, `None` for the first
    ///
    /// Returns `CatalogError::TableNotFound` when the table or database does not exist.
    async fn get_partitions(
        &self,
        database: &str,
        table: &str,
        page_size: i32,
        next_token: Option<String>,
    ) -> Result<PartitionPage>;

    /// Register a new partition.
    ///
    /// Returns `CatalogError::AlreadyExists` when the values are taken.
    async fn create_partition(
        &self,
        database: &str,
        table: &str,
        record: &PartitionRecord,
    ) -> Result<()>;

    /// Point an existing partition at a new storage location.
    async fn update_partition(
        &self,
        database: &str,
        table: &str,
        key: &PartitionKey,
        location: &str,
    ) -> Result<()>;

    /// Short name used in log lines.
    fn service_name(&self) -> &str;
}
