//! Glue Data Catalog partition access.
//!
//! This module provides the partition catalog client and its collaborators:
//!
//! - `PartitionCatalogClient`: cached CRUD and listing over a catalog service
//! - `PartitionService`: the seam to the remote catalog
//! - AWS Glue and in-memory service implementations
//! - Per-table listing cache with optional TTL and manual invalidation

mod client;
mod glue;
mod memory;
mod partition_cache;
mod service;
mod types;

pub use client::PartitionCatalogClient;
pub use glue::GluePartitionService;
pub use memory::{CallCounts, InMemoryPartitionService};
pub use partition_cache::{CacheStats, CacheSummary, PartitionCache, PartitionListing};
pub use service::PartitionService;
pub use types::{
    table_key, CreateOutcome, PartitionKey, PartitionPage, PartitionRecord, StorageFormat,
    HIVE_TEXT_OUTPUT_FORMAT, PARQUET_HIVE_SERDE, TEXT_INPUT_FORMAT,
};
