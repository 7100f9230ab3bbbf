//! Cached partition catalog client.
//!
//! `PartitionCatalogClient` is the one handle callers hold: it owns the
//! catalog service and the per-table listing cache. Construct it once at
//! start-up and share it (`Arc`) with whatever needs partition metadata.
//!
//! Reads turn "not found" into absent or empty results. Writes log every
//! failure with the table and key, then return it to the caller.

use crate::catalog::glue::GluePartitionService;
use crate::catalog::partition_cache::{CacheStats, CacheSummary, PartitionCache, PartitionListing};
use crate::catalog::service::PartitionService;
use crate::catalog::types::{table_key, CreateOutcome, PartitionKey, PartitionRecord};
use crate::config::{CacheConfig, Config, MAX_PAGE_SIZE};
use crate::{CatalogError, Error, Result};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Cached client over a [`PartitionService`].
pub struct PartitionCatalogClient {
    service: Arc<dyn PartitionService>,
    cache: PartitionCache,
    page_size: i32,
}

impl PartitionCatalogClient {
    /// Create a client over an existing service.
    ///
    /// `page_size` is clamped to `1..=MAX_PAGE_SIZE`, the range Glue accepts.
    pub fn new(service: Arc<dyn PartitionService>, page_size: i32, cache: &CacheConfig) -> Self {
        let clamped = page_size.clamp(1, MAX_PAGE_SIZE);
        if clamped != page_size {
            warn!(requested = page_size, page_size = clamped, "Page size out of range, clamped");
        }
        let page_size = clamped;
        info!(
            service = service.service_name(),
            page_size,
            ttl_seconds = ?cache.ttl_seconds,
            "Partition catalog client initialized"
        );
        Self {
            service,
            cache: PartitionCache::with_config(cache),
            page_size,
        }
    }

    /// Build the Glue service described by `config` and wrap it.
    pub async fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let service = GluePartitionService::new(&config.catalog).await?;
        Ok(Self::new(
            Arc::new(service),
            config.catalog.page_size,
            &config.cache,
        ))
    }

    /// The underlying catalog service, built once with the client.
    pub fn client(&self) -> &dyn PartitionService {
        self.service.as_ref()
    }

    /// Fetch one partition, bypassing the cache.
    ///
    /// A missing partition (or table) yields `Ok(None)`.
    pub async fn get_partition(
        &self,
        database: &str,
        table: &str,
        key: &PartitionKey,
    ) -> Result<Option<PartitionRecord>> {
        check_names(database, table)?;

        match self.service.get_partition(database, table, key).await {
            Ok(record) => Ok(Some(record)),
            Err(Error::Catalog(e)) if e.is_not_found() => {
                warn!(
                    database = %database,
                    table = %table,
                    partition = %key,
                    "Partition does not exist"
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// All partition keys of a table, sorted descending by first value.
    ///
    /// The first call per table pages through the service and caches the
    /// result; later calls return the same shared listing without touching
    /// the service. A missing table caches what was collected so far.
    pub async fn list_partitions(&self, database: &str, table: &str) -> Result<PartitionListing> {
        check_names(database, table)?;
        let name = table_key(database, table);

        if let Some(cached) = self.cache.get(&name) {
            debug!(table = %name, partitions = cached.len(), "Partition listing cache hit");
            return Ok(cached);
        }

        let mut partitions = Vec::new();
        let mut next_token = None;
        let mut pages = 0usize;
        loop {
            let page = match self
                .service
                .get_partitions(database, table, self.page_size, next_token.take())
                .await
            {
                Ok(page) => page,
                Err(Error::Catalog(e)) if e.is_not_found() => {
                    warn!(
                        database = %database,
                        table = %table,
                        error = %e,
                        "Failed to list partitions"
                    );
                    break;
                }
                Err(e) => return Err(e),
            };

            pages += 1;
            partitions.extend(page.partitions.into_iter().map(|r| r.key));

            match page.next_token {
                Some(token) => next_token = Some(token),
                None => break,
            }
        }

        sort_descending_by_first_value(&mut partitions);
        debug!(
            table = %name,
            pages,
            partitions = partitions.len(),
            "Listed partitions"
        );
        Ok(self.cache.insert(&name, partitions))
    }

    /// First value of every partition, in listing order.
    pub async fn list_first_values(&self, database: &str, table: &str) -> Result<Vec<String>> {
        let listing = self.list_partitions(database, table).await?;
        Ok(first_values(&listing))
    }

    /// Register a partition with the fixed Hive Parquet storage format.
    ///
    /// An existing partition is left untouched and reported as
    /// [`CreateOutcome::AlreadyExists`].
    pub async fn create_partition(
        &self,
        database: &str,
        table: &str,
        key: &PartitionKey,
        location: &str,
    ) -> Result<CreateOutcome> {
        match self.get_partition(database, table, key).await {
            Ok(Some(_)) => {
                warn!(
                    database = %database,
                    table = %table,
                    partition = %key,
                    "Partition already exists"
                );
                return Ok(CreateOutcome::AlreadyExists);
            }
            Ok(None) => {}
            Err(e) => {
                error!(
                    table = %table_key(database, table),
                    partition = %key,
                    error = %e,
                    "Failed to create partition"
                );
                return Err(e);
            }
        }

        debug!(partition = %key, location = %location, "Creating partition");
        let record = PartitionRecord::for_creation(key.clone(), location);
        match self.service.create_partition(database, table, &record).await {
            Ok(()) => {
                debug!(table = %table_key(database, table), partition = %key, "Created partition");
                Ok(CreateOutcome::Created)
            }
            Err(Error::Catalog(CatalogError::AlreadyExists { .. })) => {
                warn!(
                    database = %database,
                    table = %table,
                    partition = %key,
                    "Partition already exists"
                );
                Ok(CreateOutcome::AlreadyExists)
            }
            Err(e) => {
                error!(
                    table = %table_key(database, table),
                    partition = %key,
                    error = %e,
                    "Failed to create partition"
                );
                Err(e)
            }
        }
    }

    /// Point an existing partition at `location`, leaving everything else as is.
    pub async fn update_partition(
        &self,
        database: &str,
        table: &str,
        key: &PartitionKey,
        location: &str,
    ) -> Result<()> {
        check_names(database, table)?;

        match self
            .service
            .update_partition(database, table, key, location)
            .await
        {
            Ok(()) => {
                debug!(table = %table_key(database, table), partition = %key, "Updated partition");
                Ok(())
            }
            Err(e) => {
                error!(
                    table = %table_key(database, table),
                    partition = %key,
                    status = ?e.as_catalog().and_then(CatalogError::status),
                    error = %e,
                    "Failed to update partition"
                );
                Err(e)
            }
        }
    }

    /// The first partition of the listing (greatest first value).
    pub async fn last_partition(&self, database: &str, table: &str) -> Result<PartitionKey> {
        let listing = self.list_partitions(database, table).await?;
        listing.first().cloned().ok_or_else(|| {
            CatalogError::NoPartitions {
                table: table_key(database, table),
            }
            .into()
        })
    }

    /// First value of [`Self::last_partition`].
    pub async fn last_first_value(&self, database: &str, table: &str) -> Result<String> {
        let key = self.last_partition(database, table).await?;
        Ok(key.first().unwrap_or_default().to_string())
    }

    /// Drop one table's cached listing. Returns whether one was cached.
    pub fn invalidate(&self, database: &str, table: &str) -> bool {
        self.cache.invalidate(&table_key(database, table))
    }

    /// Drop every cached listing.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    pub fn cache_summary(&self) -> CacheSummary {
        self.cache.summary()
    }
}

fn check_names(database: &str, table: &str) -> Result<()> {
    if database.is_empty() || table.is_empty() {
        return Err(CatalogError::InvalidInput(format!(
            "database and table names are required, got '{}.{}'",
            database, table
        ))
        .into());
    }
    Ok(())
}

/// Stable descending sort by first value over the whole listing.
fn sort_descending_by_first_value(partitions: &mut [PartitionKey]) {
    partitions.sort_by(|a, b| b.first().cmp(&a.first()));
}

fn first_values(partitions: &[PartitionKey]) -> Vec<String> {
    partitions
        .iter()
        .map(|k| k.first().unwrap_or_default().to_string())
        .collect()
}
