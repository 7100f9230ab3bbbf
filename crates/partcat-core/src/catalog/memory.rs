//! In-memory partition service.
//!
//! Keeps partitions per table in insertion order and serves listings page by
//! page with numeric continuation tokens, the way Glue hands back partitions
//! in storage order. Call counters and failure injection make it the
//! backing service for client tests.

use crate::catalog::service::PartitionService;
use crate::catalog::types::{table_key, PartitionKey, PartitionPage, PartitionRecord};
use crate::{CatalogError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-operation call counters.
#[derive(Debug, Default)]
pub struct CallCounts {
    pub get_partition: AtomicU64,
    pub get_partitions: AtomicU64,
    pub create_partition: AtomicU64,
    pub update_partition: AtomicU64,
}

/// Process-local [`PartitionService`].
#[derive(Default)]
pub struct InMemoryPartitionService {
    tables: Mutex<HashMap<String, Vec<PartitionRecord>>>,
    failure: Mutex<Option<(usize, CatalogError)>>,
    calls: CallCounts,
}

impl InMemoryPartitionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty table so listings succeed instead of reporting not found.
    pub fn add_table(&self, database: &str, table: &str) {
        self.tables
            .lock()
            .entry(table_key(database, table))
            .or_default();
    }

    /// Seed a partition directly, bypassing duplicate checks and counters.
    pub fn insert(&self, database: &str, table: &str, record: PartitionRecord) {
        self.tables
            .lock()
            .entry(table_key(database, table))
            .or_default()
            .push(record);
    }

    /// Make the next service call fail with `error`.
    pub fn fail_next(&self, error: CatalogError) {
        self.fail_after(0, error);
    }

    /// Let `successes` calls through, then fail the following one with `error`.
    pub fn fail_after(&self, successes: usize, error: CatalogError) {
        *self.failure.lock() = Some((successes, error));
    }

    /// Number of partitions stored for a table.
    pub fn partition_count(&self, database: &str, table: &str) -> usize {
        self.tables
            .lock()
            .get(&table_key(database, table))
            .map_or(0, Vec::len)
    }

    pub fn calls(&self) -> &CallCounts {
        &self.calls
    }

    fn take_failure(&self) -> Result<()> {
        let mut failure = self.failure.lock();
        if let Some((remaining, _)) = failure.as_mut() {
            if *remaining > 0 {
                *remaining -= 1;
                return Ok(());
            }
        }
        match failure.take() {
            Some((_, err)) => Err(err.into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PartitionService for InMemoryPartitionService {
    async fn get_partition(
        &self,
        database: &str,
        table: &str,
        key: &PartitionKey,
    ) -> Result<PartitionRecord> {
        self.calls.get_partition.fetch_add(1, Ordering::Relaxed);
        self.take_failure()?;

        let name = table_key(database, table);
        self.tables
            .lock()
            .get(&name)
            .and_then(|records| records.iter().find(|r| &r.key == key))
            .cloned()
            .ok_or_else(|| {
                CatalogError::PartitionNotFound {
                    table: name,
                    values: key.values().to_vec(),
                }
                .into()
            })
    }

    async fn get_partitions(
        &self,
        database: &str,
        table: &str,
        page_size: i32,
        next_token: Option<String>,
    ) -> Result<PartitionPage> {
        self.calls.get_partitions.fetch_add(1, Ordering::Relaxed);
        self.take_failure()?;

        let name = table_key(database, table);
        let tables = self.tables.lock();
        let records = tables
            .get(&name)
            .ok_or_else(|| CatalogError::TableNotFound(name.clone()))?;

        let start = match next_token {
            Some(token) => token.parse::<usize>().map_err(|_| {
                CatalogError::InvalidInput(format!("invalid continuation token: {}", token))
            })?,
            None => 0,
        };
        let page_size = usize::try_from(page_size.max(1)).unwrap_or(1);
        let end = start.saturating_add(page_size).min(records.len());

        Ok(PartitionPage {
            partitions: records.get(start..end).unwrap_or_default().to_vec(),
            next_token: (end < records.len()).then(|| end.to_string()),
        })
    }

    async fn create_partition(
        &self,
        database: &str,
        table: &str,
        record: &PartitionRecord,
    ) -> Result<()> {
        self.calls.create_partition.fetch_add(1, Ordering::Relaxed);
        self.take_failure()?;

        let name = table_key(database, table);
        let mut tables = self.tables.lock();
        let records = tables
            .get_mut(&name)
            .ok_or_else(|| CatalogError::TableNotFound(name.clone()))?;

        if records.iter().any(|r| r.key == record.key) {
            return Err(CatalogError::AlreadyExists {
                table: name,
                values: record.key.values().to_vec(),
            }
            .into());
        }

        records.push(record.clone());
        Ok(())
    }

    async fn update_partition(
        &self,
        database: &str,
        table: &str,
        key: &PartitionKey,
        location: &str,
    ) -> Result<()> {
        self.calls.update_partition.fetch_add(1, Ordering::Relaxed);
        self.take_failure()?;

        let name = table_key(database, table);
        let mut tables = self.tables.lock();
        match tables
            .get_mut(&name)
            .and_then(|records| records.iter_mut().find(|r| &r.key == key))
        {
            Some(record) => {
                record.location = Some(location.to_string());
                Ok(())
            }
            // Glue answers an unknown partition with EntityNotFoundException (HTTP 400)
            None => Err(CatalogError::Service {
                operation: "UpdatePartition",
                status: Some(400),
                message: format!("partition {} not found in {}", key, name),
            }
            .into()),
        }
    }

    fn service_name(&self) -> &str {
        "memory"
    }
}
