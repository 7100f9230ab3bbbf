//! Partition command implementations.
//!
//! Each command renders its result as JSON text; `main` prints it.

use anyhow::{Context, Result};
use partcat_core::{CatalogError, Config, PartitionCatalogClient, PartitionKey};
use serde_json::json;

/// Build the Glue-backed client for a command.
pub async fn connect(config: &Config) -> Result<PartitionCatalogClient> {
    PartitionCatalogClient::from_config(config)
        .await
        .context("Failed to initialize Glue catalog client")
}

/// Show one partition.
pub async fn get(
    client: &PartitionCatalogClient,
    database: &str,
    table: &str,
    values: Vec<String>,
) -> Result<String> {
    let key = PartitionKey::from(values);
    match client.get_partition(database, table, &key).await? {
        Some(record) => Ok(serde_json::to_string_pretty(&record)?),
        None => Err(CatalogError::PartitionNotFound {
            table: format!("{}.{}", database, table),
            values: key.into_values(),
        }
        .into()),
    }
}

/// List first values, or full keys with `full`.
pub async fn list(
    client: &PartitionCatalogClient,
    database: &str,
    table: &str,
    full: bool,
) -> Result<String> {
    let rendered = if full {
        let listing = client.list_partitions(database, table).await?;
        serde_json::to_string_pretty(listing.as_slice())?
    } else {
        serde_json::to_string_pretty(&client.list_first_values(database, table).await?)?
    };
    Ok(rendered)
}

/// Show the last partition's first value, or its full key with `full`.
pub async fn last(
    client: &PartitionCatalogClient,
    database: &str,
    table: &str,
    full: bool,
) -> Result<String> {
    let rendered = if full {
        serde_json::to_string(&client.last_partition(database, table).await?)?
    } else {
        serde_json::to_string(&client.last_first_value(database, table).await?)?
    };
    Ok(rendered)
}

/// Register a partition.
pub async fn create(
    client: &PartitionCatalogClient,
    database: &str,
    table: &str,
    values: Vec<String>,
    location: &str,
) -> Result<String> {
    let key = PartitionKey::from(values);
    let outcome = client
        .create_partition(database, table, &key, location)
        .await?;
    Ok(json!({ "partition": key, "location": location, "outcome": outcome }).to_string())
}

/// Move a partition to a new location.
pub async fn update(
    client: &PartitionCatalogClient,
    database: &str,
    table: &str,
    values: Vec<String>,
    location: &str,
) -> Result<String> {
    let key = PartitionKey::from(values);
    client
        .update_partition(database, table, &key, location)
        .await?;
    Ok(json!({ "partition": key, "location": location, "outcome": "updated" }).to_string())
}
