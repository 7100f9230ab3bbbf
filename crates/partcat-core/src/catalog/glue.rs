//! AWS Glue partition service.
//!
//! Talks to the AWS Glue Data Catalog through `aws-sdk-glue`:
//! - Credentials always come from the SDK default chain (env vars, profile, IAM role)
//! - Region and endpoint can be overridden from configuration
//! - Retries follow the SDK's standard retry policy
//! - Not-found and already-exists conditions are classified from typed service errors

use crate::catalog::service::PartitionService;
use crate::catalog::types::{
    table_key, PartitionKey, PartitionPage, PartitionRecord, StorageFormat,
};
use crate::config::CatalogConfig;
use crate::{CatalogError, Result};
use async_trait::async_trait;
use aws_sdk_glue::config::http::HttpResponse;
use aws_sdk_glue::error::{DisplayErrorContext, SdkError};
use aws_sdk_glue::types::{Partition, PartitionInput, SerDeInfo, StorageDescriptor};
use aws_sdk_glue::Client as GlueClient;
use tracing::{debug, info};

/// Glue-backed implementation of [`PartitionService`].
pub struct GluePartitionService {
    /// AWS Glue client
    client: GlueClient,
    /// Glue catalog ID (defaults to AWS account ID)
    catalog_id: Option<String>,
}

impl GluePartitionService {
    /// Create a new Glue partition service from configuration.
    pub async fn new(config: &CatalogConfig) -> Result<Self> {
        let sdk_config = Self::build_aws_config(config).await;
        let client = GlueClient::new(&sdk_config);

        info!(
            region = ?sdk_config.region().map(|r| r.as_ref().to_string()),
            endpoint = ?config.endpoint_url,
            "AWS Glue partition service initialized"
        );

        Ok(Self::from_client(client, config.catalog_id.clone()))
    }

    /// Wrap an already configured Glue client.
    pub fn from_client(client: GlueClient, catalog_id: Option<String>) -> Self {
        Self { client, catalog_id }
    }

    /// The underlying AWS Glue client.
    pub fn client(&self) -> &GlueClient {
        &self.client
    }

    /// Build AWS configuration.
    async fn build_aws_config(config: &CatalogConfig) -> aws_config::SdkConfig {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = &config.aws_region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        } else {
            debug!("Using default AWS region chain");
        }

        if let Some(endpoint) = &config.endpoint_url {
            debug!(endpoint = %endpoint, "Using custom Glue endpoint");
            loader = loader.endpoint_url(endpoint);
        }

        loader.load().await
    }
}

/// Convert a Glue partition into a record.
fn record_from_glue(partition: &Partition) -> PartitionRecord {
    let sd = partition.storage_descriptor();
    let serde_info = sd.and_then(|sd| sd.serde_info());

    PartitionRecord {
        key: PartitionKey::from(partition.values().to_vec()),
        location: sd.and_then(|sd| sd.location()).map(str::to_string),
        format: StorageFormat {
            input_format: sd.and_then(|sd| sd.input_format()).map(str::to_string),
            output_format: sd.and_then(|sd| sd.output_format()).map(str::to_string),
            serialization_library: serde_info
                .and_then(|s| s.serialization_library())
                .map(str::to_string),
            parameters: serde_info
                .and_then(|s| s.parameters())
                .cloned()
                .unwrap_or_default(),
        },
    }
}

/// Build the full partition input used on creation.
fn creation_input(record: &PartitionRecord) -> PartitionInput {
    let serde_info = SerDeInfo::builder()
        .set_serialization_library(record.format.serialization_library.clone())
        .set_parameters(Some(record.format.parameters.clone()))
        .build();

    let storage_descriptor = StorageDescriptor::builder()
        .set_location(record.location.clone())
        .set_input_format(record.format.input_format.clone())
        .set_output_format(record.format.output_format.clone())
        .serde_info(serde_info)
        .build();

    PartitionInput::builder()
        .set_values(Some(record.key.values().to_vec()))
        .storage_descriptor(storage_descriptor)
        .build()
}

/// Build the location-only partition input used on update.
fn location_input(key: &PartitionKey, location: &str) -> PartitionInput {
    PartitionInput::builder()
        .set_values(Some(key.values().to_vec()))
        .storage_descriptor(StorageDescriptor::builder().location(location).build())
        .build()
}

/// Map any SDK failure to a service error carrying the HTTP status.
fn service_error<E>(operation: &'static str, err: &SdkError<E, HttpResponse>) -> CatalogError
where
    E: std::error::Error + 'static,
{
    CatalogError::Service {
        operation,
        status: err.raw_response().map(|r| r.status().as_u16()),
        message: DisplayErrorContext(err).to_string(),
    }
}

#[async_trait]
impl PartitionService for GluePartitionService {
    async fn get_partition(
        &self,
        database: &str,
        table: &str,
        key: &PartitionKey,
    ) -> Result<PartitionRecord> {
        let result = self
            .client
            .get_partition()
            .set_catalog_id(self.catalog_id.clone())
            .database_name(database)
            .table_name(table)
            .set_partition_values(Some(key.values().to_vec()))
            .send()
            .await;

        match result {
            Ok(output) => match output.partition() {
                Some(partition) => Ok(record_from_glue(partition)),
                None => Err(CatalogError::PartitionNotFound {
                    table: table_key(database, table),
                    values: key.values().to_vec(),
                }
                .into()),
            },
            Err(e) => {
                if e.as_service_error()
                    .is_some_and(|se| se.is_entity_not_found_exception())
                {
                    Err(CatalogError::PartitionNotFound {
                        table: table_key(database, table),
                        values: key.values().to_vec(),
                    }
                    .into())
                } else {
                    Err(service_error("GetPartition", &e).into())
                }
            }
        }
    }

    async fn get_partitions(
        &self,
        database: &str,
        table: &str,
        page_size: i32,
        next_token: Option<String>,
    ) -> Result<PartitionPage> {
        let result = self
            .client
            .get_partitions()
            .set_catalog_id(self.catalog_id.clone())
            .database_name(database)
            .table_name(table)
            .max_results(page_size)
            .exclude_column_schema(true)
            .set_next_token(next_token)
            .send()
            .await;

        match result {
            Ok(output) => Ok(PartitionPage {
                partitions: output.partitions().iter().map(record_from_glue).collect(),
                next_token: output
                    .next_token()
                    .filter(|t| !t.is_empty())
                    .map(str::to_string),
            }),
            Err(e) => {
                if e.as_service_error()
                    .is_some_and(|se| se.is_entity_not_found_exception())
                {
                    Err(CatalogError::TableNotFound(table_key(database, table)).into())
                } else {
                    Err(service_error("GetPartitions", &e).into())
                }
            }
        }
    }

    async fn create_partition(
        &self,
        database: &str,
        table: &str,
        record: &PartitionRecord,
    ) -> Result<()> {
        let result = self
            .client
            .create_partition()
            .set_catalog_id(self.catalog_id.clone())
            .database_name(database)
            .table_name(table)
            .partition_input(creation_input(record))
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if e.as_service_error()
                    .is_some_and(|se| se.is_already_exists_exception())
                {
                    Err(CatalogError::AlreadyExists {
                        table: table_key(database, table),
                        values: record.key.values().to_vec(),
                    }
                    .into())
                } else {
                    Err(service_error("CreatePartition", &e).into())
                }
            }
        }
    }

    async fn update_partition(
        &self,
        database: &str,
        table: &str,
        key: &PartitionKey,
        location: &str,
    ) -> Result<()> {
        self.client
            .update_partition()
            .set_catalog_id(self.catalog_id.clone())
            .database_name(database)
            .table_name(table)
            .set_partition_value_list(Some(key.values().to_vec()))
            .partition_input(location_input(key, location))
            .send()
            .await
            .map_err(|e| service_error("UpdatePartition", &e))?;

        Ok(())
    }

    fn service_name(&self) -> &str {
        "glue"
    }
}
