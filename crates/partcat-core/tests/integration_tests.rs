//! Integration tests for partcat-core.
//!
//! These run the partition catalog client against the in-memory service.
//! Tests against a live Glue catalog are marked with #[ignore].
//!
//! Run with: cargo test --test integration_tests -- --ignored

use partcat_core::catalog::{InMemoryPartitionService, PartitionService};
use partcat_core::config::CacheConfig;
use partcat_core::{CatalogError, CreateOutcome, PartitionCatalogClient, PartitionKey, PartitionRecord};
use std::sync::atomic::Ordering;
use std::sync::Arc;

const DB: &str = "sales";
const TABLE: &str = "transactions";

fn client_with(
    page_size: i32,
    partitions: &[&[&str]],
) -> (Arc<InMemoryPartitionService>, PartitionCatalogClient) {
    let service = Arc::new(InMemoryPartitionService::new());
    service.add_table(DB, TABLE);
    for values in partitions {
        let key = PartitionKey::from(*values);
        let location = format!("s3://lake/{}/{}/{}/", DB, TABLE, values.join("/"));
        service.insert(DB, TABLE, PartitionRecord::for_creation(key, location));
    }
    let client = PartitionCatalogClient::new(service.clone(), page_size, &CacheConfig::default());
    (service, client)
}

mod get_partition {
    use super::*;

    #[tokio::test]
    async fn test_missing_partition_is_absent() {
        let (_, client) = client_with(500, &[&["2024", "01"]]);

        for values in [["2024", "02"], ["1999", "01"]] {
            let found = client
                .get_partition(DB, TABLE, &PartitionKey::from(values))
                .await
                .unwrap();
            assert!(found.is_none());
        }
    }

    #[tokio::test]
    async fn test_missing_table_is_absent() {
        let (_, client) = client_with(500, &[]);
        let found = client
            .get_partition(DB, "nope", &PartitionKey::from(["2024"]))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_values_are_coerced_to_strings() {
        let (_, client) = client_with(500, &[&["2024", "1"]]);
        let record = client
            .get_partition(DB, TABLE, &PartitionKey::new([2024, 1]))
            .await
            .unwrap()
            .expect("partition should exist");

        assert_eq!(record.location.as_deref(), Some("s3://lake/sales/transactions/2024/1/"));
    }

    #[tokio::test]
    async fn test_get_bypasses_cache() {
        let (service, client) = client_with(500, &[&["2024"]]);
        client.list_partitions(DB, TABLE).await.unwrap();

        client
            .get_partition(DB, TABLE, &PartitionKey::from(["2024"]))
            .await
            .unwrap();
        client
            .get_partition(DB, TABLE, &PartitionKey::from(["2024"]))
            .await
            .unwrap();

        assert_eq!(service.calls().get_partition.load(Ordering::Relaxed), 2);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn test_second_listing_is_served_from_cache() {
        let (service, client) = client_with(2, &[&["2022"], &["2024"], &["2023"]]);

        let first = client.list_partitions(DB, TABLE).await.unwrap();
        let calls = service.calls().get_partitions.load(Ordering::Relaxed);
        let second = client.list_partitions(DB, TABLE).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(service.calls().get_partitions.load(Ordering::Relaxed), calls);
        assert_eq!(client.cache_stats().hits.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_first_values_match_full_keys() {
        let (_, client) = client_with(
            2,
            &[&["2023", "12"], &["2024", "02"], &["2024", "01"], &["2022", "06"]],
        );

        let full = client.list_partitions(DB, TABLE).await.unwrap();
        let heads = client.list_first_values(DB, TABLE).await.unwrap();

        let expected: Vec<String> = full.iter().map(|k| k.values()[0].clone()).collect();
        assert_eq!(heads, expected);
    }

    #[tokio::test]
    async fn test_pagination_collects_every_page() {
        let values: Vec<String> = (0..23).map(|i| format!("{:04}", 2000 + i)).collect();
        let keys: Vec<Vec<&str>> = values.iter().map(|v| vec![v.as_str()]).collect();
        let key_refs: Vec<&[&str]> = keys.iter().map(Vec::as_slice).collect();
        let (service, client) = client_with(5, &key_refs);

        let listing = client.list_partitions(DB, TABLE).await.unwrap();

        assert_eq!(listing.len(), 23);
        assert_eq!(service.calls().get_partitions.load(Ordering::Relaxed), 5);
    }

    #[tokio::test]
    async fn test_ordering_is_global_across_pages() {
        // Page 1 holds 2022/2023, page 2 holds 2024/2021
        let (_, client) = client_with(2, &[&["2022"], &["2023"], &["2024"], &["2021"]]);

        let heads = client.list_first_values(DB, TABLE).await.unwrap();
        assert_eq!(heads, vec!["2024", "2023", "2022", "2021"]);
    }

    #[tokio::test]
    async fn test_missing_table_lists_empty_and_caches() {
        let (service, client) = client_with(500, &[]);

        let listing = client.list_partitions(DB, "nope").await.unwrap();
        assert!(listing.is_empty());

        client.list_partitions(DB, "nope").await.unwrap();
        assert_eq!(service.calls().get_partitions.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_not_found_mid_listing_keeps_collected_pages() {
        let (service, client) = client_with(1, &[&["2022"], &["2024"], &["2023"]]);
        service.fail_after(2, CatalogError::TableNotFound("sales.transactions".into()));

        let listing = client.list_partitions(DB, TABLE).await.unwrap();
        assert_eq!(listing.as_slice(), &[PartitionKey::from(["2024"]), PartitionKey::from(["2022"])]);

        // What was collected stays cached
        client.list_partitions(DB, TABLE).await.unwrap();
        assert_eq!(service.calls().get_partitions.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn test_ttl_expiry_relists() {
        let service = Arc::new(InMemoryPartitionService::new());
        service.add_table(DB, TABLE);
        let client = PartitionCatalogClient::new(
            service.clone(),
            500,
            &CacheConfig {
                ttl_seconds: Some(0),
                max_tables: None,
            },
        );

        client.list_partitions(DB, TABLE).await.unwrap();
        client.list_partitions(DB, TABLE).await.unwrap();

        assert_eq!(service.calls().get_partitions.load(Ordering::Relaxed), 2);
    }
}

mod last_partition {
    use super::*;

    #[tokio::test]
    async fn test_sales_transactions_scenario() {
        let (_, client) = client_with(2, &[&["2024", "03"], &["2024", "01"], &["2024", "02"]]);

        assert_eq!(client.last_first_value(DB, TABLE).await.unwrap(), "2024");
        // Ties on the first value keep the service's order
        assert_eq!(
            client.last_partition(DB, TABLE).await.unwrap(),
            PartitionKey::from(["2024", "03"])
        );
    }

    #[tokio::test]
    async fn test_empty_table_is_a_defined_error() {
        let (_, client) = client_with(500, &[]);

        let err = client.last_first_value(DB, TABLE).await.unwrap_err();
        match err.as_catalog() {
            Some(CatalogError::NoPartitions { table }) => assert_eq!(table, "sales.transactions"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

mod writes {
    use super::*;

    #[tokio::test]
    async fn test_create_is_idempotent() {
        let (service, client) = client_with(500, &[]);
        let key = PartitionKey::from(["2024", "01", "15"]);

        let first = client
            .create_partition(DB, TABLE, &key, "s3://lake/sales/transactions/2024/01/15/")
            .await
            .unwrap();
        let second = client
            .create_partition(DB, TABLE, &key, "s3://lake/elsewhere/")
            .await
            .unwrap();

        assert_eq!(first, CreateOutcome::Created);
        assert_eq!(second, CreateOutcome::AlreadyExists);
        assert_eq!(service.partition_count(DB, TABLE), 1);
        assert_eq!(service.calls().create_partition.load(Ordering::Relaxed), 1);

        let stored = service.get_partition(DB, TABLE, &key).await.unwrap();
        assert_eq!(
            stored.location.as_deref(),
            Some("s3://lake/sales/transactions/2024/01/15/")
        );
        assert_eq!(
            stored.format.serialization_library.as_deref(),
            Some("org.apache.hadoop.hive.ql.io.parquet.serde.ParquetHiveSerDe")
        );
    }

    #[tokio::test]
    async fn test_update_changes_location() {
        let (service, client) = client_with(500, &[&["2024"]]);
        let key = PartitionKey::from(["2024"]);

        client
            .update_partition(DB, TABLE, &key, "s3://lake/moved/2024/")
            .await
            .unwrap();

        let stored = service.get_partition(DB, TABLE, &key).await.unwrap();
        assert_eq!(stored.location.as_deref(), Some("s3://lake/moved/2024/"));
    }

    #[tokio::test]
    async fn test_update_missing_partition_reports_status() {
        let (_, client) = client_with(500, &[]);

        let err = client
            .update_partition(DB, TABLE, &PartitionKey::from(["2030"]), "s3://lake/x/")
            .await
            .unwrap_err();

        assert_eq!(err.as_catalog().and_then(CatalogError::status), Some(400));
    }
}
