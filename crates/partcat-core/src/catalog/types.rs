//! Partition data model shared by every catalog service.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Hadoop text input format used for every partition created by partcat.
pub const TEXT_INPUT_FORMAT: &str = "org.apache.hadoop.mapred.TextInputFormat";

/// Hive text output format used for every partition created by partcat.
pub const HIVE_TEXT_OUTPUT_FORMAT: &str =
    "org.apache.hadoop.hive.ql.io.HiveIgnoreKeyTextOutputFormat";

/// Parquet Hive serde used for every partition created by partcat.
pub const PARQUET_HIVE_SERDE: &str = "org.apache.hadoop.hive.ql.io.parquet.serde.ParquetHiveSerDe";

/// Ordered partition values, e.g. `["2024", "01", "15"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartitionKey(Vec<String>);

impl PartitionKey {
    /// Build a key from any values, coercing each one to a string.
    pub fn new<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        Self(values.into_iter().map(|v| v.to_string()).collect())
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }

    /// The first value component, which drives listing order.
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_values(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for PartitionKey {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl From<&[&str]> for PartitionKey {
    fn from(values: &[&str]) -> Self {
        Self::new(values.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for PartitionKey {
    fn from(values: [&str; N]) -> Self {
        Self::new(values)
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// Serialization format metadata of a partition's storage descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageFormat {
    pub input_format: Option<String>,
    pub output_format: Option<String>,
    pub serialization_library: Option<String>,
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

impl StorageFormat {
    /// Text input/output formats with the Parquet Hive serde.
    ///
    /// Partitions are always created with this format; updates never touch it.
    pub fn hive_parquet() -> Self {
        Self {
            input_format: Some(TEXT_INPUT_FORMAT.to_string()),
            output_format: Some(HIVE_TEXT_OUTPUT_FORMAT.to_string()),
            serialization_library: Some(PARQUET_HIVE_SERDE.to_string()),
            parameters: HashMap::from([("serialization.format".to_string(), "1".to_string())]),
        }
    }
}

/// A partition with its storage location and format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionRecord {
    /// Partition values
    pub key: PartitionKey,
    /// Storage location URI (usually `s3://...`)
    pub location: Option<String>,
    /// Serialization format metadata
    #[serde(flatten)]
    pub format: StorageFormat,
}

impl PartitionRecord {
    /// Record for a new partition using the fixed creation format.
    pub fn for_creation(key: PartitionKey, location: impl Into<String>) -> Self {
        Self {
            key,
            location: Some(location.into()),
            format: StorageFormat::hive_parquet(),
        }
    }
}

/// One page of a partition listing.
#[derive(Debug, Clone, Default)]
pub struct PartitionPage {
    pub partitions: Vec<PartitionRecord>,
    /// Continuation token; `None` on the last page
    pub next_token: Option<String>,
}

/// Outcome of a create request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateOutcome {
    /// A new partition was registered
    Created,
    /// The partition was already present; nothing was written
    AlreadyExists,
}

/// Cache key for a table: `database.table`.
pub fn table_key(database: &str, table: &str) -> String {
    format!("{}.{}", database, table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_coerces_values() {
        let key = PartitionKey::new([2024, 1, 15]);
        assert_eq!(key.values(), &["2024", "1", "15"]);
        assert_eq!(key.first(), Some("2024"));
        assert_eq!(key.len(), 3);
    }

    #[test]
    fn test_key_display() {
        let key = PartitionKey::from(["2024", "03"]);
        assert_eq!(key.to_string(), "[2024, 03]");
        assert_eq!(PartitionKey::default().to_string(), "[]");
    }

    #[test]
    fn test_empty_key_has_no_first() {
        let key = PartitionKey::default();
        assert!(key.is_empty());
        assert!(key.first().is_none());
    }

    #[test]
    fn test_creation_record_format() {
        let record = PartitionRecord::for_creation(
            PartitionKey::from(["2024"]),
            "s3://bucket/sales/transactions/year=2024/",
        );
        assert_eq!(
            record.location.as_deref(),
            Some("s3://bucket/sales/transactions/year=2024/")
        );
        assert_eq!(record.format.input_format.as_deref(), Some(TEXT_INPUT_FORMAT));
        assert_eq!(
            record.format.output_format.as_deref(),
            Some(HIVE_TEXT_OUTPUT_FORMAT)
        );
        assert_eq!(
            record.format.serialization_library.as_deref(),
            Some(PARQUET_HIVE_SERDE)
        );
        assert_eq!(
            record.format.parameters.get("serialization.format"),
            Some(&"1".to_string())
        );
    }

    #[test]
    fn test_record_serializes_key_as_list() {
        let record = PartitionRecord::for_creation(PartitionKey::from(["2024", "01"]), "s3://b/");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["key"], serde_json::json!(["2024", "01"]));
        assert_eq!(json["serialization_library"], PARQUET_HIVE_SERDE);
    }

    #[test]
    fn test_table_key() {
        assert_eq!(table_key("sales", "transactions"), "sales.transactions");
    }
}
