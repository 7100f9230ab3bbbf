//! partcat CLI - inspect and register Glue Data Catalog partitions.

use anyhow::Result;
use clap::{Parser, Subcommand};
use partcat_core::config::LogFormat;
use partcat_core::{CatalogError, Config};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

/// Default configuration file looked up when `--config` is not given.
const DEFAULT_CONFIG_PATH: &str = "partcat.toml";

/// Exit codes for CLI operations.
///
/// Following Unix conventions:
/// - 0: Success
/// - 1-127: Application errors
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExitCode {
    /// Successful execution
    Success = 0,
    /// Configuration error (invalid config file, bad values)
    ConfigError = 1,
    /// Catalog service error (Glue request failed)
    CatalogError = 2,
    /// Requested partition or table is absent, or the table has no partitions
    NotFound = 3,
    /// Invalid arguments rejected before reaching the catalog
    InvalidInput = 4,
    /// General runtime error
    RuntimeError = 10,
}

impl ExitCode {
    /// Convert an error to an exit code by inspecting its source.
    fn from_error(error: &anyhow::Error) -> Self {
        let catalog = error.downcast_ref::<CatalogError>().or_else(|| {
            error
                .downcast_ref::<partcat_core::Error>()
                .and_then(partcat_core::Error::as_catalog)
        });

        if let Some(err) = catalog {
            return match err {
                CatalogError::PartitionNotFound { .. }
                | CatalogError::TableNotFound(_)
                | CatalogError::NoPartitions { .. } => ExitCode::NotFound,
                CatalogError::InvalidInput(_) => ExitCode::InvalidInput,
                _ => ExitCode::CatalogError,
            };
        }

        match error.downcast_ref::<partcat_core::Error>() {
            Some(partcat_core::Error::Config(_)) => ExitCode::ConfigError,
            _ => ExitCode::RuntimeError,
        }
    }
}

#[derive(Parser)]
#[command(name = "partcat")]
#[command(about = "Glue Data Catalog partition CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the AWS region
    #[arg(long, global = true)]
    region: Option<String>,

    /// Override the Glue endpoint URL
    #[arg(long, global = true)]
    endpoint_url: Option<String>,

    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one partition
    Get {
        database: String,
        table: String,
        /// Partition values, in partition column order
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// List partitions, newest first value first
    List {
        database: String,
        table: String,
        /// Print full partition values instead of the first value only
        #[arg(long)]
        full: bool,
    },

    /// Show the partition with the greatest first value
    Last {
        database: String,
        table: String,
        /// Print full partition values instead of the first value only
        #[arg(long)]
        full: bool,
    },

    /// Register a partition (no-op when it already exists)
    Create {
        database: String,
        table: String,
        /// Storage location, e.g. s3://bucket/prefix/year=2024/
        #[arg(long)]
        location: String,
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Point an existing partition at a new location
    Update {
        database: String,
        table: String,
        /// New storage location
        #[arg(long)]
        location: String,
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() {
    let exit_code = run_cli().await;
    std::process::exit(exit_code as i32);
}

/// Main CLI execution logic with proper error handling.
async fn run_cli() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            return ExitCode::from_error(&e);
        }
    };

    init_tracing(&config, cli.verbose);

    let result = execute_command(cli, config).await;

    match result {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            ExitCode::from_error(&e)
        }
    }
}

/// Initialize logging. `RUST_LOG` wins over `-v`, which wins over the config level.
fn init_tracing(config: &Config, verbose: u8) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new(config.monitoring.log_level.as_directive()),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so command output stays pipeable
    match config.monitoring.log_format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    }
}

/// Execute the CLI command.
async fn execute_command(cli: Cli, mut config: Config) -> Result<()> {
    if let Some(region) = cli.region {
        config.catalog.aws_region = Some(region);
    }
    if let Some(endpoint) = cli.endpoint_url {
        config.catalog.endpoint_url = Some(endpoint);
    }

    let output = match cli.command {
        Commands::Validate => {
            config.validate()?;
            "Configuration is valid".to_string()
        }

        Commands::Get {
            database,
            table,
            values,
        } => {
            let client = commands::connect(&config).await?;
            commands::get(&client, &database, &table, values).await?
        }

        Commands::List {
            database,
            table,
            full,
        } => {
            let client = commands::connect(&config).await?;
            commands::list(&client, &database, &table, full).await?
        }

        Commands::Last {
            database,
            table,
            full,
        } => {
            let client = commands::connect(&config).await?;
            commands::last(&client, &database, &table, full).await?
        }

        Commands::Create {
            database,
            table,
            location,
            values,
        } => {
            let client = commands::connect(&config).await?;
            commands::create(&client, &database, &table, values, &location).await?
        }

        Commands::Update {
            database,
            table,
            location,
            values,
        } => {
            let client = commands::connect(&config).await?;
            commands::update(&client, &database, &table, values, &location).await?
        }
    };

    println!("{}", output);
    Ok(())
}

/// Load configuration from `path`, or from `partcat.toml` when present, or defaults.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            Config::from_file(Path::new(DEFAULT_CONFIG_PATH))?
        }
        None => Config::default(),
    };
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_for_catalog_errors() {
        let not_found = anyhow::Error::from(partcat_core::Error::from(
            CatalogError::NoPartitions {
                table: "sales.transactions".into(),
            },
        ));
        assert_eq!(ExitCode::from_error(&not_found), ExitCode::NotFound);

        let service = anyhow::Error::from(CatalogError::Service {
            operation: "CreatePartition",
            status: Some(500),
            message: "internal".into(),
        });
        assert_eq!(ExitCode::from_error(&service), ExitCode::CatalogError);

        let invalid = anyhow::Error::from(CatalogError::InvalidInput("empty".into()));
        assert_eq!(ExitCode::from_error(&invalid), ExitCode::InvalidInput);
    }

    #[test]
    fn test_exit_code_for_config_errors() {
        let err = anyhow::Error::from(partcat_core::Error::Config("bad".into()));
        assert_eq!(ExitCode::from_error(&err), ExitCode::ConfigError);

        let err = anyhow::anyhow!("something else");
        assert_eq!(ExitCode::from_error(&err), ExitCode::RuntimeError);
    }

    #[test]
    fn test_cli_parses_create() {
        let cli = Cli::try_parse_from([
            "partcat",
            "--region",
            "eu-west-1",
            "create",
            "sales",
            "transactions",
            "--location",
            "s3://lake/sales/transactions/2024/01/",
            "2024",
            "01",
        ])
        .unwrap();

        assert_eq!(cli.region.as_deref(), Some("eu-west-1"));
        match cli.command {
            Commands::Create {
                database,
                table,
                location,
                values,
            } => {
                assert_eq!(database, "sales");
                assert_eq!(table, "transactions");
                assert_eq!(location, "s3://lake/sales/transactions/2024/01/");
                assert_eq!(values, vec!["2024", "01"]);
            }
            _ => panic!("expected create command"),
        }
    }

    #[test]
    fn test_cli_requires_partition_values() {
        assert!(Cli::try_parse_from(["partcat", "get", "sales", "transactions"]).is_err());
    }

    #[test]
    fn test_load_config_without_file_uses_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.catalog.page_size, 500);
    }
}
