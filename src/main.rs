use clap::{Parser, Subcommand};
use jsonpath_rust::JsonPath;
use serde_json::Value;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use opsteps::config::{ConfigError, OperationConfig};
use opsteps::http::{self, AppState};
use opsteps::operations::Resources;
use opsteps::providers::{JsonResponses, MemoryStore, OwnerPolicy, SlicePaginator};
use opsteps::{Params, PaginationResolver};

#[derive(Parser)]
#[command(name = "opsteps", version, about = "Pagination, model lookup and policy steps for CRUD pipelines")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve pagination parameters and print the outcome as JSON
    Resolve {
        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Request parameters, given as KEY=VALUE
        #[arg(value_parser = parse_param)]
        params: Vec<(String, String)>,
    },

    /// Serve a JSON data file through the index and show pipelines
    Serve {
        /// JSON file holding the records
        #[arg(long)]
        data: PathBuf,

        /// JSONPath selecting the records inside the data file
        #[arg(long, default_value = "$")]
        items_path: String,

        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Resource name used as the route prefix
        #[arg(long, default_value = "items")]
        resource: String,

        /// Restrict access to records whose FIELD matches the x-user-id header
        #[arg(long, value_name = "FIELD")]
        owner_field: Option<String>,

        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

fn load_config(path: Option<&Path>) -> Result<OperationConfig, ConfigError> {
    match path {
        Some(path) => OperationConfig::from_path(path),
        None => Ok(OperationConfig::default()),
    }
}

/// Read the data file and pick the records out of it
///
/// A query that selects a single array yields the array's elements;
/// otherwise every selected value is a record.
fn load_records(path: &Path, items_path: &str) -> Result<Vec<Value>, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let data: Value = serde_json::from_str(&json)?;

    let selected = data.query(items_path).map_err(|e| {
        ConfigError::invalid(format!("JSONPath query failed for '{}': {}", items_path, e))
    })?;

    let records: Vec<Value> = match selected.as_slice() {
        [Value::Array(items)] => items.clone(),
        values => values.iter().map(|v| (*v).clone()).collect(),
    };

    if let Some(bad) = records.iter().find(|record| !record.is_object()) {
        return Err(ConfigError::invalid(format!(
            "records selected by '{}' must be JSON objects, found {}",
            items_path, bad
        )));
    }

    Ok(records)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Resolve { config, params } => {
            let config = load_config(config.as_deref())?;
            let params = params
                .into_iter()
                .fold(Params::new(), |params, (key, value)| params.with(key, Value::String(value)));

            let outcome = PaginationResolver::new(config.pagination)?.resolve(&params);
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }

        Command::Serve {
            data,
            items_path,
            config,
            resource,
            owner_field,
            addr,
        } => {
            let config = load_config(config.as_deref())?;
            let store = MemoryStore::new(load_records(&data, &items_path)?);
            let records = store.len();

            let mut resources = Resources::new(Arc::new(store), Arc::new(SlicePaginator), Arc::new(JsonResponses));
            if let Some(field) = owner_field {
                resources = resources.with_policy(Arc::new(OwnerPolicy::new().with_owner_field(field)));
            }

            let app = http::router(AppState::new(&config, &resources)?, &format!("/{}", resource));

            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!(%addr, resource = %resource, records, "listening");
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
