//! Implementation of the `sofodata publish` command.

use anyhow::{Context, Result};
use sofodata_core::{ClientConfig, Credentials, Publisher, Table};
use std::path::{Path, PathBuf};

/// Options for the publish command.
#[derive(Debug)]
pub struct PublishOptions {
    /// CSV file to publish.
    pub file: PathBuf,
    /// Dataset name. If None, derived from the file name.
    pub name: Option<String>,
    /// Dataset description.
    pub description: String,
    /// Log response statuses and bodies.
    pub debug: bool,
}

/// Publish a CSV file and print the dataset record returned by the service.
pub fn publish_file(options: PublishOptions) -> Result<()> {
    let table = Table::read_csv(&options.file)
        .with_context(|| format!("Failed to read '{}'", options.file.display()))?;
    let name = options
        .name
        .clone()
        .unwrap_or_else(|| dataset_name(&options.file));

    let credentials = Credentials::from_env().context("Missing API credentials")?;
    let publisher = Publisher::with_config(credentials, ClientConfig::from_env())?
        .with_options(sofodata_core::PublishOptions {
            debug: options.debug,
        });

    tracing::info!(
        file = %options.file.display(),
        rows = table.num_rows(),
        columns = table.num_columns(),
        "Publishing {name}"
    );
    let dataset = publisher
        .publish(&table, &name, &options.description)
        .with_context(|| format!("Failed to publish '{name}'"))?;

    println!("{}", serde_json::to_string_pretty(&dataset)?);
    Ok(())
}

/// Default dataset name: the file name without its extension.
fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string())
}
