//! Sofodata Core - publish in-memory tables as sofodata datasets
//!
//! This crate provides:
//! - Table: Arrow-backed dataset with named, typed columns
//! - Schema: column header inference for dataset registration
//! - Transport: blocking HTTP seam with a reqwest implementation
//! - Publisher: token, upload policy, upload and registration workflow

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// API request and response bodies
pub mod api;

/// Client configuration and credentials
pub mod config;

/// Error types
pub mod error;

/// Publish workflow
pub mod publish;

/// Column header inference
pub mod schema;

/// Temporary CSV files
pub mod staging;

/// Arrow-backed tables
pub mod table;

/// Random identifiers
pub mod token;

/// HTTP transport
pub mod transport;

pub use api::{AccessToken, DatasetRequest, UploadPolicy};
pub use config::{ClientConfig, Credentials};
pub use error::{PublishError, PublishResult};
pub use publish::{PublishOptions, Publisher, Step};
pub use schema::{infer_column_headers, ColumnDescriptor, ColumnKind, ColumnType};
pub use staging::StagedCsv;
pub use table::{Column, Table};
pub use token::generate_random_token;
pub use transport::{HttpResponse, ReqwestTransport, Transport};

/// Upload `table` to the production API and register it as a dataset.
///
/// With `debug` set, every response status and body is logged at `info`.
/// Returns the dataset record the service sends back.
///
/// # Errors
/// Returns error if any step of the workflow fails
pub fn publish_dataset(
    credentials: Credentials,
    table: &Table,
    name: &str,
    description: &str,
    debug: bool,
) -> PublishResult<serde_json::Value> {
    Publisher::new(credentials)?
        .with_options(PublishOptions { debug })
        .publish(table, name, description)
}
