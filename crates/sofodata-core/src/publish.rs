//! Publishing a table as a sofodata dataset
//!
//! [`Publisher::publish`] runs the whole workflow:
//!
//! 1. Stage the table as a CSV file in the temp directory
//! 2. Infer the column headers from the table schema
//! 3. Exchange the client credentials for an access token
//! 4. Request a pre-signed upload policy
//! 5. Upload the CSV to the storage URL from the policy
//! 6. Delete the staged file
//! 7. Register the dataset, which triggers its deployment
//!
//! Each step is also available on its own.

use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::api::{parse_body, AccessToken, DatasetRequest, TokenRequest, UploadPolicy};
use crate::config::{ClientConfig, Credentials};
use crate::error::{PublishError, PublishResult};
use crate::schema::infer_column_headers;
use crate::staging::StagedCsv;
use crate::table::Table;
use crate::transport::{HttpResponse, ReqwestTransport, Transport};

/// Path of the OAuth token endpoint.
pub const TOKEN_PATH: &str = "/v8/oauth/token";

/// Path of the upload policy endpoint.
pub const POLICY_PATH: &str = "/v8/signature/policy";

/// Path of the dataset collection endpoint.
pub const DATASETS_PATH: &str = "/v8/dataSets";

/// Multipart field the CSV is sent under.
pub const UPLOAD_FILE_FIELD: &str = "file";

/// Remote step of the publish workflow, used to label errors and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Authenticate,
    UploadPolicy,
    Upload,
    CreateDataset,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::Authenticate => "token request",
            Step::UploadPolicy => "upload policy request",
            Step::Upload => "upload",
            Step::CreateDataset => "dataset registration",
        })
    }
}

/// Options for a publish call.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublishOptions {
    /// Log every response status and raw body at `info` level.
    pub debug: bool,
}

/// Client that publishes tables to the dataset API.
pub struct Publisher<T: Transport = ReqwestTransport> {
    credentials: Credentials,
    config: ClientConfig,
    options: PublishOptions,
    transport: T,
}

impl Publisher<ReqwestTransport> {
    /// Create a publisher for the production API.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(credentials: Credentials) -> PublishResult<Self> {
        Self::with_config(credentials, ClientConfig::default())
    }

    /// Create a publisher with custom configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> PublishResult<Self> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(credentials, config, transport))
    }
}

impl<T: Transport> Publisher<T> {
    /// Create a publisher that sends its requests through `transport`.
    pub fn with_transport(credentials: Credentials, config: ClientConfig, transport: T) -> Self {
        Self {
            credentials,
            config,
            options: PublishOptions::default(),
            transport,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: PublishOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Upload `table` and register it as a dataset named `name`.
    ///
    /// Returns the registration response as sent by the service. Every call
    /// creates a new dataset; nothing is deduplicated.
    ///
    /// # Errors
    /// Returns error if the table cannot be staged, any request fails, or a
    /// response lacks an expected field. The staged CSV is removed in every case.
    pub fn publish(&self, table: &Table, name: &str, description: &str) -> PublishResult<Value> {
        if table.num_columns() == 0 {
            return Err(PublishError::Schema("table has no columns".to_string()));
        }

        let staged = self.stage_csv(table)?;
        let column_headers = infer_column_headers(table.schema());

        let token = self.fetch_access_token()?;
        let policy = self.request_upload_policy(&token)?;
        self.upload(&policy, staged.path())?;

        tracing::debug!(path = %staged.path().display(), "Deleting staged CSV");
        staged.remove()?;

        let request = DatasetRequest::new(name, description, &policy, column_headers);
        self.create_dataset(&token, &request)
    }

    /// Write `table` to a uniquely named CSV in the configured temp directory.
    ///
    /// # Errors
    /// Returns error if the file cannot be written
    pub fn stage_csv(&self, table: &Table) -> PublishResult<StagedCsv> {
        let staged = StagedCsv::write(table, &self.config.temp_dir)?;
        tracing::debug!(
            path = %staged.path().display(),
            rows = table.num_rows(),
            columns = table.num_columns(),
            "Staged table as CSV"
        );
        Ok(staged)
    }

    /// Exchange the client credentials for a bearer token.
    ///
    /// # Errors
    /// Returns error if the request fails or the response has no `access_token`
    pub fn fetch_access_token(&self) -> PublishResult<AccessToken> {
        tracing::debug!("Requesting OAuth access token");
        let body = self.token_request_body();
        let response = self.transport.post_json(
            Step::Authenticate,
            &self.config.url(TOKEN_PATH),
            None,
            &body,
        )?;
        self.log_response(Step::Authenticate, &response);
        AccessToken::from_response(&response)
    }

    /// Request a pre-signed policy for a single upload.
    ///
    /// # Errors
    /// Returns error if the request fails or the response lacks a policy field
    pub fn request_upload_policy(&self, token: &AccessToken) -> PublishResult<UploadPolicy> {
        tracing::debug!("Requesting upload signature and policy");
        let body = self.policy_request_body();
        let response = self.transport.post_json(
            Step::UploadPolicy,
            &self.config.url(POLICY_PATH),
            Some(token.as_str()),
            &body,
        )?;
        self.log_response(Step::UploadPolicy, &response);
        UploadPolicy::from_response(&response)
    }

    /// Upload the file at `path` to the storage target described by `policy`.
    ///
    /// A non-success status from the storage service is logged but not
    /// returned as an error.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or the request cannot be sent
    pub fn upload(&self, policy: &UploadPolicy, path: &Path) -> PublishResult<HttpResponse> {
        tracing::debug!(url = %policy.upload_url, key = %policy.object_key, "Uploading CSV");
        let response = self.transport.post_multipart(
            Step::Upload,
            &policy.upload_url,
            &policy.form_fields(),
            UPLOAD_FILE_FIELD,
            path,
        )?;
        self.log_response(Step::Upload, &response);
        if !response.is_success() {
            tracing::warn!(status = response.status, "Upload was not accepted by storage");
        }
        Ok(response)
    }

    /// Register an uploaded file as a dataset pending deployment.
    ///
    /// # Errors
    /// Returns error if the request fails or the response is not JSON
    pub fn create_dataset(
        &self,
        token: &AccessToken,
        request: &DatasetRequest,
    ) -> PublishResult<Value> {
        tracing::debug!(name = %request.name, "Creating dataset");
        let body = request.to_json();
        let response = self.transport.post_json(
            Step::CreateDataset,
            &self.config.url(DATASETS_PATH),
            Some(token.as_str()),
            &body,
        )?;
        self.log_response(Step::CreateDataset, &response);
        parse_body(Step::CreateDataset, &response)
    }

    fn token_request_body(&self) -> Value {
        TokenRequest::new(&self.credentials, &self.config.audience).to_json()
    }

    /// Body of the upload policy request.
    ///
    /// The live API receives the token request body here, client secret
    /// included. Kept as-is until the endpoint documents a scoped payload.
    fn policy_request_body(&self) -> Value {
        self.token_request_body()
    }

    fn log_response(&self, step: Step, response: &HttpResponse) {
        if self.options.debug {
            tracing::info!(
                step = %step,
                status = response.status,
                body = %response.body,
                "Response"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_display() {
        assert_eq!(Step::Authenticate.to_string(), "token request");
        assert_eq!(Step::UploadPolicy.to_string(), "upload policy request");
        assert_eq!(Step::Upload.to_string(), "upload");
        assert_eq!(Step::CreateDataset.to_string(), "dataset registration");
    }

    #[test]
    fn test_default_options_are_quiet() {
        assert!(!PublishOptions::default().debug);
    }
}
