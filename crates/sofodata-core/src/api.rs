//! Request and response bodies of the sofodata REST API

use serde_json::{json, Map, Value};

use crate::config::Credentials;
use crate::error::{PublishError, PublishResult};
use crate::publish::Step;
use crate::schema::ColumnDescriptor;
use crate::transport::HttpResponse;

/// Grant type for the OAuth token request.
pub const GRANT_TYPE: &str = "client_credentials";

/// Status a new dataset is created with; the service deploys it afterwards.
pub const PENDING_DEPLOYMENT: &str = "PENDING_DEPLOYMENT";

/// Body of the OAuth client-credentials token request.
#[derive(Debug, Clone)]
pub struct TokenRequest<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub audience: &'a str,
    pub grant_type: &'a str,
}

impl<'a> TokenRequest<'a> {
    #[must_use]
    pub fn new(credentials: &'a Credentials, audience: &'a str) -> Self {
        Self {
            client_id: &credentials.client_id,
            client_secret: &credentials.client_secret,
            audience,
            grant_type: GRANT_TYPE,
        }
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "client_id": self.client_id,
            "client_secret": self.client_secret,
            "audience": self.audience,
            "grant_type": self.grant_type,
        })
    }
}

/// Bearer token returned by the token endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn from_response(response: &HttpResponse) -> PublishResult<Self> {
        let body = parse_body(Step::Authenticate, response)?;
        let token = required_str(&body, Step::Authenticate, "access_token", response.status)?;
        Ok(Self(token))
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Pre-signed, single-use target for the CSV upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadPolicy {
    /// `s3UploadURL`
    pub upload_url: String,
    /// `s3BucketName`
    pub bucket_name: String,
    /// `s3ObjectKey`
    pub object_key: String,
    /// `policyDocument`: form fields that authorize the upload
    pub policy_document: Map<String, Value>,
}

impl UploadPolicy {
    pub(crate) fn from_response(response: &HttpResponse) -> PublishResult<Self> {
        let step = Step::UploadPolicy;
        let status = response.status;
        let body = parse_body(step, response)?;

        let upload_url = required_str(&body, step, "s3UploadURL", status)?;
        let bucket_name = required_str(&body, step, "s3BucketName", status)?;
        let object_key = required_str(&body, step, "s3ObjectKey", status)?;
        let policy_document = match body.get("policyDocument") {
            Some(Value::Object(map)) => map.clone(),
            Some(other) => {
                return Err(PublishError::InvalidJson {
                    step,
                    status,
                    message: format!("policyDocument is not an object: {other}"),
                })
            }
            None => {
                return Err(PublishError::MissingField {
                    step,
                    field: "policyDocument",
                    status,
                })
            }
        };

        Ok(Self {
            upload_url,
            bucket_name,
            object_key,
            policy_document,
        })
    }

    /// Policy document entries as multipart text fields, in key order.
    ///
    /// Non-string values are sent in their JSON form.
    #[must_use]
    pub fn form_fields(&self) -> Vec<(String, String)> {
        self.policy_document
            .iter()
            .map(|(k, v)| {
                let value = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), value)
            })
            .collect()
    }
}

/// Body of the dataset registration request.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRequest {
    pub name: String,
    pub description: String,
    pub status: String,
    /// `s3BucketName`
    pub bucket_name: String,
    /// `s3ObjectKey`
    pub object_key: String,
    pub file_type: String,
    pub file_contains_header: bool,
    pub column_delimiter: String,
    pub column_headers: Vec<ColumnDescriptor>,
}

impl DatasetRequest {
    /// Registration for a comma-separated CSV with a header row.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        policy: &UploadPolicy,
        column_headers: Vec<ColumnDescriptor>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status: PENDING_DEPLOYMENT.to_string(),
            bucket_name: policy.bucket_name.clone(),
            object_key: policy.object_key.clone(),
            file_type: "CSV".to_string(),
            file_contains_header: true,
            column_delimiter: "COMMA_SEPARATED".to_string(),
            column_headers,
        }
    }

    /// JSON body with the service's camelCase field names.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let column_headers: Vec<Value> = self
            .column_headers
            .iter()
            .map(ColumnDescriptor::to_json)
            .collect();
        json!({
            "name": self.name,
            "description": self.description,
            "status": self.status,
            "s3BucketName": self.bucket_name,
            "s3ObjectKey": self.object_key,
            "fileType": self.file_type,
            "fileContainsHeader": self.file_contains_header,
            "columnDelimiter": self.column_delimiter,
            "columnHeaders": column_headers,
        })
    }
}

/// Parse a response body as JSON, whatever its status.
pub(crate) fn parse_body(step: Step, response: &HttpResponse) -> PublishResult<Value> {
    serde_json::from_str(&response.body).map_err(|e| PublishError::InvalidJson {
        step,
        status: response.status,
        message: e.to_string(),
    })
}

fn required_str(
    body: &Value,
    step: Step,
    field: &'static str,
    status: u16,
) -> PublishResult<String> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(PublishError::MissingField {
            step,
            field,
            status,
        })
}
