//! HTTP transport used by the publisher
//!
//! The workflow only needs two kinds of request: a JSON POST (optionally with a
//! bearer token) and a multipart form POST carrying a file. [`Transport`] is the
//! seam between the two; [`ReqwestTransport`] is the real implementation.

use std::path::Path;

use reqwest::blocking::multipart::{Form, Part};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{PublishError, PublishResult};
use crate::publish::Step;

/// Status and raw body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends the requests the publish workflow needs.
pub trait Transport {
    /// POST `body` as JSON to `url`, with `Authorization: Bearer` when a token is given.
    fn post_json(
        &self,
        step: Step,
        url: &str,
        bearer: Option<&str>,
        body: &Value,
    ) -> PublishResult<HttpResponse>;

    /// POST a multipart form: the text `fields` in order, then the file at
    /// `path` under `file_field`.
    fn post_multipart(
        &self,
        step: Step,
        url: &str,
        fields: &[(String, String)],
        file_field: &str,
        path: &Path,
    ) -> PublishResult<HttpResponse>;
}

/// [`Transport`] backed by a blocking reqwest client.
pub struct ReqwestTransport {
    http_client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Create a transport using the user agent and timeout from `config`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: &ClientConfig) -> PublishResult<Self> {
        let mut builder = reqwest::blocking::Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| PublishError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http_client })
    }

    fn read(step: Step, response: reqwest::blocking::Response) -> PublishResult<HttpResponse> {
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| PublishError::Network {
            step,
            message: e.to_string(),
        })?;
        Ok(HttpResponse { status, body })
    }
}

impl Transport for ReqwestTransport {
    fn post_json(
        &self,
        step: Step,
        url: &str,
        bearer: Option<&str>,
        body: &Value,
    ) -> PublishResult<HttpResponse> {
        let mut req = self.http_client.post(url).json(body);
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }
        let response = req.send().map_err(|e| PublishError::Network {
            step,
            message: e.to_string(),
        })?;
        Self::read(step, response)
    }

    fn post_multipart(
        &self,
        step: Step,
        url: &str,
        fields: &[(String, String)],
        file_field: &str,
        path: &Path,
    ) -> PublishResult<HttpResponse> {
        let mut form = Form::new();
        for (name, value) in fields {
            form = form.text(name.clone(), value.clone());
        }
        // Storage services ignore form fields that follow the file part.
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let part = Part::bytes(std::fs::read(path)?)
            .file_name(file_name)
            .mime_str("text/csv")
            .map_err(|e| PublishError::Network {
                step,
                message: e.to_string(),
            })?;
        form = form.part(file_field.to_string(), part);

        let response = self
            .http_client
            .post(url)
            .multipart(form)
            .send()
            .map_err(|e| PublishError::Network {
                step,
                message: e.to_string(),
            })?;
        Self::read(step, response)
    }
}
