use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use shared::{
    domain::{BackendStatus, SessionId},
    protocol::{QueryRequest, QueryResponse, UploadResponse, UPLOAD_FIELD_NAME},
};
use tracing::{debug, warn};

use crate::{config::ClientSettings, document::DocumentFile, error::ClientError};

/// Transport to the remote indexing/answering service. No retries.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    async fn upload(&self, file: &DocumentFile) -> Result<SessionId, ClientError>;
    async fn ask(&self, session_id: &SessionId, question: &str) -> Result<String, ClientError>;
}

pub struct HttpRemoteClient {
    http: Client,
    base_url: String,
}

impl HttpRemoteClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|err| ClientError::transport(format!("failed to build http client: {err}")))?;
        Ok(Self {
            http,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Any HTTP answer from the base address counts as reachable.
    pub async fn probe(&self) -> BackendStatus {
        match self.http.get(&self.base_url).send().await {
            Ok(res) => {
                debug!(status = %res.status(), "backend: probe answered");
                BackendStatus::Connected
            }
            Err(err) => {
                warn!(base_url = %self.base_url, "backend: probe failed: {err}");
                BackendStatus::Unreachable
            }
        }
    }
}

fn ensure_success(res: Response, operation: &str) -> Result<Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    Err(ClientError::transport(format!(
        "{operation} failed with status {status}"
    )))
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn upload(&self, file: &DocumentFile) -> Result<SessionId, ClientError> {
        file.validate()?;

        let mut part = multipart::Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        if let Some(mime_type) = file.mime_type.as_deref() {
            part = part
                .mime_str(mime_type)
                .map_err(|err| ClientError::validation(format!("invalid mime type: {err}")))?;
        }
        let form = multipart::Form::new().part(UPLOAD_FIELD_NAME, part);

        let res = self
            .http
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await?;
        let body: UploadResponse = ensure_success(res, "upload")?.json().await?;

        if body.session_id.as_str().trim().is_empty() {
            return Err(ClientError::transport("server returned an empty session id"));
        }
        Ok(body.session_id)
    }

    async fn ask(&self, session_id: &SessionId, question: &str) -> Result<String, ClientError> {
        let res = self
            .http
            .post(format!("{}/query", self.base_url))
            .json(&QueryRequest {
                session_id: session_id.clone(),
                question: question.to_string(),
            })
            .send()
            .await?;
        let body: QueryResponse = ensure_success(res, "query")?.json().await?;
        Ok(body.answer)
    }
}

#[cfg(test)]
#[path = "tests/remote_tests.rs"]
mod tests;
