// Analysis request client
// Sends songs to the analysis backend over HTTP

use async_trait::async_trait;
use log::{debug, info};
use reqwest::multipart::{Form, Part};
use std::path::Path;

use super::protocol::{
    parse_status_response, parse_upload_response, parse_visuals_response, ServerStatus,
    FILE_FIELD, INITIALIZE_PATH, UPLOAD_PATH, VISUALS_PATH,
};
use crate::analysis::AnalysisResult;
use crate::error::{Error, Result};
use crate::visual::VisualParams;

/// Anything that can turn a song file into an [`AnalysisResult`].
///
/// Calls are one-shot: no retries, no cancellation, no timeout of their own.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Uploads the song at `file` and returns its tempo and mood
    async fn submit(&self, file: &Path) -> Result<AnalysisResult>;

    /// Asks the backend to compute the visual parameters itself
    async fn request_visuals(&self, result: &AnalysisResult) -> Result<VisualParams>;

    /// Checks that the backend is up
    async fn status(&self) -> Result<ServerStatus>;
}

/// [`AnalysisClient`] talking to the backend over HTTP
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAnalysisClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self::with_client(base_url, http))
    }

    /// Uses a preconfigured reqwest client (proxies, TLS roots, ...)
    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    async fn submit(&self, file: &Path) -> Result<AnalysisResult> {
        if file.as_os_str().is_empty() {
            return Err(Error::NoFileSelected);
        }

        let bytes = tokio::fs::read(file).await?;
        let file_name = file
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("song")
            .to_string();
        debug!("Uploading {} ({} bytes)", file_name, bytes.len());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self
            .http
            .post(self.endpoint(UPLOAD_PATH))
            .multipart(form)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        let result = parse_upload_response(status, &body)?;
        info!("Song analysis data: {}", result);
        Ok(result)
    }

    async fn request_visuals(&self, result: &AnalysisResult) -> Result<VisualParams> {
        let response = self
            .http
            .post(self.endpoint(VISUALS_PATH))
            .json(result)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_visuals_response(status, &body)
    }

    async fn status(&self) -> Result<ServerStatus> {
        let response = self.http.get(self.endpoint(INITIALIZE_PATH)).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_status_response(status, &body)
    }
}
