//! HTTP client for the PDF-to-text extraction service.
//!
//! The service accepts `{"file_content": <base64>, "filename": <name>}` and
//! answers with `{"text": <extracted text>}`.

use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use quizbank_core::traits::{ExtractRequest, ExtractResponse, TextExtractor};

use crate::error::ExtractError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Client for a remote text extraction endpoint.
pub struct HttpTextExtractor {
    endpoint: String,
    timeout_secs: u64,
    max_file_size: u64,
    client: reqwest::Client,
}

impl HttpTextExtractor {
    pub fn new(endpoint: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            timeout_secs,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            client,
        })
    }

    /// Reject documents larger than `bytes` before uploading.
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Serialize)]
struct ServiceRequest<'a> {
    file_content: String,
    filename: &'a str,
}

#[derive(Deserialize)]
struct ServiceResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl TextExtractor for HttpTextExtractor {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, request), fields(file = %request.filename, bytes = request.content.len()))]
    async fn extract_text(&self, request: &ExtractRequest) -> anyhow::Result<ExtractResponse> {
        let size = request.content.len() as u64;
        if size > self.max_file_size {
            return Err(ExtractError::FileTooLarge {
                size,
                max: self.max_file_size,
            }
            .into());
        }

        let start = Instant::now();
        let body = ServiceRequest {
            file_content: base64::engine::general_purpose::STANDARD.encode(&request.content),
            filename: &request.filename,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    ExtractError::NetworkError(format!(
                        "extraction service not reachable at {}",
                        self.endpoint
                    ))
                } else {
                    ExtractError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status, "extraction service returned an error");
            return Err(ExtractError::ServiceError { status, message }.into());
        }

        let parsed: ServiceResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::InvalidResponse(format!("failed to parse response: {e}")))?;

        let text = match (parsed.text, parsed.error) {
            (Some(text), _) => text,
            (None, Some(error)) => return Err(ExtractError::InvalidResponse(error).into()),
            (None, None) => {
                return Err(ExtractError::InvalidResponse("missing 'text' field".into()).into())
            }
        };

        Ok(ExtractResponse {
            text,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
