//! HTTP transport for blob requests.
//!
//! Signed requests are built by [`super::AzureBlobStorage`]; the transport
//! only moves bytes, which keeps the backend testable without a network.

use std::time::Duration;

use async_trait::async_trait;

use qpcat_core::StorageError;

use crate::error::StorageConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobMethod {
    Get,
    Put,
    Delete,
}

impl BlobMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// A fully signed request.
#[derive(Debug, Clone)]
pub struct BlobRequest {
    pub method: BlobMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct BlobResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl BlobResponse {
    /// Short description for error messages.
    pub fn describe(&self) -> String {
        let text = String::from_utf8_lossy(&self.body);
        let snippet: String = text.chars().take(200).collect();
        format!("HTTP {}: {}", self.status, snippet.trim())
    }
}

#[async_trait]
pub trait BlobTransport: Send + Sync {
    /// Send a request. Non-2xx statuses are returned, not raised.
    async fn send(&self, request: BlobRequest) -> Result<BlobResponse, StorageError>;
}

/// Production transport over reqwest.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, StorageConfigError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| StorageConfigError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl BlobTransport for ReqwestTransport {
    async fn send(&self, request: BlobRequest) -> Result<BlobResponse, StorageError> {
        let method = match request.method {
            BlobMethod::Get => reqwest::Method::GET,
            BlobMethod::Put => reqwest::Method::PUT,
            BlobMethod::Delete => reqwest::Method::DELETE,
        };
        let mut builder = self.client.request(method, request.url.as_str());
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if request.method == BlobMethod::Put {
            builder = builder.body(request.body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| StorageError::Remote(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| StorageError::Remote(e.to_string()))?;
        Ok(BlobResponse {
            status,
            body: body.to_vec(),
        })
    }
}

// ============================================================================
// Fake Transport for Testing
// ============================================================================
