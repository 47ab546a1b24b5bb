//! Azure Blob Storage backend.
//!
//! Blobs live in a single container under the same keys the local backend
//! uses. Writes are conditional (`If-None-Match: *`) so an existing blob is
//! never replaced; a conflict moves on to the next candidate name.

mod signing;
mod transport;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use qpcat_core::{FileRef, FileStorage, StorageError, StoragePath};

use crate::error::StorageConfigError;
use crate::naming;

pub use signing::SharedKey;
pub use transport::{BlobMethod, BlobRequest, BlobResponse, BlobTransport, ReqwestTransport};

/// Storage service version sent with every request.
pub const API_VERSION: &str = "2021-08-06";

/// Container used when `AZURE_CONTAINER` is unset.
pub const DEFAULT_CONTAINER: &str = "media";

/// Credentials and container for the blob backend.
#[derive(Clone, PartialEq, Eq)]
pub struct AzureConfig {
    pub account: String,
    /// Base64 access key.
    pub key: String,
    pub container: String,
}

impl fmt::Debug for AzureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureConfig")
            .field("account", &self.account)
            .field("key", &"<redacted>")
            .field("container", &self.container)
            .finish()
    }
}

pub struct AzureBlobStorage {
    credentials: SharedKey,
    container: String,
    endpoint: String,
    transport: Arc<dyn BlobTransport>,
}

impl AzureBlobStorage {
    pub fn new(config: &AzureConfig) -> Result<Self, StorageConfigError> {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()?))
    }

    pub fn with_transport(
        config: &AzureConfig,
        transport: Arc<dyn BlobTransport>,
    ) -> Result<Self, StorageConfigError> {
        let credentials = SharedKey::new(&config.account, &config.key)?;
        Ok(Self {
            endpoint: format!("https://{}.blob.core.windows.net", config.account),
            credentials,
            container: config.container.clone(),
            transport,
        })
    }

    /// Override the service endpoint (for emulators).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// Path part of the endpoint, e.g. `/devstoreaccount1` for a path-style
    /// emulator URL. Empty for the public service.
    fn endpoint_path(&self) -> &str {
        let rest = self
            .endpoint
            .split_once("://")
            .map_or(self.endpoint.as_str(), |(_, rest)| rest);
        rest.find('/').map_or("", |idx| &rest[idx..])
    }

    /// `/{container}/{key}` with every segment percent-encoded.
    fn blob_path(&self, key: &str) -> Result<String, StorageError> {
        if key.is_empty() || key.starts_with('/') || key.split('/').any(|s| s.is_empty() || s == "..") {
            return Err(StorageError::InvalidPath(key.to_string()));
        }
        let encoded: Vec<String> = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        Ok(format!("/{}/{}", self.container, encoded.join("/")))
    }

    fn signed(
        &self,
        method: BlobMethod,
        key: &str,
        mut headers: Vec<(String, String)>,
        body: Vec<u8>,
    ) -> Result<BlobRequest, StorageError> {
        let path = self.blob_path(key)?;
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        headers.push(("x-ms-date".to_string(), date));
        headers.push(("x-ms-version".to_string(), API_VERSION.to_string()));
        let signed_path = format!("{}{path}", self.endpoint_path());
        let authorization =
            self.credentials
                .authorization(method.as_str(), &headers, body.len(), &signed_path);
        headers.push(("Authorization".to_string(), authorization));
        Ok(BlobRequest {
            method,
            url: format!("{}{path}", self.endpoint),
            headers,
            body,
        })
    }

    /// Upload unless the key is taken. `Ok(false)` on conflict.
    async fn put_new(&self, key: &str, bytes: &[u8]) -> Result<bool, StorageError> {
        let headers = vec![
            ("x-ms-blob-type".to_string(), "BlockBlob".to_string()),
            (
                "x-ms-blob-content-type".to_string(),
                content_type(key).to_string(),
            ),
            ("If-None-Match".to_string(), "*".to_string()),
        ];
        let request = self.signed(BlobMethod::Put, key, headers, bytes.to_vec())?;
        let response = self.transport.send(request).await?;
        match response.status {
            200..=299 => Ok(true),
            409 | 412 => Ok(false),
            _ => Err(StorageError::Remote(response.describe())),
        }
    }
}

fn content_type(key: &str) -> &'static str {
    if key.to_ascii_lowercase().ends_with(".pdf") {
        "application/pdf"
    } else {
        "application/octet-stream"
    }
}

#[async_trait]
impl FileStorage for AzureBlobStorage {
    async fn write(&self, path: &StoragePath, bytes: &[u8]) -> Result<FileRef, StorageError> {
        for filename in naming::candidates(path.filename()) {
            let key = path.with_filename(filename).key();
            if self.put_new(&key, bytes).await? {
                debug!(container = %self.container, key = %key, bytes = bytes.len(), "Uploaded blob");
                return Ok(FileRef::new(key));
            }
            debug!(key = %key, "Blob exists, trying another name");
        }
        Err(StorageError::Remote(format!(
            "no free name for {path} after {} attempts",
            naming::MAX_NAME_ATTEMPTS
        )))
    }

    async fn read(&self, file: &FileRef) -> Result<Vec<u8>, StorageError> {
        let request = self.signed(BlobMethod::Get, file.as_str(), Vec::new(), Vec::new())?;
        let response = self.transport.send(request).await?;
        match response.status {
            200..=299 => Ok(response.body),
            404 => Err(StorageError::NotFound(file.to_string())),
            _ => Err(StorageError::Remote(response.describe())),
        }
    }

    async fn delete(&self, file: &FileRef) -> Result<(), StorageError> {
        let request = self.signed(BlobMethod::Delete, file.as_str(), Vec::new(), Vec::new())?;
        let response = self.transport.send(request).await?;
        match response.status {
            200..=299 => Ok(()),
            404 => Err(StorageError::NotFound(file.to_string())),
            _ => Err(StorageError::Remote(response.describe())),
        }
    }

    fn backend_name(&self) -> &'static str {
        "azure-blob"
    }
}

#[cfg(test)]
mod tests {
    use super::transport::testing::FakeTransport;
    use super::*;
    use qpcat_core::{CatalogPath, PathSegment};

    const KEY: &str = "cXBjYXQtdGVzdC1zaWduaW5nLWtleQ==";
    const BASE: &str = "https://qpcatdev.blob.core.windows.net/media";

    fn config() -> AzureConfig {
        AzureConfig {
            account: "qpcatdev".to_string(),
            key: KEY.to_string(),
            container: DEFAULT_CONTAINER.to_string(),
        }
    }

    fn target(filename: &str) -> StoragePath {
        let seg = |slug: &str| PathSegment {
            id: 1,
            label: slug.to_string(),
            slug: slug.to_string(),
        };
        let path = CatalogPath {
            department: seg("cse"),
            scheme: seg("2021"),
            semester: seg("semester-3"),
            subject: seg("operating-systems"),
        };
        StoragePath::new(&path, filename)
    }

    fn storage(transport: &Arc<FakeTransport>) -> AzureBlobStorage {
        AzureBlobStorage::with_transport(&config(), transport.clone()).unwrap()
    }

    fn header<'a>(request: &'a BlobRequest, name: &str) -> Option<&'a str> {
        request
            .headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[tokio::test]
    async fn test_write_puts_signed_block_blob() {
        let transport = Arc::new(FakeTransport::new());
        let storage = storage(&transport);

        let file = storage
            .write(&target("Mid term.pdf"), b"%PDF-1.7")
            .await
            .unwrap();
        assert_eq!(
            file.as_str(),
            "cse/2021/semester-3/operating-systems/Mid term.pdf"
        );

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let put = &requests[0];
        assert_eq!(put.method, BlobMethod::Put);
        assert_eq!(
            put.url,
            format!("{BASE}/cse/2021/semester-3/operating-systems/Mid%20term.pdf")
        );
        assert_eq!(header(put, "x-ms-blob-type"), Some("BlockBlob"));
        assert_eq!(header(put, "x-ms-blob-content-type"), Some("application/pdf"));
        assert_eq!(header(put, "x-ms-version"), Some(API_VERSION));
        assert!(header(put, "x-ms-date").is_some_and(|d| d.ends_with(" GMT")));
        assert!(header(put, "Authorization").is_some_and(|a| a.starts_with("SharedKey qpcatdev:")));
        assert_eq!(transport.blob(&put.url), Some(b"%PDF-1.7".to_vec()));
    }

    #[tokio::test]
    async fn test_conflict_retries_under_new_name() {
        let taken = format!("{BASE}/cse/2021/semester-3/operating-systems/Quiz.pdf");
        let transport = Arc::new(FakeTransport::new().with_blob(&taken, b"old"));
        let storage = storage(&transport);

        let file = storage.write(&target("Quiz.pdf"), b"new").await.unwrap();
        assert!(file.file_name().starts_with("Quiz_"));
        assert_eq!(transport.requests().len(), 2);
        assert_eq!(transport.blob(&taken), Some(b"old".to_vec()));
        assert_eq!(storage.read(&file).await.unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_read_and_delete_map_missing_blobs() {
        let transport = Arc::new(FakeTransport::new());
        let storage = storage(&transport);
        let missing = FileRef::new("cse/2021/semester-3/operating-systems/none.pdf");

        assert!(matches!(
            storage.read(&missing).await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            storage.delete(&missing).await,
            Err(StorageError::NotFound(_))
        ));

        let file = storage.write(&target("a.pdf"), b"x").await.unwrap();
        storage.delete(&file).await.unwrap();
        assert_eq!(transport.requests().last().map(|r| r.method), Some(BlobMethod::Delete));
    }

    #[tokio::test]
    async fn test_server_errors_surface_as_remote() {
        let transport = Arc::new(FakeTransport::failing(503));
        let storage = storage(&transport);
        let err = storage.write(&target("a.pdf"), b"x").await.unwrap_err();
        match err {
            StorageError::Remote(message) => assert!(message.contains("HTTP 503")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_keys_never_reach_transport() {
        let transport = Arc::new(FakeTransport::new());
        let storage = storage(&transport);
        for key in ["", "/abs.pdf", "a//b.pdf", "../up.pdf"] {
            assert!(matches!(
                storage.read(&FileRef::new(key)).await,
                Err(StorageError::InvalidPath(_))
            ));
        }
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_endpoint_override_and_debug_redaction() {
        let transport = Arc::new(FakeTransport::new());
        let storage = storage(&transport).with_endpoint("http://127.0.0.1:10000/devstoreaccount1/");
        let _ = storage.read(&FileRef::new("a/b.pdf")).await;
        assert_eq!(
            transport.requests()[0].url,
            "http://127.0.0.1:10000/devstoreaccount1/media/a/b.pdf"
        );
        assert_eq!(storage.backend_name(), "azure-blob");
        assert!(!format!("{:?}", config()).contains(KEY));
    }

    #[tokio::test]
    async fn test_path_style_endpoint_prefix_is_signed() {
        let transport = Arc::new(FakeTransport::new());
        let storage = storage(&transport).with_endpoint("http://127.0.0.1:10000/devstoreaccount1");
        let _ = storage.read(&FileRef::new("a/b.pdf")).await;

        let request = &transport.requests()[0];
        let (unsigned, auth): (Vec<_>, Vec<_>) = request
            .headers
            .iter()
            .cloned()
            .partition(|(name, _)| name != "Authorization");
        let expected = SharedKey::new(&config().account, &config().key)
            .unwrap()
            .authorization("GET", &unsigned, 0, "/devstoreaccount1/media/a/b.pdf");
        assert_eq!(auth[0].1, expected);
    }
}
