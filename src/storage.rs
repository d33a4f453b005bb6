use async_trait::async_trait;
use aws_sdk_s3 as s3;
use s3::primitives::ByteStream;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// StorageError
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object store request failed: {0}")]
    Request(String),
    #[error("object store unavailable: {0}")]
    Unavailable(String),
}

// 1. StorageService Contract
/// StorageService
///
/// The object-store contract behind image uploads. `S3StorageClient` talks to any
/// S3-compatible service (MinIO locally); `MockStorageService` keeps objects in
/// memory for tests.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Creates the configured bucket if it is missing. Called at startup in `Env::Local`.
    async fn ensure_bucket_exists(&self);

    /// Stores `bytes` under `key` and returns the object's public URL.
    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError>;

    /// Removes the object. Deleting a missing key is not an error.
    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;

    fn public_url(&self, key: &str) -> String;
}

// 2. The Real Implementation (S3/MinIO)
/// S3StorageClient
///
/// `force_path_style(true)` is required for MinIO and most S3-compatible gateways.
#[derive(Clone)]
pub struct S3StorageClient {
    client: s3::Client,
    bucket_name: String,
    public_base_url: String,
}

impl S3StorageClient {
    pub async fn new(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        bucket: &str,
        public_base_url: &str,
    ) -> Self {
        let credentials =
            s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let config = s3::Config::builder()
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .region(s3::config::Region::new(region.to_string()))
            .behavior_version_latest()
            .force_path_style(true)
            .build();

        Self {
            client: s3::Client::from_conf(config),
            bucket_name: bucket.to_string(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl StorageService for S3StorageClient {
    async fn ensure_bucket_exists(&self) {
        // CreateBucket fails harmlessly when the bucket is already there.
        if let Err(e) = self
            .client
            .create_bucket()
            .bucket(&self.bucket_name)
            .send()
            .await
        {
            tracing::debug!(bucket = %self.bucket_name, "create_bucket: {e}");
        }
    }

    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        let key = sanitize_key(key);
        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;
        Ok(self.public_url(&key))
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(sanitize_key(key))
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, sanitize_key(key))
    }
}

/// sanitize_key
///
/// Drops empty, `.` and `..` segments so a key can never escape the bucket prefix.
pub fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

// 3. The Mock Implementation (For Tests)
/// MockStorageService
///
/// Keeps stored objects in a map so tests can assert what was written or removed.
#[derive(Clone, Default)]
pub struct MockStorageService {
    /// When true, every write and delete fails.
    pub should_fail: bool,
    objects: Arc<Mutex<HashMap<String, (String, usize)>>>,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&sanitize_key(key))
    }

    pub fn object_count(&self) -> usize {
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_bucket_exists(&self) {}

    async fn put_object(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        if self.should_fail {
            return Err(StorageError::Unavailable("simulated failure".to_string()));
        }
        let key = sanitize_key(key);
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone(), (content_type.to_string(), bytes.len()));
        Ok(self.public_url(&key))
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        if self.should_fail {
            return Err(StorageError::Unavailable("simulated failure".to_string()));
        }
        self.objects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&sanitize_key(key));
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("http://localhost:9000/mock-bucket/{}", sanitize_key(key))
    }
}

/// StorageState
///
/// The shared handle stored in `AppState`.
pub type StorageState = Arc<dyn StorageService>;
