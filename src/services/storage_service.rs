use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::utils::files::{is_safe_object_key, sanitize_file_name};

#[derive(Debug, Clone, Serialize)]
pub struct StoredObject {
    pub key: String,
    pub location: String,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put_object(&self, file_name: &str, bytes: Bytes) -> Result<StoredObject>;

    async fn get_object(&self, key: &str) -> Result<Vec<u8>>;
}

/// Filesystem stand-in for an S3 bucket: `<root>/<bucket>/<key>`.
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    root: PathBuf,
    bucket: String,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(
        root: impl Into<PathBuf>,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.into(),
            public_base_url: public_base_url.into(),
        }
    }

    fn bucket_dir(&self) -> PathBuf {
        self.root.join(&self.bucket)
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn put_object(&self, file_name: &str, bytes: Bytes) -> Result<StoredObject> {
        let key = format!("{}-{}", Uuid::new_v4(), sanitize_file_name(file_name));
        let dir = self.bucket_dir();

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::Storage(format!("failed to create bucket directory: {}", e)))?;
        tokio::fs::write(dir.join(&key), &bytes)
            .await
            .map_err(|e| Error::Storage(format!("failed to write object {}: {}", key, e)))?;

        tracing::info!(key = %key, size = bytes.len(), "Stored object");

        Ok(StoredObject {
            location: format!(
                "{}/local_storage/{}/{}",
                self.public_base_url.trim_end_matches('/'),
                self.bucket,
                key
            ),
            key,
        })
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        if !is_safe_object_key(key) {
            return Err(Error::BadRequest(format!("Invalid object key: {}", key)));
        }

        match tokio::fs::read(self.bucket_dir().join(key)).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(format!("Stored object not found: {}", key)))
            }
            Err(e) => Err(Error::Storage(format!("failed to read object {}: {}", key, e))),
        }
    }
}
