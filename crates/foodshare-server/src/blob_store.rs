//! Filesystem image store.
//!
//! Images live under `base_path/{key}` where keys look like
//! `items/{donator}/{millis}`.  They are served back through
//! `GET /images/{key}`, so the URL handed to clients is
//! `{public_base_url}/images/{key}`.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::{debug, info};

use foodshare_core::{ObjectStore, ObjectStoreError};

use crate::error::ServerError;

/// Verify that a resolved path stays within the expected base directory.
/// Prevents path traversal attacks.
fn ensure_within(base: &Path, target: &Path) -> Result<PathBuf, ServerError> {
    // Canonicalize base; target may not exist yet so normalize manually
    let canonical_base = base.canonicalize().unwrap_or_else(|_| base.to_path_buf());
    let mut resolved = canonical_base.clone();
    for component in target
        .strip_prefix(base)
        .unwrap_or(target)
        .components()
    {
        match component {
            Component::Normal(c) => resolved.push(c),
            Component::ParentDir => {
                return Err(ServerError::BadRequest("Path traversal detected".to_string()));
            }
            _ => {} // RootDir, CurDir, Prefix: skip
        }
    }
    if !resolved.starts_with(&canonical_base) {
        return Err(ServerError::BadRequest("Path traversal detected".to_string()));
    }
    Ok(resolved)
}

/// Keys are `/`-separated segments of `[A-Za-z0-9._-]`, none of them `.` or `..`.
fn validate_key(key: &str) -> Result<(), ServerError> {
    let ok = !key.is_empty()
        && key.split('/').all(|seg| {
            !seg.is_empty()
                && seg != "."
                && seg != ".."
                && seg
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        });
    if ok {
        Ok(())
    } else {
        Err(ServerError::BadRequest(format!("Invalid image key: {key}")))
    }
}

/// Content type from the leading magic bytes.
pub fn sniff_content_type(data: &[u8]) -> &'static str {
    match data {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone)]
pub struct BlobStore {
    base_path: PathBuf,
    max_size: usize,
    public_base_url: String,
}

impl BlobStore {
    pub async fn new(
        base_path: PathBuf,
        max_size: usize,
        public_base_url: impl Into<String>,
    ) -> Result<Self, ServerError> {
        fs::create_dir_all(&base_path).await.map_err(|e| {
            ServerError::ImageStorage(format!(
                "Failed to create image directory '{}': {}",
                base_path.display(),
                e
            ))
        })?;

        info!(path = %base_path.display(), "Image store initialized");

        Ok(Self {
            base_path,
            max_size,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn url_for(&self, key: &str) -> String {
        format!("{}/images/{key}", self.public_base_url)
    }

    pub async fn store_image(&self, key: &str, data: &[u8]) -> Result<String, ServerError> {
        if data.is_empty() {
            return Err(ServerError::BadRequest("Empty image".to_string()));
        }
        if data.len() > self.max_size {
            return Err(ServerError::ImageTooLarge {
                size: data.len(),
                max: self.max_size,
            });
        }

        let path = self.safe_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ServerError::ImageStorage(format!("Failed to create {key}: {e}")))?;
        }
        fs::write(&path, data)
            .await
            .map_err(|e| ServerError::ImageStorage(format!("Failed to write {key}: {e}")))?;

        debug!(key, size = data.len(), "Stored image");
        Ok(self.url_for(key))
    }

    pub async fn get_image(&self, key: &str) -> Result<Vec<u8>, ServerError> {
        let path = self.safe_path(key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(ServerError::ImageNotFound(key.to_string()));
        }

        let data = fs::read(&path)
            .await
            .map_err(|e| ServerError::ImageStorage(format!("Failed to read {key}: {e}")))?;

        debug!(key, size = data.len(), "Retrieved image");
        Ok(data)
    }

    fn safe_path(&self, key: &str) -> Result<PathBuf, ServerError> {
        validate_key(key)?;
        ensure_within(&self.base_path, &self.base_path.join(key))
    }
}

#[async_trait]
impl ObjectStore for BlobStore {
    async fn put(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: Option<&str>,
    ) -> Result<String, ObjectStoreError> {
        if let Some(ct) = content_type {
            if !ct.starts_with("image/") {
                return Err(ObjectStoreError::Rejected(format!("not an image: {ct}")));
            }
        }
        self.store_image(key, &bytes).await.map_err(|e| match e {
            ServerError::ImageStorage(detail) => {
                ObjectStoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, detail))
            }
            other => ObjectStoreError::Rejected(other.to_string()),
        })
    }
}
