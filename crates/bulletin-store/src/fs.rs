//! Filesystem blob store
//!
//! Objects live at `<root>/<bucket>/<key>`. Writes go to a sibling temp
//! file first and are renamed into place, so a reader never sees a
//! half-written document.

use crate::blob::BlobStore;
use crate::error::BlobError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

/// Blob store rooted at a local directory
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    #[inline]
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an object path, refusing anything that escapes the bucket
    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, BlobError> {
        let mut path = self.root.clone();
        for part in [bucket, key] {
            let rel = Path::new(part);
            let plain = !part.is_empty()
                && rel
                    .components()
                    .all(|component| matches!(component, Component::Normal(_)));
            if !plain {
                return Err(BlobError::InvalidKey(part.to_string()));
            }
            path.push(rel);
        }
        Ok(path)
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BlobError> {
        let path = self.object_path(bucket, key)?;
        match tokio::fs::read(&path).await {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(BlobError::not_found(bucket, key)),
            Err(e) => Err(BlobError::io_error(path, e)),
        }
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), BlobError> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BlobError::io_error(parent, e))?;
        }

        let mut tmp = path.clone().into_os_string();
        tmp.push(format!(".{}.tmp", Uuid::new_v4().simple()));
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, &body)
            .await
            .map_err(|e| BlobError::io_error(&tmp, e))?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(BlobError::io_error(path, e));
        }
        tracing::debug!(path = %path.display(), bytes = body.len(), "wrote blob");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "filesystem"
    }
}
