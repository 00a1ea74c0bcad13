//! Local filesystem photo store.
//!
//! Stands in for the external object storage collaborator: uploads land in a
//! configured directory and are served back under `/photos/...`. A failed
//! upload aborts the enclosing operation; a null photo reference is only ever
//! the result of no photo being supplied.

use std::path::PathBuf;

use crate::errors::AppError;

/// URL prefix under which stored photos are served.
pub const PHOTO_URL_PREFIX: &str = "/photos/";

/// Filesystem-backed store for employee photos.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    root: PathBuf,
}

impl PhotoStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Directory the store writes into; served as static files.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Store photo bytes and return the URL they will be served under.
    ///
    /// Only image content types are accepted. The stored name is prefixed
    /// with a fresh UUID so distinct uploads never collide.
    pub async fn store(
        &self,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<String, AppError> {
        if !content_type.starts_with("image/") {
            return Err(AppError::InvalidInput(format!(
                "Unsupported photo content type: {}",
                content_type
            )));
        }

        let stored_name = format!("{}_{}", uuid::Uuid::new_v4(), sanitize_filename(filename));

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::Storage(format!("Photo storage unavailable: {}", e)))?;

        let path = self.root.join(&stored_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::Storage(format!("Photo upload failed: {}", e)))?;

        Ok(format!("{}{}", PHOTO_URL_PREFIX, stored_name))
    }

    /// Remove a previously stored photo by its URL, best-effort.
    ///
    /// Called when an update replaces a photo; a miss is not an error.
    pub async fn remove(&self, url: &str) {
        let Some(stored_name) = url.strip_prefix(PHOTO_URL_PREFIX) else {
            return;
        };
        // stored names never contain path separators
        if stored_name.contains('/') || stored_name.contains('\\') {
            return;
        }
        if let Err(e) = tokio::fs::remove_file(self.root.join(stored_name)).await {
            tracing::warn!(url = %url, error = %e, "Failed to remove replaced photo");
        }
    }
}

/// Keep only characters that are safe in a stored file name.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "photo".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_store_and_remove() {
        let dir = TempDir::new().unwrap();
        let store = PhotoStore::new(dir.path().to_path_buf());

        let url = store
            .store("jane.png", "image/png", b"fake-png-bytes")
            .await
            .unwrap();
        assert!(url.starts_with(PHOTO_URL_PREFIX));

        let stored_name = url.strip_prefix(PHOTO_URL_PREFIX).unwrap();
        let path = dir.path().join(stored_name);
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"fake-png-bytes");

        store.remove(&url).await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_rejects_non_image_content() {
        let dir = TempDir::new().unwrap();
        let store = PhotoStore::new(dir.path().to_path_buf());

        let err = store
            .store("notes.txt", "text/plain", b"hello")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("jane doe.png"), "jane_doe.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename(""), "photo");
    }
}
