use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::error::StoreError;
use crate::records::BlobStore;

/// Filesystem-backed blob store: writes under a local directory and
/// hands back URLs rooted at a configured public base. Blocking on
/// purpose — callers already run it alongside the blocking database.
pub struct FsBlobStore {
    dir: PathBuf,
    base_url: String,
}

impl FsBlobStore {
    pub fn new(dir: PathBuf, base_url: String) -> Result<Self, StoreError> {
        fs::create_dir_all(&dir)?;
        info!("Blob storage directory: {}", dir.display());
        Ok(Self {
            dir,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl BlobStore for FsBlobStore {
    fn put_blob(&self, bytes: &[u8], path: &str) -> Result<String, StoreError> {
        let full = self.dir.join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full, bytes)?;

        Ok(format!("{}/{}", self.base_url, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn put_blob_writes_bytes_and_returns_url() {
        let dir = std::env::temp_dir().join(format!("banter-blob-test-{}", Uuid::new_v4()));
        let store = FsBlobStore::new(dir.clone(), "https://blobs.test/".into()).unwrap();

        let url = store.put_blob(b"image-bytes", "images/abc.png").unwrap();
        assert_eq!(url, "https://blobs.test/images/abc.png");
        assert_eq!(fs::read(dir.join("images/abc.png")).unwrap(), b"image-bytes");

        let _ = fs::remove_dir_all(dir);
    }
}
