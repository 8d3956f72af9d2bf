use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use std::path::PathBuf;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("unsupported media type: {0}")]
    UnsupportedType(String),

    #[error("URL is not managed by this store: {0}")]
    ForeignUrl(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Object-storage collaborator: accepts a binary blob, hands back a public
/// URL, and can delete by that URL later.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn store(&self, bytes: &[u8], content_type: &str) -> Result<String, MediaError>;

    async fn delete_by_url(&self, url: &str) -> Result<(), MediaError>;
}

/// Disk-backed store serving files under `/uploads`.
pub struct LocalMediaStore {
    dir: PathBuf,
    public_base: String,
}

impl LocalMediaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            public_base: "/uploads".to_string(),
        }
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(&self, bytes: &[u8], content_type: &str) -> Result<String, MediaError> {
        let extension = match content_type {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/svg+xml" => "svg",
            other => return Err(MediaError::UnsupportedType(other.to_string())),
        };

        tokio::fs::create_dir_all(&self.dir).await?;

        let name = format!("{}.{}", Uuid::new_v4(), extension);
        tokio::fs::write(self.dir.join(&name), bytes).await?;

        Ok(format!("{}/{}", self.public_base, name))
    }

    async fn delete_by_url(&self, url: &str) -> Result<(), MediaError> {
        let name = url
            .strip_prefix(&format!("{}/", self.public_base))
            .ok_or_else(|| MediaError::ForeignUrl(url.to_string()))?;

        // Stored names are single path components; anything else is not ours.
        if name.is_empty() || name.contains('/') || name.contains("..") {
            return Err(MediaError::ForeignUrl(url.to_string()));
        }

        match tokio::fs::remove_file(self.dir.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_and_deletes_by_url() {
        let dir = std::env::temp_dir().join(format!("presskit-media-{}", Uuid::new_v4()));
        let store = LocalMediaStore::new(&dir);

        let url = store.store(b"fake-png-bytes", "image/png").await.unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with(".png"));

        let name = url.strip_prefix("/uploads/").unwrap();
        assert!(dir.join(name).exists());

        store.delete_by_url(&url).await.unwrap();
        assert!(!dir.join(name).exists());

        // Deleting again is a no-op.
        store.delete_by_url(&url).await.unwrap();

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn rejects_unknown_content_types_and_foreign_urls() {
        let dir = std::env::temp_dir().join(format!("presskit-media-{}", Uuid::new_v4()));
        let store = LocalMediaStore::new(&dir);

        assert!(matches!(
            store.store(b"...", "application/pdf").await,
            Err(MediaError::UnsupportedType(_))
        ));

        assert!(matches!(
            store.delete_by_url("https://elsewhere.example/x.png").await,
            Err(MediaError::ForeignUrl(_))
        ));
        assert!(matches!(
            store.delete_by_url("/uploads/../etc/passwd").await,
            Err(MediaError::ForeignUrl(_))
        ));
    }
}
