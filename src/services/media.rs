//! Media persistence for uploaded listing images.
//!
//! Files land under the configured upload directory with UUID names and are
//! exposed back as public URLs. Per-field caps are enforced by silent
//! truncation — extra files are dropped, not rejected.

use std::path::Path;

use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::AppError;

pub const MAX_CERTIFICATE_IMAGES: usize = 5;
pub const MAX_GALLERY_IMAGES: usize = 10;

/// Uploaded media URLs for a create or update request, grouped per field.
#[derive(Debug, Clone, Default)]
pub struct MediaInput {
    pub profile_image: Vec<String>,
    pub cover_image: Vec<String>,
    pub certificate_images: Vec<String>,
    pub gallery_images: Vec<String>,
}

impl MediaInput {
    /// Apply the per-field caps: one profile, one cover, five certificates,
    /// ten gallery images. Anything beyond is silently dropped.
    pub fn capped(mut self) -> Self {
        self.profile_image.truncate(1);
        self.cover_image.truncate(1);
        self.certificate_images.truncate(MAX_CERTIFICATE_IMAGES);
        self.gallery_images.truncate(MAX_GALLERY_IMAGES);
        self
    }

    pub fn profile(&self) -> Option<&String> {
        self.profile_image.first()
    }

    pub fn cover(&self) -> Option<&String> {
        self.cover_image.first()
    }
}

/// Persist one uploaded file and return its public URL.
pub async fn store_upload(
    config: &AppConfig,
    original_name: &str,
    bytes: &[u8],
) -> Result<String, AppError> {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin");
    let stored_name = format!("{}.{extension}", Uuid::new_v4());

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to prepare upload dir: {e}")))?;

    let path = Path::new(&config.upload_dir).join(&stored_name);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to store upload: {e}")))?;

    Ok(format!("{}/uploads/{stored_name}", config.public_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}-{i}")).collect()
    }

    #[test]
    fn caps_truncate_silently() {
        let input = MediaInput {
            profile_image: urls("profile", 3),
            cover_image: urls("cover", 2),
            certificate_images: urls("cert", 7),
            gallery_images: urls("gallery", 12),
        }
        .capped();

        assert_eq!(input.profile_image.len(), 1);
        assert_eq!(input.cover_image.len(), 1);
        assert_eq!(input.certificate_images.len(), MAX_CERTIFICATE_IMAGES);
        assert_eq!(input.gallery_images.len(), MAX_GALLERY_IMAGES);
        assert_eq!(input.profile(), Some(&"profile-0".to_string()));
    }

    #[test]
    fn caps_keep_submissions_within_limits() {
        let input = MediaInput {
            profile_image: urls("p", 1),
            cover_image: vec![],
            certificate_images: urls("c", 5),
            gallery_images: urls("g", 4),
        }
        .capped();

        assert_eq!(input.certificate_images.len(), 5);
        assert_eq!(input.gallery_images.len(), 4);
        assert!(input.cover().is_none());
    }

    #[tokio::test]
    async fn store_upload_writes_file_and_builds_url() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            database_url: String::new(),
            database_max_connections: 1,
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: "secret".to_string(),
            upload_dir: dir.path().to_string_lossy().to_string(),
            public_url: "http://localhost:3000".to_string(),
        };

        let url = store_upload(&config, "storefront.png", b"fake-image")
            .await
            .unwrap();
        assert!(url.starts_with("http://localhost:3000/uploads/"));
        assert!(url.ends_with(".png"));

        let stored: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(stored.len(), 1);
    }
}
