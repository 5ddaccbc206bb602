use std::sync::Arc;

use artcare_common::{PhotoRef, PhotoRole, StorageMode};
use tracing::info;

use super::{transcode, EmbeddedEncoder, ExternalUploader, PhotoBackend, PhotoError};
use crate::config::{Config, ProfilesConfig};

/// Entry point for storing new photos.
///
/// The router holds no storage mode of its own: every [`store`](Self::store)
/// call names the backend, so a mode switch applies from the next upload on
/// and never touches references already stored.
#[derive(Clone)]
pub struct StorageRouter {
    profiles: ProfilesConfig,
    embedded: Arc<dyn PhotoBackend>,
    external: Option<Arc<dyn PhotoBackend>>,
}

impl StorageRouter {
    /// Router with only the embedded backend.
    pub fn new(profiles: ProfilesConfig) -> Self {
        Self {
            profiles,
            embedded: Arc::new(EmbeddedEncoder::new()),
            external: None,
        }
    }

    /// Use `backend` for `external` mode.
    pub fn with_external(mut self, backend: Arc<dyn PhotoBackend>) -> Self {
        self.external = Some(backend);
        self
    }

    /// Build a router from config, adding an [`ExternalUploader`] when
    /// `[storage.external]` is present.
    pub fn from_config(config: &Config) -> Result<Self, PhotoError> {
        let router = Self::new(config.profiles);
        match &config.storage.external {
            Some(external) => {
                let uploader = ExternalUploader::new(external.clone())?;
                Ok(router.with_external(Arc::new(uploader)))
            }
            None => Ok(router),
        }
    }

    pub fn has_external(&self) -> bool {
        self.external.is_some()
    }

    fn backend(&self, mode: StorageMode) -> Result<&Arc<dyn PhotoBackend>, PhotoError> {
        match mode {
            StorageMode::Embedded => Ok(&self.embedded),
            StorageMode::External => self
                .external
                .as_ref()
                .ok_or(PhotoError::BackendUnavailable(StorageMode::External)),
        }
    }

    /// Transcode `bytes` with the role's profile and store the result in the
    /// backend for `mode`.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Raw image file contents
    /// * `role` - Whether this is a work photo or a teaching-session photo
    /// * `mode` - The storage mode currently selected by the user
    pub async fn store(
        &self,
        bytes: Vec<u8>,
        role: PhotoRole,
        mode: StorageMode,
    ) -> Result<PhotoRef, PhotoError> {
        let backend = Arc::clone(self.backend(mode)?);
        let profile = self.profiles.for_role(role);

        let image = tokio::task::spawn_blocking(move || transcode(&bytes, &profile))
            .await
            .map_err(|e| PhotoError::Worker(e.to_string()))??;

        let photo = backend.put(&image, role).await?;

        info!(
            %role,
            %mode,
            width = image.width,
            height = image.height,
            reference_len = photo.len(),
            "Stored photo"
        );

        Ok(photo)
    }
}
