//! Inline storage: the photo becomes a base64 data URI.

use artcare_common::{PhotoRef, PhotoRole};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::{PhotoBackend, PhotoError, TranscodedImage};

/// Encodes photos as self-contained `data:` URIs.
///
/// The reference is about 4/3 the size of the JPEG bytes and lives wherever
/// the owning entity is persisted.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedEncoder;

impl EmbeddedEncoder {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(&self, image: &TranscodedImage) -> PhotoRef {
        PhotoRef::embedded(image.mime(), &STANDARD.encode(&image.bytes))
    }
}

#[async_trait]
impl PhotoBackend for EmbeddedEncoder {
    async fn put(&self, image: &TranscodedImage, _role: PhotoRole) -> Result<PhotoRef, PhotoError> {
        Ok(self.encode(image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artcare_common::StorageMode;

    fn image(bytes: &[u8]) -> TranscodedImage {
        TranscodedImage {
            bytes: bytes.to_vec(),
            width: 1,
            height: 1,
        }
    }

    #[tokio::test]
    async fn test_put_returns_data_uri() {
        let photo = EmbeddedEncoder::new()
            .put(&image(b"\xff\xd8\xff\xe0jpeg"), PhotoRole::Work)
            .await
            .unwrap();

        assert_eq!(photo.kind(), StorageMode::Embedded);
        assert!(photo.as_str().starts_with("data:image/jpeg;base64,"));

        let decoded = STANDARD.decode(photo.embedded_payload().unwrap()).unwrap();
        assert_eq!(decoded, b"\xff\xd8\xff\xe0jpeg");
    }

    #[test]
    fn test_expansion_is_four_thirds() {
        let photo = EmbeddedEncoder::new().encode(&image(&[7u8; 3000]));
        assert_eq!(photo.embedded_payload().unwrap().len(), 4000);
    }

    #[test]
    fn test_reparses_as_embedded() {
        let photo = EmbeddedEncoder::new().encode(&image(b"abc"));
        let parsed: PhotoRef = photo.as_str().parse().unwrap();
        assert_eq!(parsed, photo);
    }
}
