use artcare_common::{PhotoRef, PhotoRole};
use async_trait::async_trait;

use super::{PhotoError, TranscodedImage};

/// A place transcoded photos can be stored.
///
/// Implementations are shared behind an `Arc` by the
/// [`StorageRouter`](super::StorageRouter).
#[async_trait]
pub trait PhotoBackend: Send + Sync {
    /// Store `image` and return a reference to it.
    async fn put(&self, image: &TranscodedImage, role: PhotoRole) -> Result<PhotoRef, PhotoError>;
}
