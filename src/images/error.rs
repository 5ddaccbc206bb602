use artcare_common::StorageMode;

/// Errors from the photo pipeline: transcoding, backends and routing.
#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    /// The input bytes are not a decodable raster image.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Re-encoding the image failed.
    #[error("Failed to encode image: {0}")]
    Encode(String),

    /// A transcoding profile is out of range.
    #[error("Invalid transcoding profile: {0}")]
    InvalidProfile(String),

    /// The remote object store rejected the upload or could not be reached.
    #[error("Upload failed: {message}")]
    Upload { message: String },

    /// The selected storage mode has no configured backend.
    #[error("No backend configured for '{0}' storage")]
    BackendUnavailable(StorageMode),

    /// The blocking transcode worker panicked or was cancelled.
    #[error("Image worker failed: {0}")]
    Worker(String),
}

impl PhotoError {
    pub fn upload<S: Into<String>>(message: S) -> Self {
        Self::Upload {
            message: message.into(),
        }
    }
}
