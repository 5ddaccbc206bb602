//! Remote storage: photos are uploaded to an object store that hands back a
//! public URL.
//!
//! The wire contract is an unsigned multipart upload, as used by Cloudinary:
//!
//! - request fields `file`, `upload_preset` and `folder`
//! - success body `{ "secure_url": "https://..." }`
//! - failure body `{ "error": { "message": "..." } }`

use std::time::Duration;

use artcare_common::{PhotoRef, PhotoRole};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, info};

use super::{PhotoBackend, PhotoError, TranscodedImage};
use crate::config::ExternalStorageConfig;

/// Characters of a non-JSON error body kept in the error message.
const ERROR_BODY_EXCERPT_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    message: String,
}

/// Uploads photos to a remote object store.
pub struct ExternalUploader {
    client: reqwest::Client,
    config: ExternalStorageConfig,
}

impl ExternalUploader {
    /// Create an uploader from its configuration.
    ///
    /// The HTTP client's timeout is `timeout_secs`; a timed-out upload is
    /// reported as [`PhotoError::Upload`].
    pub fn new(config: ExternalStorageConfig) -> Result<Self, PhotoError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PhotoError::upload(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn form(&self, image: &TranscodedImage, role: PhotoRole) -> Result<Form, PhotoError> {
        let file = Part::bytes(image.bytes.clone())
            .file_name(format!("{role}.jpg"))
            .mime_str(image.mime())
            .map_err(|e| PhotoError::upload(e.to_string()))?;

        Ok(Form::new()
            .part("file", file)
            .text("upload_preset", self.config.upload_preset.clone())
            .text("folder", self.config.folder_for(role).to_string()))
    }
}

#[async_trait]
impl PhotoBackend for ExternalUploader {
    async fn put(&self, image: &TranscodedImage, role: PhotoRole) -> Result<PhotoRef, PhotoError> {
        let form = self.form(image, role)?;

        debug!(
            endpoint = %self.config.endpoint,
            folder = self.config.folder_for(role),
            size = image.bytes.len(),
            "Uploading photo"
        );

        let resp = self
            .client
            .post(&self.config.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PhotoError::upload(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| PhotoError::upload(e.to_string()))?;
        let parsed: Option<UploadResponse> = serde_json::from_str(&body).ok();

        if let Some(UploadResponse {
            error: Some(error), ..
        }) = &parsed
        {
            return Err(PhotoError::upload(error.message.clone()));
        }

        if !status.is_success() {
            let detail = excerpt(&body);
            return Err(PhotoError::upload(if detail.is_empty() {
                format!("upload endpoint returned {status}")
            } else {
                format!("upload endpoint returned {status}: {detail}")
            }));
        }

        let url = parsed
            .and_then(|r| r.secure_url)
            .ok_or_else(|| PhotoError::upload("response did not include secure_url"))?;

        let photo = PhotoRef::external(url).map_err(|e| PhotoError::upload(e.to_string()))?;
        info!(url = %photo, "Photo uploaded");
        Ok(photo)
    }
}

fn excerpt(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(ERROR_BODY_EXCERPT_CHARS) {
        Some((end, _)) => format!("{}...", &body[..end]),
        None => body.to_string(),
    }
}
