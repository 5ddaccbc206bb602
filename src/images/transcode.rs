//! Decode, constrain and re-encode photos before they are stored.

use std::io::Cursor;

use artcare_common::PhotoRole;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::PhotoError;

/// Size and quality limits applied to one role of photo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TranscodeProfile {
    /// Longest allowed side in pixels.
    pub max_dimension: u32,
    /// Lossy quality on a 0..=1 scale (0 excluded).
    pub quality: f32,
}

impl TranscodeProfile {
    /// Photos of finished works.
    pub const WORK_PHOTO: Self = Self {
        max_dimension: 900,
        quality: 0.8,
    };

    /// Photos taken during teaching sessions.
    pub const FIELD_PHOTO: Self = Self {
        max_dimension: 600,
        quality: 0.6,
    };

    /// Built-in profile for a photo role.
    pub fn for_role(role: PhotoRole) -> Self {
        match role {
            PhotoRole::Work => Self::WORK_PHOTO,
            PhotoRole::Field => Self::FIELD_PHOTO,
        }
    }

    pub fn validate(&self) -> Result<(), PhotoError> {
        if self.max_dimension == 0 {
            return Err(PhotoError::InvalidProfile(
                "max_dimension must be greater than 0".to_string(),
            ));
        }
        // Written this way so NaN is rejected too.
        if !(self.quality > 0.0 && self.quality <= 1.0) {
            return Err(PhotoError::InvalidProfile(format!(
                "quality must be in (0, 1], got {}",
                self.quality
            )));
        }
        Ok(())
    }

    /// Quality on the JPEG encoder's 1..=100 scale.
    pub fn jpeg_quality(&self) -> u8 {
        (self.quality * 100.0).round().clamp(1.0, 100.0) as u8
    }

    /// Output dimensions for a `width` x `height` source.
    ///
    /// The longer side is scaled to exactly `max_dimension` when it exceeds
    /// it; smaller images keep their size.
    pub fn target_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        let max = self.max_dimension;
        if width <= max && height <= max {
            return (width, height);
        }

        let scale_side = |side: u32, long: u32| -> u32 {
            let scaled = (side as f64 * max as f64 / long as f64).round() as u32;
            scaled.max(1)
        };

        if width >= height {
            (max, scale_side(height, width))
        } else {
            (scale_side(width, height), max)
        }
    }
}

/// JPEG output of [`transcode`].
#[derive(Debug, Clone)]
pub struct TranscodedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl TranscodedImage {
    pub const MIME: &'static str = "image/jpeg";

    pub fn mime(&self) -> &'static str {
        Self::MIME
    }
}

/// Decode `input` and turn it upright according to its EXIF orientation.
fn decode(input: &[u8]) -> Result<DynamicImage, PhotoError> {
    let decode_err = |e: image::ImageError| PhotoError::Decode(e.to_string());

    let mut decoder = ImageReader::new(Cursor::new(input))
        .with_guessed_format()
        .map_err(|e| PhotoError::Decode(e.to_string()))?
        .into_decoder()
        .map_err(decode_err)?;
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);

    let mut img = DynamicImage::from_decoder(decoder).map_err(decode_err)?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Decode `input`, shrink it to fit `profile`, and re-encode it as JPEG.
///
/// This is CPU-bound and pure; async callers should run it on a blocking
/// thread.
///
/// # Errors
///
/// * [`PhotoError::InvalidProfile`] if the profile is out of range
/// * [`PhotoError::Decode`] if `input` is corrupt or in an unsupported format
/// * [`PhotoError::Encode`] if JPEG encoding fails
pub fn transcode(input: &[u8], profile: &TranscodeProfile) -> Result<TranscodedImage, PhotoError> {
    profile.validate()?;

    let img = decode(input)?;

    let (src_width, src_height) = (img.width(), img.height());
    let (width, height) = profile.target_dimensions(src_width, src_height);

    let img = if (width, height) != (src_width, src_height) {
        img.resize_exact(width, height, FilterType::Triangle)
    } else {
        img
    };

    // JPEG has no alpha channel.
    let rgb = img.to_rgb8();

    let mut buf = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buf, profile.jpeg_quality())
        .encode_image(&rgb)
        .map_err(|e| PhotoError::Encode(e.to_string()))?;
    let bytes = buf.into_inner();

    debug!(
        src_width,
        src_height,
        width,
        height,
        quality = profile.jpeg_quality(),
        size = bytes.len(),
        "Transcoded photo"
    );

    Ok(TranscodedImage {
        bytes,
        width,
        height,
    })
}
