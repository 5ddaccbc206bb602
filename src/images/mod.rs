//! Photo pipeline.
//!
//! New photos flow through the [`StorageRouter`]: they are transcoded with
//! the profile for their [`PhotoRole`](artcare_common::PhotoRole) and then
//! handed to one [`PhotoBackend`]:
//!
//! - [`EmbeddedEncoder`] turns the JPEG into a base64 data URI
//! - [`ExternalUploader`] uploads it to a remote object store and keeps the URL

mod backend;
mod embedded;
mod error;
mod external;
mod router;
mod transcode;

pub use backend::PhotoBackend;
pub use embedded::EmbeddedEncoder;
pub use error::PhotoError;
pub use external::ExternalUploader;
pub use router::StorageRouter;
pub use transcode::{transcode, TranscodeProfile, TranscodedImage};
