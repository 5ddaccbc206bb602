//! Artcare - photo storage and dataset backup for an art-teaching record book
//!
//! This library crate exposes the photo pipeline, usage accounting, and
//! backup/restore engine used by the `artcare` binary and integration tests.

pub mod backup;
pub mod config;
pub mod images;
pub mod quota;
