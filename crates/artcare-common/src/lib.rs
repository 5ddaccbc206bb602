//! Artcare-Common: Shared types, identifiers, and error handling.
//!
//! This crate provides the vocabulary shared by the database layer and the
//! photo/backup engine:
//!
//! - **Typed IDs**: UUID wrappers for works, locations, seniors, teaching
//!   records, participants, and filter options
//! - **Core Types**: Enums for filter categories, completion status, photo
//!   roles, and storage modes
//! - **Photo References**: [`PhotoRef`], a tagged handle that is either an
//!   embedded data URI or an external URL
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use artcare_common::{PhotoRef, StorageMode, WorkId};
//!
//! let work_id = WorkId::new();
//! assert!(!work_id.to_string().is_empty());
//!
//! let photo: PhotoRef = "https://cdn.example.org/works/a.jpg".parse().unwrap();
//! assert_eq!(photo.kind(), StorageMode::External);
//! ```

pub mod error;
pub mod ids;
pub mod photo_ref;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use photo_ref::{PhotoRef, PhotoRefError};
pub use types::*;
