use artcare_common::{PhotoRole, StorageMode};
use serde::{Deserialize, Serialize};

use crate::images::TranscodeProfile;
use crate::quota::{DEFAULT_EMBEDDED_QUOTA_BYTES, DEFAULT_EXTERNAL_QUOTA_BYTES};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub profiles: ProfilesConfig,

    #[serde(default)]
    pub quota: QuotaConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// SQLite database file (`~` is expanded)
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "~/.local/share/artcare/artcare.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Backend that receives newly stored photos
    #[serde(default)]
    pub mode: StorageMode,

    /// Remote object store used in `external` mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<ExternalStorageConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExternalStorageConfig {
    /// Multipart upload endpoint, e.g. `https://api.cloudinary.com/v1_1/<cloud>/image/upload`
    pub endpoint: String,

    /// Unsigned upload policy token sent with every upload
    pub upload_preset: String,

    /// Remote folder for work photos
    #[serde(default = "default_work_folder")]
    pub work_folder: String,

    /// Remote folder for teaching-session photos
    #[serde(default = "default_field_folder")]
    pub field_folder: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ExternalStorageConfig {
    /// Remote folder for photos of the given role.
    pub fn folder_for(&self, role: PhotoRole) -> &str {
        match role {
            PhotoRole::Work => &self.work_folder,
            PhotoRole::Field => &self.field_folder,
        }
    }
}

fn default_work_folder() -> String {
    "works".to_string()
}

fn default_field_folder() -> String {
    "teaching-records".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ProfilesConfig {
    #[serde(default = "default_work_profile")]
    pub work: TranscodeProfile,

    #[serde(default = "default_field_profile")]
    pub field: TranscodeProfile,
}

impl ProfilesConfig {
    /// Transcoding profile for photos of the given role.
    pub fn for_role(&self, role: PhotoRole) -> TranscodeProfile {
        match role {
            PhotoRole::Work => self.work,
            PhotoRole::Field => self.field,
        }
    }
}

fn default_work_profile() -> TranscodeProfile {
    TranscodeProfile::WORK_PHOTO
}

fn default_field_profile() -> TranscodeProfile {
    TranscodeProfile::FIELD_PHOTO
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            work: default_work_profile(),
            field: default_field_profile(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct QuotaConfig {
    /// Capacity of the store holding embedded photos (the database)
    #[serde(default = "default_embedded_limit")]
    pub embedded_limit_bytes: u64,

    /// Capacity of the remote object store
    #[serde(default = "default_external_limit")]
    pub external_limit_bytes: u64,
}

fn default_embedded_limit() -> u64 {
    DEFAULT_EMBEDDED_QUOTA_BYTES
}

fn default_external_limit() -> u64 {
    DEFAULT_EXTERNAL_QUOTA_BYTES
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            embedded_limit_bytes: default_embedded_limit(),
            external_limit_bytes: default_external_limit(),
        }
    }
}
