pub mod persist;
mod types;

pub use types::*;

use anyhow::{Context, Result};
use artcare_common::StorageMode;
use std::path::{Path, PathBuf};

const DEFAULT_PATHS: [&str; 3] = [
    "./artcare.toml",
    "~/.config/artcare/config.toml",
    "/etc/artcare/config.toml",
];

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Find the config file in use: the custom path if given, else the first
/// default location that exists.
pub fn resolve_config_path(custom_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = custom_path {
        return Some(path.to_path_buf());
    }

    DEFAULT_PATHS
        .iter()
        .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()))
        .find(|p| p.exists())
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    match resolve_config_path(custom_path) {
        Some(path) => load_config(&path),
        None => Ok(Config::default()),
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    for (role, profile) in [("work", config.profiles.work), ("field", config.profiles.field)] {
        if let Err(e) = profile.validate() {
            anyhow::bail!("Profile '{}' is invalid: {}", role, e);
        }
    }

    if let Some(external) = &config.storage.external {
        if external.endpoint.trim().is_empty() {
            anyhow::bail!("External storage is configured but has no endpoint");
        }
        if external.upload_preset.trim().is_empty() {
            anyhow::bail!("External storage is configured but has no upload preset");
        }
    }

    if config.storage.mode == StorageMode::External && config.storage.external.is_none() {
        tracing::warn!(
            "Storage mode is 'external' but [storage.external] is missing; uploads will fail"
        );
    }

    if config.quota.embedded_limit_bytes == 0 || config.quota.external_limit_bytes == 0 {
        anyhow::bail!("Quota limits must be greater than 0");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use artcare_common::PhotoRole;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.storage.mode, StorageMode::Embedded);
        assert!(config.storage.external.is_none());
        assert_eq!(config.profiles.work.max_dimension, 900);
        assert_eq!(config.profiles.field.max_dimension, 600);
        validate_config(&config).unwrap();
    }

    #[test]
    fn test_parse_external_storage() {
        let config: Config = toml::from_str(
            r#"
[storage]
mode = "external"

[storage.external]
endpoint = "https://api.cloudinary.com/v1_1/demo/image/upload"
upload_preset = "artcare_unsigned"
"#,
        )
        .unwrap();

        let external = config.storage.external.as_ref().unwrap();
        assert_eq!(config.storage.mode, StorageMode::External);
        assert_eq!(external.folder_for(PhotoRole::Work), "works");
        assert_eq!(external.folder_for(PhotoRole::Field), "teaching-records");
        assert_eq!(external.timeout_secs, 30);
        validate_config(&config).unwrap();
    }

    #[test]
    fn test_profile_override() {
        let config: Config = toml::from_str(
            r#"
[profiles.work]
max_dimension = 1200
quality = 0.9
"#,
        )
        .unwrap();

        assert_eq!(config.profiles.for_role(PhotoRole::Work).max_dimension, 1200);
        assert_eq!(config.profiles.for_role(PhotoRole::Field).max_dimension, 600);
    }

    #[test]
    fn test_invalid_quality_rejected() {
        let config: Config = toml::from_str(
            r#"
[profiles.field]
max_dimension = 600
quality = 1.5
"#,
        )
        .unwrap();

        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        let config: Config = toml::from_str(
            r#"
[storage.external]
endpoint = ""
upload_preset = "p"
"#,
        )
        .unwrap();

        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artcare.toml");
        std::fs::write(&path, "[database]\npath = \"/tmp/test.db\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.database.path, "/tmp/test.db");
    }

    #[test]
    fn test_load_config_missing_file_fails() {
        assert!(load_config(Path::new("/nonexistent/artcare.toml")).is_err());
    }
}
