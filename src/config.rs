//! Gallery - Configuration

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::{GalleryError, GalleryResult};
use crate::ledger::{CorruptLedgerPolicy, DEFAULT_STORAGE_KEY};
use crate::permissions::PermissionPolicy;

/// Environment variable overriding [`GalleryConfig::data_dir`]
pub const DATA_DIR_ENV: &str = "GALLERY_DATA_DIR";

/// Gallery configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Application id
    pub app_id: String,
    /// Display name
    pub app_name: String,
    /// Root for photo files and preferences
    pub data_dir: PathBuf,
    /// Preferences key of the photo ledger
    pub storage_key: String,
    /// Capture quality (0-100)
    pub quality: u8,
    /// Grants needed to capture
    pub permission_policy: PermissionPolicy,
    /// Handling of an unreadable ledger
    pub corrupt_ledger: CorruptLedgerPolicy,
    /// Add orphaned photo files back to the ledger on startup
    pub adopt_orphans: bool,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            app_id: "be.michiel.wouters.thomasmore.graduaten.gallery".into(),
            app_name: "Gallery".into(),
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("gallery"),
            storage_key: DEFAULT_STORAGE_KEY.into(),
            quality: 90,
            permission_policy: PermissionPolicy::default(),
            corrupt_ledger: CorruptLedgerPolicy::default(),
            adopt_orphans: false,
        }
    }
}

impl GalleryConfig {
    /// Load from a JSON file; missing fields take defaults
    pub fn load(path: &Path) -> GalleryResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| GalleryError::Config(format!("{}: {}", path.display(), e)))?;
        let config: GalleryConfig = serde_json::from_str(&raw)
            .map_err(|e| GalleryError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides
    pub fn with_env(mut self) -> Self {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            log::info!("Using data dir from {}: {}", DATA_DIR_ENV, dir);
            self.data_dir = PathBuf::from(dir);
        }
        self
    }

    pub fn validate(&self) -> GalleryResult<()> {
        if self.quality > 100 {
            return Err(GalleryError::Config(format!("quality {} is above 100", self.quality)));
        }
        if self.storage_key.is_empty() {
            return Err(GalleryError::Config("storage_key is empty".into()));
        }
        Ok(())
    }

    /// SQLite file holding preferences
    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join("preferences.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = GalleryConfig::default();
        assert_eq!(config.quality, 90);
        assert_eq!(config.storage_key, "photos");
        assert_eq!(config.permission_policy, PermissionPolicy::RequireAny);
        assert_eq!(config.corrupt_ledger, CorruptLedgerPolicy::Quarantine);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gallery.json");
        std::fs::write(
            &path,
            r#"{ "quality": 75, "permission_policy": "require_both", "corrupt_ledger": "fail" }"#,
        )
        .unwrap();

        let config = GalleryConfig::load(&path).unwrap();
        assert_eq!(config.quality, 75);
        assert_eq!(config.permission_policy, PermissionPolicy::RequireBoth);
        assert_eq!(config.corrupt_ledger, CorruptLedgerPolicy::Fail);
        assert_eq!(config.storage_key, "photos");
    }

    #[test]
    fn test_invalid_quality() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gallery.json");
        std::fs::write(&path, r#"{ "quality": 150 }"#).unwrap();

        assert!(matches!(GalleryConfig::load(&path), Err(GalleryError::Config(_))));
    }
}
