//! Worker configuration
//!
//! Stored as JSON. Missing fields fall back to their defaults, so a config file
//! only needs the values it overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::job::DEFAULT_SEPARATOR;

/// Identifier reported by a worker that never generated its own
pub const DEFAULT_DUCOID: &str = "DUCOID0000000000000000";

/// Prefix of every board identifier
const DUCOID_PREFIX: &str = "DUCOID";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("File I/O error: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    InvalidFormat(#[from] serde_json::Error),

    #[error("Failed to generate board identifier: {0}")]
    Entropy(String),
}

/// Settings for a DUCO-S1 job worker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Board identifier echoed in every result line
    pub ducoid: String,
    /// Separator between job and result fields
    pub separator: char,
    /// Search threads per job (1 searches on the calling thread)
    pub threads: Option<usize>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            ducoid: DEFAULT_DUCOID.to_string(),
            separator: DEFAULT_SEPARATOR,
            threads: None,
        }
    }
}

impl WorkerConfig {
    /// Default settings with a freshly generated board identifier
    pub fn generate() -> Result<Self, ConfigError> {
        Ok(Self {
            ducoid: generate_ducoid()?,
            ..Self::default()
        })
    }

    /// Number of search threads, at least 1
    pub fn search_threads(&self) -> usize {
        self.threads.unwrap_or(1).max(1)
    }

    /// Save the config as pretty-printed JSON, creating parent directories
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Load a config file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load `path` if it exists, otherwise fall back to the defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

/// Generate a board identifier: `DUCOID` followed by 16 uppercase hex digits
///
/// Real boards derive these digits from their chip's unique ID.
pub fn generate_ducoid() -> Result<String, ConfigError> {
    let mut id = [0u8; 8];
    getrandom::getrandom(&mut id).map_err(|e| ConfigError::Entropy(e.to_string()))?;
    Ok(format!("{DUCOID_PREFIX}{}", hex::encode_upper(id)))
}

/// Get the default config file path
#[cfg(feature = "cli")]
pub fn default_config_path() -> std::path::PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    home.join(".duco-sha1").join("worker.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_config_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("duco-sha1-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_generated_ducoid() {
        let id = generate_ducoid().unwrap();

        assert!(id.starts_with("DUCOID"));
        assert_eq!(id.len(), 22);
        assert!(id[6..].chars().all(|c| c.is_ascii_hexdigit()));
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_config_path("save_and_load.json");
        let config = WorkerConfig {
            ducoid: "DUCOIDAABBCCDDEEFF0011".to_string(),
            separator: ';',
            threads: Some(4),
        };

        config.save_to_file(&path).unwrap();
        let loaded = WorkerConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.search_threads(), 4);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let path = temp_config_path("partial.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"ducoid": "DUCOID1111"}"#).unwrap();

        let loaded = WorkerConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.ducoid, "DUCOID1111");
        assert_eq!(loaded.separator, DEFAULT_SEPARATOR);
        assert_eq!(loaded.threads, None);
        assert_eq!(loaded.search_threads(), 1);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_invalid_file() {
        let path = temp_config_path("invalid.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            WorkerConfig::load_from_file(&path),
            Err(ConfigError::InvalidFormat(_))
        ));

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let path = temp_config_path("does-not-exist.json");
        assert_eq!(
            WorkerConfig::load_or_default(&path).unwrap(),
            WorkerConfig::default()
        );
        assert!(matches!(
            WorkerConfig::load_from_file(&path),
            Err(ConfigError::FileError(_))
        ));
    }
}
