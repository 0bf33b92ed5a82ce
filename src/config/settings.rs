//! User settings for SealNote
//!
//! Default time limit for new envelopes, password policy and log verbosity.

use serde::{Deserialize, Serialize};

use super::paths::SealPaths;
use crate::error::SealError;

/// User settings for SealNote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Time limit applied when `encrypt` is run without `--time-limit`
    #[serde(default = "default_time_limit_minutes")]
    pub default_time_limit_minutes: u64,

    /// Shortest password accepted when sealing
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,

    /// Log filter used when no environment filter is set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_time_limit_minutes() -> u64 {
    5
}

fn default_min_password_length() -> usize {
    1
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_time_limit_minutes: default_time_limit_minutes(),
            min_password_length: default_min_password_length(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or use defaults if the file doesn't exist
    pub fn load_or_create(paths: &SealPaths) -> Result<Self, SealError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| SealError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| SealError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Load settings, substituting defaults when the file can't be used
    ///
    /// The returned error, if any, describes why the defaults were used.
    pub fn load_lenient(paths: &SealPaths) -> (Self, Option<SealError>) {
        match Self::load_or_create(paths) {
            Ok(settings) => (settings, None),
            Err(err) => (Self::default(), Some(err)),
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SealPaths) -> Result<(), SealError> {
        self.validate()?;
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| SealError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| SealError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject settings that would make sealing impossible
    pub fn validate(&self) -> Result<(), SealError> {
        if self.min_password_length == 0 {
            return Err(SealError::Config(
                "min_password_length must be at least 1".into(),
            ));
        }
        if self.log_level.trim().is_empty() {
            return Err(SealError::Config("log_level must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.default_time_limit_minutes, 5);
        assert_eq!(settings.min_password_length, 1);
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SealPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings.default_time_limit_minutes, 5);
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SealPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            default_time_limit_minutes: 60,
            min_password_length: 8,
            ..Default::default()
        };
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.default_time_limit_minutes, 60);
        assert_eq!(loaded.min_password_length, 8);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SealPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"default_time_limit_minutes": 15}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.default_time_limit_minutes, 15);
        assert_eq!(loaded.log_level, "warn");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SealPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "not json").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, SealError::Config(_)));
    }

    #[test]
    fn test_load_lenient_falls_back_on_broken_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SealPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{ broken").unwrap();

        let (settings, problem) = Settings::load_lenient(&paths);
        assert_eq!(settings.default_time_limit_minutes, 5);
        assert!(matches!(problem, Some(SealError::Config(_))));
    }

    #[test]
    fn test_load_lenient_reads_valid_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SealPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"log_level": "debug"}"#).unwrap();

        let (settings, problem) = Settings::load_lenient(&paths);
        assert_eq!(settings.log_level, "debug");
        assert!(problem.is_none());
    }

    #[test]
    fn test_zero_min_password_length_rejected() {
        let settings = Settings {
            min_password_length: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
