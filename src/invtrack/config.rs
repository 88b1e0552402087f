use crate::error::{InvError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DATA_FILENAME: &str = "db.json";

/// Environment variable naming the data file; wins over the config file.
pub const DATA_ENV: &str = "INVTRACK_DATA";

/// Configuration for invtrack, stored as `config.json` in the platform
/// config directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvConfig {
    /// Store file to use when none is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,

    /// Default log filter (e.g. "info", "invtrack=debug").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// Platform directories for invtrack, if a home directory can be determined.
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "invtrack", "invtrack")
}

impl InvConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: InvConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir)?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Pick the store file: `explicit` (flag or environment) first, then
    /// the configured `data_file`, then `db.json` under `default_dir`.
    pub fn resolve_data_file(
        &self,
        explicit: Option<PathBuf>,
        default_dir: Option<&Path>,
    ) -> Result<PathBuf> {
        if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
            return Ok(path);
        }
        if let Some(path) = &self.data_file {
            return Ok(path.clone());
        }
        default_dir
            .map(|dir| dir.join(DEFAULT_DATA_FILENAME))
            .ok_or_else(|| {
                InvError::InvalidArgument(format!(
                    "no data file given and no data directory found; pass --data or set {}",
                    DATA_ENV
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_config() {
        let dir = tempdir().unwrap();
        let config = InvConfig::load(dir.path()).unwrap();
        assert_eq!(config, InvConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().join("nested");

        let config = InvConfig {
            data_file: Some(PathBuf::from("/srv/inventory.json")),
            log_level: Some("debug".to_string()),
        };
        config.save(&config_dir).unwrap();

        let loaded = InvConfig::load(&config_dir).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unknown_and_missing_fields_use_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"log_level":"warn"}"#).unwrap();

        let config = InvConfig::load(dir.path()).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("warn"));
        assert!(config.data_file.is_none());
    }

    #[test]
    fn test_corrupt_config_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "{ not json").unwrap();
        assert!(matches!(
            InvConfig::load(dir.path()),
            Err(InvError::Serialization(_))
        ));
    }

    #[test]
    fn test_data_file_precedence() {
        let default_dir = Path::new("/var/lib/invtrack");
        let mut config = InvConfig::default();

        assert_eq!(
            config.resolve_data_file(None, Some(default_dir)).unwrap(),
            default_dir.join("db.json")
        );

        config.data_file = Some(PathBuf::from("/etc/inv.json"));
        assert_eq!(
            config.resolve_data_file(None, Some(default_dir)).unwrap(),
            PathBuf::from("/etc/inv.json")
        );

        assert_eq!(
            config
                .resolve_data_file(Some(PathBuf::from("cli.json")), Some(default_dir))
                .unwrap(),
            PathBuf::from("cli.json")
        );
    }

    #[test]
    fn test_no_data_file_anywhere_is_invalid_argument() {
        let config = InvConfig::default();
        assert!(matches!(
            config.resolve_data_file(None, None),
            Err(InvError::InvalidArgument(_))
        ));
    }
}
