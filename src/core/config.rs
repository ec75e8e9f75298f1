/*
 * Read-only plugin configuration: the channel name the host registers us
 * under, the default dialog titles, and optional explicit locations of the
 * helper binaries used by the script-driven dialog back-ends.
 *
 * Settings live in `config.json` inside the application's local configuration
 * directory. A missing or empty file is not an error; defaults are used. The
 * trait (`ConfigManagerOperations`) allows the handler tests and the harness
 * to swap in other sources.
 */
use crate::core::path_utils;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "config.json";
pub const DEFAULT_CHANNEL_NAME: &str = "file_picker";

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Serde(serde_json::Error),
    NoProjectDirectory,
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::Serde(e) => write!(f, "Configuration parse error: {e}"),
            ConfigError::NoProjectDirectory => {
                write!(f, "Could not determine directory for configuration")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Serde(e) => Some(e),
            ConfigError::NoProjectDirectory => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginConfig {
    pub channel_name: String,
    pub single_selection_title: String,
    pub multiple_selection_title: String,
    pub directory_title: String,
    // When unset the binaries are looked up on PATH.
    pub zenity_path: Option<PathBuf>,
    pub osascript_path: Option<PathBuf>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        PluginConfig {
            channel_name: DEFAULT_CHANNEL_NAME.to_string(),
            single_selection_title: "Select a file".to_string(),
            multiple_selection_title: "Select one or more files".to_string(),
            directory_title: "Select a folder".to_string(),
            zenity_path: None,
            osascript_path: None,
        }
    }
}

impl PluginConfig {
    pub fn zenity_program(&self) -> PathBuf {
        self.zenity_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("zenity"))
    }

    pub fn osascript_program(&self) -> PathBuf {
        self.osascript_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("osascript"))
    }
}

pub trait ConfigManagerOperations: Send + Sync {
    fn load_config(&self, app_name: &str) -> Result<PluginConfig>;
}

pub struct CoreConfigManager {}

impl CoreConfigManager {
    pub fn new() -> Self {
        CoreConfigManager {}
    }

    /*
     * Parses a configuration file. Absent or whitespace-only files produce
     * the defaults; unknown keys are ignored and missing keys take their
     * default values.
     */
    pub fn load_from_file(file_path: &Path) -> Result<PluginConfig> {
        if !file_path.exists() {
            log::debug!("CoreConfigManager: Config file {file_path:?} does not exist, using defaults.");
            return Ok(PluginConfig::default());
        }
        let contents = fs::read_to_string(file_path)?;
        if contents.trim().is_empty() {
            log::debug!("CoreConfigManager: Config file {file_path:?} is empty, using defaults.");
            return Ok(PluginConfig::default());
        }
        let config: PluginConfig = serde_json::from_str(&contents)?;
        log::debug!("CoreConfigManager: Loaded config from {file_path:?}: {config:?}");
        Ok(config)
    }
}

impl Default for CoreConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManagerOperations for CoreConfigManager {
    fn load_config(&self, app_name: &str) -> Result<PluginConfig> {
        log::trace!("CoreConfigManager: Loading config for app '{app_name}'");
        let config_dir = path_utils::get_base_app_config_local_dir(app_name)
            .ok_or(ConfigError::NoProjectDirectory)?;
        Self::load_from_file(&config_dir.join(CONFIG_FILENAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = CoreConfigManager::load_from_file(&dir.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(config, PluginConfig::default());
        assert_eq!(config.channel_name, "file_picker");
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "   ").unwrap();
        let config = CoreConfigManager::load_from_file(file.path()).unwrap();
        assert_eq!(config, PluginConfig::default());
    }

    #[test]
    fn test_partial_file_overrides_only_given_keys() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "singleSelectionTitle": "Open", "zenityPath": "/opt/bin/zenity" }}"#
        )
        .unwrap();
        let config = CoreConfigManager::load_from_file(file.path()).unwrap();
        assert_eq!(config.single_selection_title, "Open");
        assert_eq!(config.zenity_program(), PathBuf::from("/opt/bin/zenity"));
        assert_eq!(config.osascript_program(), PathBuf::from("osascript"));
        assert_eq!(
            config.multiple_selection_title,
            PluginConfig::default().multiple_selection_title
        );
    }

    #[test]
    fn test_malformed_file_is_serde_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let result = CoreConfigManager::load_from_file(file.path());
        assert!(matches!(result, Err(ConfigError::Serde(_))));
    }
}
