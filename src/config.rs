use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Cosmetic admin gate. The administrative commands only change what the
/// CLI exposes, so a hardcoded password is all the protection needed.
const ADMIN_PASSWORD: &str = "admin2024";

/// Display theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Dark
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(format!("Invalid theme: {} (dark, light)", s)),
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Dark => write!(f, "dark"),
            Theme::Light => write!(f, "light"),
        }
    }
}

/// Application configuration, persisted as TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the JSON data blobs
    pub data_dir: PathBuf,

    /// Display theme
    #[serde(default)]
    pub theme: Theme,

    /// Whether an admin session is active
    #[serde(default)]
    pub admin_session: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            theme: Theme::default(),
            admin_session: false,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("planrs")
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to a TOML file, creating parent directories
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("planrs")
            .join("config.toml")
    }

    /// Load from `path` when given, the default location otherwise;
    /// a missing file yields defaults
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(_) => Self::default(),
        }
    }

    /// Save to the default location
    pub fn save_default(&self) -> Result<()> {
        self.save_to_file(Self::default_config_path())
    }

    /// Open an admin session if the password matches
    pub fn admin_login(&mut self, password: &str) -> bool {
        if password == ADMIN_PASSWORD {
            self.admin_session = true;
            true
        } else {
            false
        }
    }

    pub fn admin_logout(&mut self) {
        self.admin_session = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.theme = Theme::Light;
        config.save_to_file(&path).unwrap();

        let loaded = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.theme, Theme::Light);
        assert_eq!(loaded.data_dir, config.data_dir);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let config = AppConfig::load_or_default(Some(&path));
        assert_eq!(config.theme, Theme::Dark);
        assert!(!config.admin_session);
    }

    #[test]
    fn test_admin_login_gate() {
        let mut config = AppConfig::default();
        assert!(!config.admin_login("wrong"));
        assert!(!config.admin_session);

        assert!(config.admin_login("admin2024"));
        assert!(config.admin_session);

        config.admin_logout();
        assert!(!config.admin_session);
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!("DARK".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("solarized".parse::<Theme>().is_err());
    }

    #[test]
    fn test_older_config_without_new_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "data_dir = \"/tmp/planrs\"\n").unwrap();

        let config = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(config.theme, Theme::Dark);
        assert!(!config.admin_session);
    }
}
