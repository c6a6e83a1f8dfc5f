//! Configuration loading and saving.
//!
//! Two files contribute settings, in increasing precedence:
//!
//! 1. Global config: `~/.addt/config.toml`
//! 2. Project config: `./.addt.toml`
//!
//! Environment overrides (see [`super::env`]) are applied on top by the caller.
//! Missing files are not errors. Invalid TOML is an error (fail fast with a
//! clear message naming the file).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::ConfigError;
use super::schema::{FileConfig, OtelSettings};
use crate::firewall::FirewallMode;

/// Global configuration directory name (under `$HOME`).
pub const GLOBAL_CONFIG_DIR: &str = ".addt";

/// Global configuration filename.
pub const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Project configuration filename (in the working directory).
pub const PROJECT_CONFIG_FILE: &str = ".addt.toml";

/// Both configuration files as read from disk.
#[derive(Debug, Clone, Default)]
pub struct ConfigLayers {
    /// Global (user-wide) config.
    pub global: FileConfig,
    /// Project config.
    pub project: FileConfig,
}

impl ConfigLayers {
    /// Firewall mode with project over global over the built-in `strict`.
    pub fn firewall_mode(&self) -> FirewallMode {
        let mut mode = self.global.firewall.mode.clone();
        mode.merge(self.project.firewall.mode.clone());
        mode.resolve(&FirewallMode::default())
    }

    /// Telemetry settings in increasing precedence.
    pub fn otel_layers(&self) -> [&OtelSettings; 2] {
        [&self.global.otel, &self.project.otel]
    }
}

/// Reads and writes the global and project configuration files.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Path to the global configuration.
    global_path: PathBuf,
    /// Path to the project configuration.
    project_path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader, using the default path for any file not given.
    ///
    /// The home directory is only consulted when no global path is given.
    pub fn from_overrides(
        global_path: Option<PathBuf>,
        project_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let global_path = match global_path {
            Some(path) => path,
            None => default_global_path()?,
        };

        Ok(Self {
            global_path,
            project_path: project_path.unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE)),
        })
    }

    /// Create a loader with explicit paths.
    #[must_use]
    pub fn with_paths(global_path: PathBuf, project_path: PathBuf) -> Self {
        Self {
            global_path,
            project_path,
        }
    }

    /// Path of the global config file.
    pub fn global_path(&self) -> &Path {
        &self.global_path
    }

    /// Path of the project config file.
    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    /// Load both configuration files.
    pub fn load(&self) -> Result<ConfigLayers, ConfigError> {
        Ok(ConfigLayers {
            global: self.load_global()?,
            project: self.load_project()?,
        })
    }

    /// Load the global config, or an empty one if the file is missing.
    pub fn load_global(&self) -> Result<FileConfig, ConfigError> {
        Ok(self.load_file(&self.global_path)?.unwrap_or_default())
    }

    /// Load the project config, or an empty one if the file is missing.
    pub fn load_project(&self) -> Result<FileConfig, ConfigError> {
        Ok(self.load_file(&self.project_path)?.unwrap_or_default())
    }

    /// Read-modify-write the global config.
    pub fn update_global<F>(&self, update: F) -> Result<FileConfig, ConfigError>
    where
        F: FnOnce(&mut FileConfig),
    {
        self.update_file(&self.global_path, update)
    }

    /// Read-modify-write the project config.
    pub fn update_project<F>(&self, update: F) -> Result<FileConfig, ConfigError>
    where
        F: FnOnce(&mut FileConfig),
    {
        self.update_file(&self.project_path, update)
    }

    fn update_file<F>(&self, path: &Path, update: F) -> Result<FileConfig, ConfigError>
    where
        F: FnOnce(&mut FileConfig),
    {
        let mut config = self.load_file(path)?.unwrap_or_default();
        update(&mut config);
        self.write_file(path, &config)?;
        Ok(config)
    }

    /// Write a config file, creating its parent directory.
    fn write_file(&self, path: &Path, config: &FileConfig) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let contents = toml::to_string_pretty(config)?;
        fs::write(path, contents).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        debug!("Wrote config to {:?}", path);
        Ok(())
    }

    /// Load a config file, returning None if it doesn't exist.
    fn load_file(&self, path: &Path) -> Result<Option<FileConfig>, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config: FileConfig =
                    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                        path: path.to_path_buf(),
                        source: e,
                    })?;
                debug!("Loaded config from {:?}", path);
                Ok(Some(config))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config found at {:?}", path);
                Ok(None)
            }
            Err(e) => Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }
}

/// `~/.addt/config.toml`.
pub fn default_global_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
    Ok(home.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingValue;
    use tempfile::tempdir;

    fn loader_in(dir: &Path) -> ConfigLoader {
        ConfigLoader::with_paths(
            dir.join("home").join(GLOBAL_CONFIG_FILE),
            dir.join(PROJECT_CONFIG_FILE),
        )
    }

    #[test]
    fn test_from_overrides_keeps_given_paths() {
        let loader = ConfigLoader::from_overrides(
            Some(PathBuf::from("/tmp/g.toml")),
            Some(PathBuf::from("/tmp/p.toml")),
        )
        .unwrap();

        assert_eq!(loader.global_path(), Path::new("/tmp/g.toml"));
        assert_eq!(loader.project_path(), Path::new("/tmp/p.toml"));
    }

    #[test]
    fn test_from_overrides_defaults_project_path() {
        let loader =
            ConfigLoader::from_overrides(Some(PathBuf::from("/tmp/g.toml")), None).unwrap();

        assert_eq!(loader.project_path(), Path::new(PROJECT_CONFIG_FILE));
    }

    #[test]
    fn test_default_global_path_under_home() {
        match default_global_path() {
            Ok(path) => assert!(path.ends_with(".addt/config.toml")),
            Err(err) => assert!(matches!(err, ConfigError::NoHomeDirectory)),
        }
    }

    #[test]
    fn test_missing_files_are_empty() {
        let dir = tempdir().unwrap();
        let layers = loader_in(dir.path()).load().unwrap();

        assert_eq!(layers.global, FileConfig::default());
        assert_eq!(layers.project, FileConfig::default());
        assert_eq!(layers.firewall_mode(), FirewallMode::Strict);
    }

    #[test]
    fn test_project_mode_overrides_global() {
        let dir = tempdir().unwrap();
        let loader = loader_in(dir.path());
        fs::create_dir_all(dir.path().join("home")).unwrap();
        fs::write(loader.global_path(), "[firewall]\nmode = \"off\"\n").unwrap();
        fs::write(loader.project_path(), "[firewall]\nmode = \"permissive\"\n").unwrap();

        let layers = loader.load().unwrap();

        assert_eq!(layers.firewall_mode(), FirewallMode::Permissive);
    }

    #[test]
    fn test_global_mode_used_when_project_silent() {
        let dir = tempdir().unwrap();
        let loader = loader_in(dir.path());
        fs::create_dir_all(dir.path().join("home")).unwrap();
        fs::write(loader.global_path(), "[firewall]\nmode = \"off\"\n").unwrap();
        fs::write(loader.project_path(), "[firewall]\nallowed = [\"a.com\"]\n").unwrap();

        let layers = loader.load().unwrap();

        assert_eq!(layers.firewall_mode(), FirewallMode::Off);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let dir = tempdir().unwrap();
        let loader = loader_in(dir.path());
        fs::write(loader.project_path(), "this is not valid TOML [[[").unwrap();

        let err = loader.load().unwrap_err();

        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_invalid_mode_returns_error() {
        let dir = tempdir().unwrap();
        let loader = loader_in(dir.path());
        fs::write(loader.project_path(), "[firewall]\nmode = \"paranoid\"\n").unwrap();

        assert!(matches!(loader.load(), Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_update_creates_parent_directory() {
        let dir = tempdir().unwrap();
        let loader = loader_in(dir.path());

        loader
            .update_global(|cfg| cfg.firewall.allowed.push("example.com".to_string()))
            .unwrap();

        assert!(loader.global_path().exists());
        let global = loader.load_global().unwrap();
        assert_eq!(global.firewall.allowed, vec!["example.com"]);
    }

    #[test]
    fn test_update_preserves_other_settings() {
        let dir = tempdir().unwrap();
        let loader = loader_in(dir.path());
        fs::write(loader.project_path(), "[otel]\nenabled = false\n").unwrap();

        loader
            .update_project(|cfg| cfg.firewall.denied.push("evil.com".to_string()))
            .unwrap();

        let project = loader.load_project().unwrap();
        assert_eq!(project.otel.enabled, SettingValue::Present(false));
        assert_eq!(project.firewall.denied, vec!["evil.com"]);
    }

    #[test]
    fn test_otel_layers_order() {
        let mut layers = ConfigLayers::default();
        layers.global.otel.service_name = SettingValue::Present("global".to_string());
        layers.project.otel.service_name = SettingValue::Present("project".to_string());

        let [first, second] = layers.otel_layers();

        assert_eq!(first.service_name.as_option().map(String::as_str), Some("global"));
        assert_eq!(second.service_name.as_option().map(String::as_str), Some("project"));
    }
}
