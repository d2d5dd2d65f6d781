//! Configuration management for chatmark.
//!
//! Parses `chatmark.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override GitHub-flavoured extensions.
    pub gfm: Option<bool>,
    /// Override syntax highlighting of final renders.
    pub highlight: Option<bool>,
    /// Override the render throttle interval.
    pub throttle_ms: Option<u64>,
    /// Override the replay chunk size.
    pub chunk_size: Option<usize>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "chatmark.toml";

/// Largest accepted throttle interval.
const MAX_THROTTLE_MS: u64 = 10_000;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering configuration.
    pub render: RenderConfig,
    /// Stream replay configuration.
    pub replay: ReplayConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Enable tables, strikethrough, task lists and footnotes.
    pub gfm: bool,
    /// Highlight code blocks in final renders.
    pub highlight: bool,
    /// Minimum interval between streaming renders, in milliseconds.
    pub throttle_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            highlight: true,
            throttle_ms: 50,
        }
    }
}

/// Stream replay configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Characters per simulated delta.
    pub chunk_size: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self { chunk_size: 8 }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI overrides.
    ///
    /// An explicit `config_path` must exist. Without one, `chatmark.toml` is
    /// searched for in the current directory and its parents; defaults are
    /// used when none is found.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(gfm) = settings.gfm {
            self.render.gfm = gfm;
        }
        if let Some(highlight) = settings.highlight {
            self.render.highlight = highlight;
        }
        if let Some(throttle_ms) = settings.throttle_ms {
            self.render.throttle_ms = throttle_ms;
        }
        if let Some(chunk_size) = settings.chunk_size {
            self.replay.chunk_size = chunk_size;
        }
    }

    /// Find `chatmark.toml` in `start` or one of its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_render()?;
        self.validate_replay()?;
        Ok(())
    }

    fn validate_render(&self) -> Result<(), ConfigError> {
        let throttle_ms = self.render.throttle_ms;
        if throttle_ms == 0 {
            return Err(ConfigError::Validation(
                "render.throttle_ms must be greater than 0".to_owned(),
            ));
        }
        if throttle_ms > MAX_THROTTLE_MS {
            return Err(ConfigError::Validation(format!(
                "render.throttle_ms cannot exceed {MAX_THROTTLE_MS}"
            )));
        }
        Ok(())
    }

    fn validate_replay(&self) -> Result<(), ConfigError> {
        if self.replay.chunk_size == 0 {
            return Err(ConfigError::Validation(
                "replay.chunk_size must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Render throttle interval.
    #[must_use]
    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.render.throttle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.render.gfm);
        assert!(config.render.highlight);
        assert_eq!(config.render.throttle_ms, 50);
        assert_eq!(config.replay.chunk_size, 8);
        assert_eq!(config.throttle_interval(), Duration::from_millis(50));
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.render.gfm);
        assert_eq!(config.replay.chunk_size, 8);
    }

    #[test]
    fn test_parse_partial_sections() {
        let toml = r"
[render]
gfm = false
throttle_ms = 120

[replay]
chunk_size = 3
";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.render.gfm);
        assert!(config.render.highlight);
        assert_eq!(config.render.throttle_ms, 120);
        assert_eq!(config.replay.chunk_size, 3);
    }

    #[test]
    fn test_validate_throttle_bounds() {
        let mut config = Config::default();
        config.render.throttle_ms = 0;
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: render.throttle_ms must be greater than 0"
        );

        config.render.throttle_ms = 10_001;
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: render.throttle_ms cannot exceed 10000"
        );

        config.render.throttle_ms = 10_000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_chunk_size() {
        let mut config = Config::default();
        config.replay.chunk_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            highlight: Some(false),
            chunk_size: Some(1),
            ..Default::default()
        });

        assert!(config.render.gfm);
        assert!(!config.render.highlight);
        assert_eq!(config.render.throttle_ms, 50);
        assert_eq!(config.replay.chunk_size, 1);
    }

    #[test]
    fn test_load_explicit_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[render]\nthrottle_ms = 16\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.throttle_interval(), Duration::from_millis(16));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);

        std::fs::write(&path, "[replay]\nchunk_size = 0\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::Validation(_))
        ));

        std::fs::write(&path, "[render\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_cli_settings_are_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();

        let settings = CliSettings {
            throttle_ms: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            Config::load(Some(&path), Some(&settings)),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();

        assert_eq!(Config::discover_config(&nested), Some(path));
    }

    #[test]
    fn test_discover_config_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("project");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        let nearest = nested.join(CONFIG_FILENAME);
        std::fs::write(&nearest, "").unwrap();

        assert_eq!(Config::discover_config(&nested), Some(nearest));
    }
}
