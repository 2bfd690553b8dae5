//! Config file handling

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::client::timeout_from_secs;
use crate::errors::RamjamError;
use crate::pipeline::DEFAULT_TIMEOUT;

/// Overrides the config directory, mostly for tests and CI
pub const CONFIG_DIR_ENV: &str = "RAMJAM_CONFIG_DIR";

/// ramjam configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub config_dir: PathBuf,
    /// Request timeout used when `--timeout` is not given
    pub timeout: Duration,
    /// Verbose output even without `-v`
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: Self::default_config_dir(),
            timeout: DEFAULT_TIMEOUT,
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from the config file (TOML format)
    pub fn load() -> Result<Self, RamjamError> {
        Self::load_from(&Self::default_config_dir())
    }

    /// Load `config.toml` from `config_dir`; a missing file means defaults
    pub fn load_from(config_dir: &Path) -> Result<Self, RamjamError> {
        let config_file = config_dir.join("config.toml");

        if !config_file.exists() {
            return Ok(Self {
                config_dir: config_dir.to_path_buf(),
                ..Self::default()
            });
        }

        let content = std::fs::read_to_string(&config_file)
            .map_err(|e| RamjamError::Config(format!("Failed to read config: {}", e)))?;

        let config = Self::parse(&content, config_dir)?;
        debug!(path = %config_file.display(), ?config, "loaded config");
        Ok(config)
    }

    fn parse(content: &str, config_dir: &Path) -> Result<Self, RamjamError> {
        let toml_value: toml::Value = toml::from_str(content)
            .map_err(|e| RamjamError::Config(format!("Invalid config TOML: {}", e)))?;

        let defaults = toml_value.get("defaults");

        let timeout = match defaults.and_then(|d| d.get("timeout")) {
            None => DEFAULT_TIMEOUT,
            Some(value) => {
                let secs = value
                    .as_float()
                    .or_else(|| value.as_integer().map(|i| i as f64))
                    .ok_or_else(|| {
                        RamjamError::Config("defaults.timeout must be a number of seconds".to_string())
                    })?;
                timeout_from_secs(secs).map_err(|e| RamjamError::Config(e.to_string()))?
            }
        };

        let verbose = match defaults.and_then(|d| d.get("verbose")) {
            None => false,
            Some(value) => value.as_bool().ok_or_else(|| {
                RamjamError::Config("defaults.verbose must be true or false".to_string())
            })?,
        };

        Ok(Self {
            config_dir: config_dir.to_path_buf(),
            timeout,
            verbose,
        })
    }

    /// Get the default config directory
    fn default_config_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return PathBuf::from(dir);
        }
        dirs::config_dir()
            .map(|p| p.join("ramjam"))
            .unwrap_or_else(|| PathBuf::from(".ramjam"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(!config.verbose);
        assert_eq!(config.config_dir, dir.path());
    }

    #[test]
    fn test_defaults_section() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "[defaults]\ntimeout = 2.5\nverbose = true\n",
        )
        .unwrap();

        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert!(config.verbose);
    }

    #[test]
    fn test_integer_timeout() {
        let config = Config::parse("[defaults]\ntimeout = 5\n", Path::new(".")).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!config.verbose);
    }

    #[test]
    fn test_invalid_config() {
        let dir = Path::new(".");
        assert!(matches!(Config::parse("[defaults", dir), Err(RamjamError::Config(_))));
        assert!(Config::parse("[defaults]\ntimeout = \"soon\"\n", dir).is_err());
        assert!(Config::parse("[defaults]\ntimeout = 0\n", dir).is_err());
        assert!(Config::parse("[defaults]\nverbose = 1\n", dir).is_err());
    }
}
