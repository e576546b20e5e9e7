use crate::config::models::GlobalConfig;
use crate::constants;
use crate::error::Error;
use crate::fs::{FileSystem, OsFileSystem};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigManager<F: FileSystem> {
    fs: F,
    config_dir: PathBuf,
}

impl ConfigManager<OsFileSystem> {
    /// Creates a new `ConfigManager` with the default filesystem and config directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no configuration directory can be determined.
    pub fn new() -> Result<Self, Error> {
        let config_dir = get_config_dir()?;
        Ok(Self {
            fs: OsFileSystem,
            config_dir,
        })
    }
}

impl<F: FileSystem> ConfigManager<F> {
    pub const fn with_fs(fs: F, config_dir: PathBuf) -> Self {
        Self { fs, config_dir }
    }

    /// Get the configuration directory path
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Location of `config.toml`, whether or not it exists
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILENAME)
    }

    /// True when `config.toml` exists
    #[must_use]
    pub fn has_config_file(&self) -> bool {
        self.fs.exists(&self.config_path())
    }

    /// Loads `config.toml`, falling back to defaults when the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_global_config(&self) -> Result<GlobalConfig, Error> {
        let config_path = self.config_path();
        if !self.fs.exists(&config_path) {
            debug!(
                target: "apiprobe::config",
                path = %config_path.display(),
                "No config file, using defaults"
            );
            return Ok(GlobalConfig::default());
        }

        let content = self.fs.read_to_string(&config_path).map_err(|e| {
            Error::from(e).with_context(&format!("Failed to read {}", config_path.display()))
        })?;
        let config: GlobalConfig = toml::from_str(&content)?;
        validate(&config)?;
        Ok(config)
    }

    /// Saves the global configuration to `config.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized or written.
    pub fn save_global_config(&self, config: &GlobalConfig) -> Result<(), Error> {
        self.fs.create_dir_all(&self.config_dir)?;
        let content = config.to_toml()?;
        self.fs.write_all(&self.config_path(), content.as_bytes())?;
        Ok(())
    }
}

/// Rejects values no component can work with
fn validate(config: &GlobalConfig) -> Result<(), Error> {
    for (name, rate) in [
        ("verdict.auto_pass_rate", config.verdict.auto_pass_rate),
        ("verdict.explicit_pass_rate", config.verdict.explicit_pass_rate),
    ] {
        if !(0.0..=1.0).contains(&rate) {
            return Err(Error::invalid_config(format!(
                "{name} must be between 0 and 1, got {rate}"
            )));
        }
    }
    if config.request_timeout_secs == 0 {
        return Err(Error::invalid_config("request_timeout_secs must be positive"));
    }
    if config.suite.max_concurrency == Some(0) {
        return Err(Error::invalid_config("suite.max_concurrency must be positive"));
    }
    Ok(())
}

/// Resolves the configuration directory: `APIPROBE_CONFIG_DIR`, else the
/// platform config directory.
///
/// # Errors
///
/// Returns an error if neither is available.
pub fn get_config_dir() -> Result<PathBuf, Error> {
    if let Ok(dir) = std::env::var(constants::ENV_APIPROBE_CONFIG_DIR) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    dirs::config_dir()
        .map(|dir| dir.join(constants::CONFIG_DIR_NAME))
        .ok_or_else(|| Error::invalid_config("could not determine a configuration directory"))
}
