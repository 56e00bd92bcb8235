use super::types::Config;
use crate::core::endpoint::health::ProbeOptions;
use crate::core::endpoint::resolver::ResolverSettings;
use crate::core::endpoint::types::Endpoint;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Home directory not found")]
    HomeDirNotFound,
    #[error("Config read error: {0}")]
    Read(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl Config {
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeDirNotFound)?;
        Ok(home.join(".apiscout"))
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load `~/.apiscout/config.toml`, defaults when the file does not exist
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Write the default config unless one already exists
    pub fn init() -> Result<(), ConfigError> {
        let path = Self::config_path()?;
        if path.exists() {
            println!("Config already exists at {}", path.display());
            return Ok(());
        }
        Config::default().save_to(&path)?;
        println!("Created config at {}", path.display());
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn print(&self) -> Result<(), ConfigError> {
        print!("{}", toml::to_string_pretty(self)?);
        Ok(())
    }

    /// Validate every URL and numeric bound
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.backend_port == 0 {
            return Err(ConfigError::Invalid("backend_port must be non-zero".to_string()));
        }
        if self.probe_timeout_ms == 0 {
            return Err(ConfigError::Invalid("probe_timeout_ms must be non-zero".to_string()));
        }
        if !self.placeholder_image.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "placeholder_image must be a local absolute path, got {:?}",
                self.placeholder_image
            )));
        }

        let urls = std::iter::once(("native_fallback", &self.native_fallback))
            .chain(self.platform_fallbacks.values().map(|u| ("platform_fallbacks", u)))
            .chain(self.candidates.iter().map(|u| ("candidates", u)));
        for (field, url) in urls {
            Endpoint::parse(url)
                .map_err(|e| ConfigError::Invalid(format!("{} entry {:?}: {}", field, url, e)))?;
        }
        Ok(())
    }

    /// Resolver inputs; the build-time override always comes from the binary
    pub fn resolver_settings(&self) -> ResolverSettings {
        ResolverSettings {
            backend_port: self.backend_port,
            native_schemes: self.native_schemes.clone(),
            native_fallback: self.native_fallback.clone(),
            platform_fallbacks: self.platform_fallbacks.clone(),
            ..ResolverSettings::default()
        }
    }

    /// Configured timeout, then `APISCOUT_TIMEOUT_MS`
    pub fn probe_options(&self) -> ProbeOptions {
        ProbeOptions::with_timeout_ms(self.probe_timeout_ms).with_env_override()
    }
}
