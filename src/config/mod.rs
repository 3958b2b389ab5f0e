//! Configuration loading
//!
//! Settings are layered, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. TOML file (`<config dir>/ecotrack/config.toml`, or `--config <path>`)
//! 3. `ECOTRACK_*` environment variables
//! 4. Command-line flags (applied by the CLI)
//!
//! ```toml
//! log_level = "info"
//! cities_file = "/path/to/cities.json"
//!
//! [openaq]
//! base_url = "https://api.openaq.org"
//! timeout_secs = 30
//!
//! [location]
//! latitude = 28.6139
//! longitude = 77.2090
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::air::openaq::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::air::Coordinates;
use crate::error::{Error, Result};

/// Valid log levels for configuration validation.
pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcoTrackConfig {
    pub log_level: String,
    pub openaq: OpenAqConfig,
    pub location: LocationConfig,
    /// JSON dataset replacing the built-in cities
    pub cities_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAqConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

/// Fixed position used in place of a device location service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for EcoTrackConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            openaq: OpenAqConfig::default(),
            location: LocationConfig::default(),
            cities_file: None,
        }
    }
}

impl Default for OpenAqConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// Default location of the config file
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "ecotrack", "ecotrack")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

impl EcoTrackConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load defaults, the config file and environment overrides.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(default) if default.exists() => Self::from_file(&default)?,
                _ => Self::default(),
            },
        };
        config.merge_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn merge_env_vars(&mut self) -> Result<()> {
        self.merge_env_with(|key| std::env::var(key).ok())
    }

    /// Apply `ECOTRACK_*` overrides read through `lookup`
    pub fn merge_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("ECOTRACK_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(url) = lookup("ECOTRACK_OPENAQ_URL") {
            self.openaq.base_url = url;
        }
        if let Some(key) = lookup("ECOTRACK_OPENAQ_API_KEY") {
            self.openaq.api_key = Some(key);
        }
        if let Some(secs) = lookup("ECOTRACK_HTTP_TIMEOUT_SECS") {
            self.openaq.timeout_secs = parse_env("ECOTRACK_HTTP_TIMEOUT_SECS", &secs)?;
        }
        if let Some(lat) = lookup("ECOTRACK_LATITUDE") {
            self.location.latitude = Some(parse_env("ECOTRACK_LATITUDE", &lat)?);
        }
        if let Some(lon) = lookup("ECOTRACK_LONGITUDE") {
            self.location.longitude = Some(parse_env("ECOTRACK_LONGITUDE", &lon)?);
        }
        if let Some(path) = lookup("ECOTRACK_CITIES_FILE") {
            self.cities_file = Some(PathBuf::from(path));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(Error::Config(format!(
                "log_level must be one of {}, got '{}'",
                VALID_LOG_LEVELS.join(", "),
                self.log_level
            )));
        }
        Url::parse(&self.openaq.base_url).map_err(|e| {
            Error::Config(format!(
                "openaq.base_url '{}' is not a valid URL: {e}",
                self.openaq.base_url
            ))
        })?;
        if self.openaq.timeout_secs == 0 {
            return Err(Error::Config(
                "openaq.timeout_secs must be greater than zero".to_string(),
            ));
        }
        self.coordinates()?;
        Ok(())
    }

    /// Configured fixed position, if both latitude and longitude are set
    pub fn coordinates(&self) -> Result<Option<Coordinates>> {
        match (self.location.latitude, self.location.longitude) {
            (Some(lat), Some(lon)) => Ok(Some(Coordinates::new(lat, lon)?)),
            (None, None) => Ok(None),
            _ => Err(Error::Config(
                "location.latitude and location.longitude must be set together".to_string(),
            )),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.openaq.timeout_secs)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("{key}='{value}' is invalid: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = EcoTrackConfig::default();
        config.validate().unwrap();
        assert_eq!(config.openaq.base_url, "https://api.openaq.org");
        assert_eq!(config.coordinates().unwrap(), None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EcoTrackConfig::from_toml_str(
            r#"
            log_level = "debug"

            [location]
            latitude = 19.076
            longitude = 72.8777
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.openaq.timeout_secs, 30);
        let coords = config.coordinates().unwrap().unwrap();
        assert_eq!(coords.latitude, 19.076);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = EcoTrackConfig::from_toml_str("log_level = \"warn\"").unwrap();
        config
            .merge_env_with(env(&[
                ("ECOTRACK_LOG_LEVEL", "trace"),
                ("ECOTRACK_OPENAQ_URL", "http://localhost:9000"),
                ("ECOTRACK_LATITUDE", "12.97"),
                ("ECOTRACK_LONGITUDE", "77.59"),
                ("ECOTRACK_HTTP_TIMEOUT_SECS", "5"),
            ]))
            .unwrap();
        assert_eq!(config.log_level, "trace");
        assert_eq!(config.openaq.base_url, "http://localhost:9000");
        assert_eq!(config.http_timeout(), Duration::from_secs(5));
        config.validate().unwrap();
    }

    #[test]
    fn test_bad_env_number_is_config_error() {
        let mut config = EcoTrackConfig::default();
        let err = config
            .merge_env_with(env(&[("ECOTRACK_LATITUDE", "north")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("ECOTRACK_LATITUDE")));
    }

    #[test]
    fn test_validation_failures() {
        let config = EcoTrackConfig {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = EcoTrackConfig::default();
        config.openaq.base_url = "::nope".to_string();
        assert!(config.validate().is_err());

        let mut config = EcoTrackConfig::default();
        config.openaq.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = EcoTrackConfig::default();
        config.location.latitude = Some(10.0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = EcoTrackConfig::default();
        config.location.latitude = Some(100.0);
        config.location.longitude = Some(10.0);
        assert!(matches!(config.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = EcoTrackConfig::load(Some(Path::new("/nonexistent/ecotrack.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
