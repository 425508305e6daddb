//! Configuration management for estate-finder.
//!
//! Supports layered configuration: defaults → project → user → env

use crate::error::ConfigError;
use crate::query::SortKey;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub listings: ListingsConfig,
}

impl AppConfig {
    /// Load configuration with hierarchy: defaults → project → user → env
    pub fn load(project_root: Option<&Path>) -> Result<Self, ConfigError> {
        use config::{Config, Environment, File};

        let mut builder = Config::builder();

        // 1. Start with defaults
        builder = builder.add_source(
            config::File::from_str(
                include_str!("../default_config.toml"),
                config::FileFormat::Toml,
            )
            .required(false),
        );

        // 2. Project-specific config (.estate-finder.toml in project root)
        if let Some(root) = project_root {
            let project_config = root.join(".estate-finder.toml");
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }
        }

        // 3. User config (~/.config/estate-finder/config.toml)
        if let Some(config_dir) =
            directories::ProjectDirs::from("com", "estate-finder", "estate-finder")
        {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(File::from(user_config).required(false));
            }
        }

        // 4. Environment variables (ESTATE_FINDER_*)
        builder = builder.add_source(
            Environment::with_prefix("ESTATE_FINDER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Check that configured fixture files exist
    pub fn validate(&self) -> Result<(), ConfigError> {
        for path in [&self.data.properties_path, &self.data.favorites_path]
            .into_iter()
            .flatten()
        {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.clone()));
            }
        }
        Ok(())
    }
}

/// Data source configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// JSON fixture with property records; bundled sample data when unset
    #[serde(default)]
    pub properties_path: Option<PathBuf>,
    /// JSON fixture with saved favorites; starts empty when unset
    #[serde(default)]
    pub favorites_path: Option<PathBuf>,
    /// Artificial delay added to every repository call
    #[serde(default)]
    pub simulated_latency_ms: u64,
}

impl DataConfig {
    /// Simulated latency as a duration
    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

/// Listings view configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingsConfig {
    /// Sort order applied when a session starts
    #[serde(default)]
    pub default_sort: SortKey,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.data.properties_path, None);
        assert_eq!(config.data.favorites_path, None);
        assert_eq!(config.data.simulated_latency(), Duration::ZERO);
        assert_eq!(config.listings.default_sort, SortKey::Newest);
    }

    #[test]
    fn test_project_config_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let fixture = temp.path().join("homes.json");
        fs::write(&fixture, "[]").unwrap();
        fs::write(
            temp.path().join(".estate-finder.toml"),
            format!(
                "[data]\nproperties_path = {:?}\nsimulated_latency_ms = 250\n\n\
                 [listings]\ndefault_sort = \"price-low\"\n",
                fixture.to_string_lossy()
            ),
        )
        .unwrap();

        let config = AppConfig::load(Some(temp.path())).unwrap();
        assert_eq!(config.data.properties_path, Some(fixture));
        assert_eq!(config.data.simulated_latency(), Duration::from_millis(250));
        assert_eq!(config.listings.default_sort, SortKey::PriceLow);
    }

    #[test]
    fn test_missing_fixture_is_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".estate-finder.toml"),
            "[data]\nfavorites_path = \"/nonexistent/favorites.json\"\n",
        )
        .unwrap();

        let result = AppConfig::load(Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }
}
