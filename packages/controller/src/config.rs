//! Application configuration loaded from TOML.
//!
//! ```toml
//! dataset_template = "data/claims_{year}.csv"
//! years = ["2023", "2024", "2025"]
//! default_year = "2025"
//! boundary_source = "data/boundaries.geojson"
//! municipality = "Oshawa"
//!
//! [clusters]
//! max_cluster_radius_px = 1
//! spiderfy_on_max_zoom = true
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};

use claims_map_loader::DEFAULT_TEMPLATE;
use claims_map_map::ClusterOptions;
use serde::Deserialize;

use crate::DEFAULT_YEAR;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "CLAIMS_MAP_CONFIG";

/// Config file looked up in the working directory when nothing else is set.
pub const DEFAULT_CONFIG_FILE: &str = "claims-map.toml";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`AppConfig`].
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Dataset locator template containing `{year}`.
    pub dataset_template: String,
    /// Years offered by the year selector.
    pub years: Vec<String>,
    /// Year loaded at startup when none is selected.
    pub default_year: String,
    /// Boundary overlay locator. No overlay when unset.
    pub boundary_source: Option<String>,
    /// Boundary feature `name` to draw.
    pub municipality: String,
    /// Marker clustering settings.
    pub clusters: ClusterOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_template: DEFAULT_TEMPLATE.to_owned(),
            years: vec!["2023".to_owned(), "2024".to_owned(), "2025".to_owned()],
            default_year: DEFAULT_YEAR.to_owned(),
            boundary_source: None,
            municipality: "Oshawa".to_owned(),
            clusters: ClusterOptions::default(),
        }
    }
}

impl AppConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the document is invalid.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file can't be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Loads configuration from `explicit`, else the file named by
    /// [`CONFIG_ENV`], else [`DEFAULT_CONFIG_FILE`] if it exists, else
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a named config file can't be read or
    /// parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            log::info!("Loading config from {}", path.display());
            return Self::from_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV)
            && !path.trim().is_empty()
        {
            log::info!("Loading config from {path} ({CONFIG_ENV})");
            return Self::from_file(Path::new(&path));
        }

        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            log::info!("Loading config from {DEFAULT_CONFIG_FILE}");
            return Self::from_file(fallback);
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn parses_full_document() {
        let config = AppConfig::from_toml(
            r#"
            dataset_template = "https://data.example.org/claims/{year}.csv"
            years = ["2024", "2025"]
            default_year = "2024"
            boundary_source = "data/boundaries.geojson"
            municipality = "Whitby"

            [clusters]
            max_cluster_radius_px = 2
            spiderfy_on_max_zoom = false
            "#,
        )
        .unwrap();

        assert_eq!(config.years, vec!["2024", "2025"]);
        assert_eq!(config.default_year, "2024");
        assert_eq!(config.boundary_source.as_deref(), Some("data/boundaries.geojson"));
        assert_eq!(config.municipality, "Whitby");
        assert_eq!(config.clusters.max_cluster_radius_px, 2);
        assert!(!config.clusters.spiderfy_on_max_zoom);
        assert!(!config.clusters.show_coverage_on_hover);
    }

    #[test]
    fn rejects_wrong_types() {
        assert!(matches!(
            AppConfig::from_toml("years = 2025"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("no/such/claims-map.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
