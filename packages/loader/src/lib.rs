#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Year-scoped claim dataset loading.
//!
//! A [`SourceTemplate`] turns a year into a locator, a [`DatasetSource`]
//! fetches the text behind that locator, and [`parse::parse_claims_csv`]
//! turns the header-delimited text into [`ClaimRecord`]s.

pub mod parse;
pub mod source;

use async_trait::async_trait;
use claims_map_claim_models::ClaimRecord;
use geojson::{FeatureCollection, GeoJson};

pub use source::{DefaultSource, MemorySource};

/// Default locator template for yearly datasets.
pub const DEFAULT_TEMPLATE: &str = "data/claims_{year}.csv";

/// Errors that can occur while fetching or parsing a dataset.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// `GeoJSON` parsing failed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The locator could not be resolved by this source.
    #[error("Source not found: {locator}")]
    NotFound {
        /// The locator that was requested.
        locator: String,
    },

    /// The fetched document had an unexpected shape.
    #[error("Unexpected document: {message}")]
    Unexpected {
        /// Description of what went wrong.
        message: String,
    },
}

/// Something that can return the text behind a dataset locator.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Fetches the full text at `locator`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the file or endpoint cannot be read.
    async fn fetch(&self, locator: &str) -> Result<String, LoadError>;
}

/// Renders a per-year dataset locator from a `{year}` template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTemplate {
    template: String,
}

impl SourceTemplate {
    /// Creates a template. Every `{year}` occurrence is substituted.
    #[must_use]
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_owned(),
        }
    }

    /// Returns the locator for `year`.
    #[must_use]
    pub fn locator_for(&self, year: &str) -> String {
        self.template.replace("{year}", year.trim())
    }
}

impl Default for SourceTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

/// Fetches and parses the dataset at `locator`.
///
/// # Errors
///
/// Returns [`LoadError`] if the fetch or the CSV parse fails.
pub async fn load_claims(
    source: &(impl DatasetSource + ?Sized),
    locator: &str,
) -> Result<Vec<ClaimRecord>, LoadError> {
    log::info!("Loading claims from {locator}");
    let text = source.fetch(locator).await?;
    log::debug!("Fetched {} bytes from {locator}", text.len());
    let records = parse::parse_claims_csv(&text)?;
    log::info!("Loaded {} claims from {locator}", records.len());
    Ok(records)
}

/// Fetches a `GeoJSON` feature collection, e.g. the municipal boundary
/// overlay.
///
/// # Errors
///
/// Returns [`LoadError`] if the fetch fails, the text is not `GeoJSON`, or
/// it is not a feature collection.
pub async fn fetch_boundary(
    source: &(impl DatasetSource + ?Sized),
    locator: &str,
) -> Result<FeatureCollection, LoadError> {
    let text = source.fetch(locator).await?;
    match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => {
            log::debug!(
                "Fetched {} boundary features from {locator}",
                collection.features.len()
            );
            Ok(collection)
        }
        GeoJson::Feature(_) | GeoJson::Geometry(_) => Err(LoadError::Unexpected {
            message: format!("{locator} is not a FeatureCollection"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_substitutes_year() {
        let template = SourceTemplate::default();
        assert_eq!(template.locator_for("2024"), "data/claims_2024.csv");

        let template = SourceTemplate::new("https://example.org/{year}/claims_{year}.csv");
        assert_eq!(
            template.locator_for(" 2023 "),
            "https://example.org/2023/claims_2023.csv"
        );
    }

    #[tokio::test]
    async fn load_claims_parses_fetched_text() {
        let source = MemorySource::new().with_document(
            "data/claims_2025.csv",
            "type,date,latitude,longitude,location_desc\n\
             Pothole,2025-03-01,43.9,-78.86,King St\n\
             Bogus,2025-06-01,,-78.85,\n",
        );

        let records = load_claims(&source, "data/claims_2025.csv").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].display_location(), "King St");
    }

    #[tokio::test]
    async fn load_claims_reports_missing_source() {
        let source = MemorySource::new();
        let err = load_claims(&source, "data/claims_1999.csv")
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[tokio::test]
    async fn fetch_boundary_requires_feature_collection() {
        let source = MemorySource::new()
            .with_document(
                "fc.geojson",
                r#"{"type":"FeatureCollection","features":[]}"#,
            )
            .with_document(
                "point.geojson",
                r#"{"type":"Point","coordinates":[-78.86,43.9]}"#,
            );

        let collection = fetch_boundary(&source, "fc.geojson").await.unwrap();
        assert!(collection.features.is_empty());

        let err = fetch_boundary(&source, "point.geojson").await.unwrap_err();
        assert!(matches!(err, LoadError::Unexpected { .. }));
    }
}
