#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! View state for the claims map.
//!
//! [`ViewController`] owns the selected year, the loaded dataset, and the
//! filter control values, and wires user actions through loading,
//! filtering, and marker rendering:
//!
//! * startup and year changes load a dataset and render it,
//! * the filter button re-renders the loaded dataset without re-fetching.
//!
//! Loads are split into [`ViewController::begin_load`] and
//! [`ViewController::complete_load`] around the fetch. Each begin bumps a
//! generation counter, and a completion carrying an older generation is
//! dropped, so the most recently *requested* year always wins even if an
//! earlier request finishes last.

pub mod config;

use claims_map_claim_models::ClaimRecord;
use claims_map_filter::{FilterInputs, FilterSpec, apply_filters};
use claims_map_loader::{DatasetSource, LoadError, SourceTemplate, fetch_boundary, load_claims};
use claims_map_map::boundary::select_municipality;
use claims_map_map::{ClusterOptions, MapLayer, legend_entries, render};

pub use config::AppConfig;

/// Year loaded at startup when nothing is preselected.
pub const DEFAULT_YEAR: &str = "2025";

/// An in-flight dataset load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    year: String,
    locator: String,
}

impl LoadTicket {
    /// Year being loaded.
    #[must_use]
    pub fn year(&self) -> &str {
        &self.year
    }

    /// Locator being fetched.
    #[must_use]
    pub fn locator(&self) -> &str {
        &self.locator
    }
}

#[derive(Debug, Clone)]
struct BoundaryOverlay {
    locator: String,
    municipality: String,
}

/// Owns view state and drives a [`MapLayer`] from a [`DatasetSource`].
pub struct ViewController<S, L> {
    source: S,
    layer: L,
    template: SourceTemplate,
    fallback_year: String,
    clusters: ClusterOptions,
    boundary: Option<BoundaryOverlay>,
    current_year: Option<String>,
    dataset: Vec<ClaimRecord>,
    inputs: FilterInputs,
    generation: u64,
}

impl<S: DatasetSource, L: MapLayer> ViewController<S, L> {
    /// Creates a controller with default settings and no boundary overlay.
    #[must_use]
    pub fn new(source: S, layer: L, template: SourceTemplate) -> Self {
        Self {
            source,
            layer,
            template,
            fallback_year: DEFAULT_YEAR.to_owned(),
            clusters: ClusterOptions::default(),
            boundary: None,
            current_year: None,
            dataset: Vec::new(),
            inputs: FilterInputs::default(),
            generation: 0,
        }
    }

    /// Creates a controller from application configuration.
    #[must_use]
    pub fn from_config(source: S, layer: L, config: &AppConfig) -> Self {
        let mut controller = Self::new(source, layer, SourceTemplate::new(&config.dataset_template))
            .with_fallback_year(&config.default_year)
            .with_clusters(config.clusters);
        if let Some(locator) = &config.boundary_source {
            controller = controller.with_boundary(locator, &config.municipality);
        }
        controller
    }

    /// Sets the year loaded when [`Self::initialize`] gets no selection.
    #[must_use]
    pub fn with_fallback_year(mut self, year: &str) -> Self {
        self.fallback_year = year.to_owned();
        self
    }

    /// Sets the marker clustering options.
    #[must_use]
    pub const fn with_clusters(mut self, clusters: ClusterOptions) -> Self {
        self.clusters = clusters;
        self
    }

    /// Draws the features named `municipality` from `locator` at startup.
    #[must_use]
    pub fn with_boundary(mut self, locator: &str, municipality: &str) -> Self {
        self.boundary = Some(BoundaryOverlay {
            locator: locator.to_owned(),
            municipality: municipality.to_owned(),
        });
        self
    }

    /// Year most recently requested.
    #[must_use]
    pub fn current_year(&self) -> Option<&str> {
        self.current_year.as_deref()
    }

    /// The loaded dataset.
    #[must_use]
    pub fn dataset(&self) -> &[ClaimRecord] {
        &self.dataset
    }

    /// Current filter control values.
    #[must_use]
    pub const fn filter_inputs(&self) -> &FilterInputs {
        &self.inputs
    }

    /// The map layer.
    #[must_use]
    pub const fn layer(&self) -> &L {
        &self.layer
    }

    /// The map layer, mutably.
    pub const fn layer_mut(&mut self) -> &mut L {
        &mut self.layer
    }

    /// Consumes the controller, returning the map layer.
    pub fn into_layer(self) -> L {
        self.layer
    }

    /// Sets up the map and loads the first dataset.
    ///
    /// Loads `preselected` if given and non-blank, otherwise the fallback
    /// year. Returns the displayed count, or `None` if the load failed.
    pub async fn initialize(&mut self, preselected: Option<&str>) -> Option<usize> {
        self.layer.configure_clusters(&self.clusters);
        self.layer.show_legend(&legend_entries());
        self.show_boundary().await;

        let year = preselected
            .map(str::trim)
            .filter(|y| !y.is_empty())
            .map_or_else(|| self.fallback_year.clone(), str::to_owned);
        self.load_year(&year).await
    }

    /// Draws the configured boundary overlay. Failures are logged and the
    /// map carries on without it.
    pub async fn show_boundary(&mut self) {
        let Some(overlay) = self.boundary.clone() else {
            return;
        };

        match fetch_boundary(&self.source, &overlay.locator).await {
            Ok(collection) => {
                let selected = select_municipality(collection, &overlay.municipality);
                if selected.features.is_empty() {
                    log::warn!(
                        "No boundary named '{}' in {}",
                        overlay.municipality,
                        overlay.locator
                    );
                }
                self.layer.show_boundary(&selected);
            }
            Err(e) => {
                log::warn!("Failed to load boundary from {}: {e}", overlay.locator);
            }
        }
    }

    /// Handles a year selector change: clears the filter controls, then
    /// loads `year`.
    pub async fn on_year_change(&mut self, year: &str) -> Option<usize> {
        self.inputs = FilterInputs::default();
        self.load_year(year).await
    }

    /// Replaces the filter control values. Nothing is re-rendered until
    /// [`Self::on_filter_click`].
    pub fn set_filter_inputs(&mut self, inputs: FilterInputs) {
        self.inputs = inputs;
    }

    /// Re-filters the loaded dataset and re-renders. Returns the displayed
    /// count.
    pub fn on_filter_click(&mut self) -> usize {
        let spec = FilterSpec::from_inputs(&self.inputs);
        let filtered = apply_filters(&self.dataset, &spec);
        log::debug!(
            "{} of {} claims pass the current filter",
            filtered.len(),
            self.dataset.len()
        );
        render(filtered, &mut self.layer)
    }

    /// Fetches, parses, and renders `year`. Returns the displayed count, or
    /// `None` if the load failed or was superseded.
    pub async fn load_year(&mut self, year: &str) -> Option<usize> {
        let ticket = self.begin_load(year);
        let result = load_claims(&self.source, ticket.locator()).await;
        self.complete_load(ticket, result)
    }

    /// Starts loading `year`: empties the dataset, clears the markers, and
    /// zeroes the count before any data arrives.
    pub fn begin_load(&mut self, year: &str) -> LoadTicket {
        self.generation += 1;
        let year = year.trim().to_owned();
        let locator = self.template.locator_for(&year);

        self.current_year = Some(year.clone());
        self.dataset.clear();
        self.layer.clear_markers();
        self.layer.set_count(0);

        LoadTicket {
            generation: self.generation,
            year,
            locator,
        }
    }

    /// Finishes a load started by [`Self::begin_load`].
    ///
    /// Superseded tickets are ignored. On failure the user is notified and
    /// the dataset stays empty. Returns the displayed count on success.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<ClaimRecord>, LoadError>,
    ) -> Option<usize> {
        if ticket.generation != self.generation {
            log::debug!(
                "Discarding stale load of {} (generation {} < {})",
                ticket.locator,
                ticket.generation,
                self.generation
            );
            return None;
        }

        match result {
            Ok(records) => {
                self.dataset = records;
                Some(self.on_filter_click())
            }
            Err(e) => {
                log::error!("Failed to load claims from {}: {e}", ticket.locator);
                self.layer
                    .notify_error(&format!("Could not load claim data from {}", ticket.locator));
                None
            }
        }
    }
}
