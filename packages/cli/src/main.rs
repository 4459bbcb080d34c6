#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the municipal claims map.
//!
//! `claims_map show` loads one year, applies the given filters, and either
//! prints the markers or exports them as `GeoJSON` for a web map. Without a
//! subcommand an interactive session lets the user switch years and
//! adjust filters the way the map's controls would.

mod interactive;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use claims_map_cli_utils::MultiProgress;
use claims_map_controller::{AppConfig, ViewController};
use claims_map_filter::FilterInputs;
use claims_map_loader::DefaultSource;
use claims_map_map::MapLayer;
use claims_map_map::export::GeoJsonLayer;
use claims_map_map::terminal::TerminalLayer;

#[derive(Parser)]
#[command(name = "claims_map", about = "Municipal claims map")]
struct Cli {
    /// Path to a TOML config file (overrides `CLAIMS_MAP_CONFIG`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a year's claims, filter them, and show the resulting markers
    Show {
        /// Year to load (defaults to the configured default year)
        #[arg(long)]
        year: Option<String>,
        /// Earliest claim date to include (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Latest claim date to include (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        /// Claim type to show (e.g. "pothole", "other")
        #[arg(long = "type")]
        claim_type: Option<String>,
        /// Write markers to this `GeoJSON` file instead of printing them
        #[arg(long)]
        geojson: Option<PathBuf>,
    },
    /// List the configured years
    Years,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = claims_map_cli_utils::init_logger();
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Show {
            year,
            start,
            end,
            claim_type,
            geojson,
        }) => {
            let inputs = FilterInputs {
                start_date: start.unwrap_or_default(),
                end_date: end.unwrap_or_default(),
                claim_type: claim_type.unwrap_or_default(),
            };

            if let Some(path) = geojson {
                let mut view =
                    ViewController::from_config(DefaultSource::new(), GeoJsonLayer::new(), &config);
                show(&multi, &mut view, year.as_deref(), inputs).await;
                view.layer().write_to(&path)?;
            } else {
                let mut view = ViewController::from_config(
                    DefaultSource::new(),
                    TerminalLayer::stdout(),
                    &config,
                );
                show(&multi, &mut view, year.as_deref(), inputs).await;
                view.layer_mut().print_markers();
            }
        }
        Some(Commands::Years) => {
            for year in &config.years {
                if *year == config.default_year {
                    println!("{year} (default)");
                } else {
                    println!("{year}");
                }
            }
        }
        None => interactive::run(&multi, &config).await?,
    }

    Ok(())
}

/// Initializes the view for `year` and applies `inputs` on top of it.
async fn show<L: MapLayer>(
    multi: &MultiProgress,
    view: &mut ViewController<DefaultSource, L>,
    year: Option<&str>,
    inputs: FilterInputs,
) {
    let spinner = claims_map_cli_utils::spinner(multi, "Loading claims...");
    let loaded = view.initialize(year).await;
    spinner.finish_and_clear();

    let Some(shown) = loaded else {
        return;
    };
    let total = view.dataset().len();
    log::info!(
        "Loaded {total} claims for {} ({shown} on the map)",
        view.current_year().unwrap_or_default()
    );

    if !inputs.is_unconstrained() {
        log::debug!("Applying filters {inputs:?}");
        view.set_filter_inputs(inputs);
        let shown = view.on_filter_click();
        log::info!("{shown} of {total} claims match the filters");
    }
}
