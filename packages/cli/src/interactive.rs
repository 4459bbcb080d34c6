//! Interactive session for exploring the claims map from a terminal.
//!
//! Provides a menu-driven interface using `dialoguer` that mirrors the
//! map's controls: a year selector, three filter inputs, and a filter
//! button.

use claims_map_cli_utils::MultiProgress;
use claims_map_controller::{AppConfig, ViewController};
use claims_map_filter::FilterInputs;
use claims_map_loader::DefaultSource;
use claims_map_map::terminal::TerminalLayer;
use dialoguer::{Input, Select};

type View = ViewController<DefaultSource, TerminalLayer>;

/// Actions available in the interactive menu.
enum Action {
    ChangeYear,
    EditFilters,
    ApplyFilters,
    ClearFilters,
    ShowMarkers,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::ChangeYear,
        Self::EditFilters,
        Self::ApplyFilters,
        Self::ClearFilters,
        Self::ShowMarkers,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::ChangeYear => "Change year",
            Self::EditFilters => "Edit filters",
            Self::ApplyFilters => "Apply filters",
            Self::ClearFilters => "Clear filters",
            Self::ShowMarkers => "Show markers",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive menu loop until the user quits.
///
/// # Errors
///
/// Returns an error if a prompt fails (e.g. the terminal is not
/// interactive).
pub async fn run(
    multi: &MultiProgress,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Municipal Claims Map");
    println!();

    let mut view = ViewController::from_config(DefaultSource::new(), TerminalLayer::stdout(), config);

    let year = select_year(config, None)?;
    let spinner = claims_map_cli_utils::spinner(multi, &format!("Loading {year} claims..."));
    view.initialize(Some(year.as_str())).await;
    spinner.finish_and_clear();
    view.layer_mut().print_markers();

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        println!();
        print_status(&view);

        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(2)
            .interact()?;

        match Action::ALL[idx] {
            Action::ChangeYear => {
                let year = select_year(config, view.current_year())?;
                log::info!("Switching to {year}");
                let spinner =
                    claims_map_cli_utils::spinner(multi, &format!("Loading {year} claims..."));
                view.on_year_change(&year).await;
                spinner.finish_and_clear();
                view.layer_mut().print_markers();
            }
            Action::EditFilters => {
                let inputs = prompt_filters(view.filter_inputs())?;
                log::debug!("Filter inputs set to {inputs:?}");
                view.set_filter_inputs(inputs);
            }
            Action::ApplyFilters => {
                view.on_filter_click();
                view.layer_mut().print_markers();
            }
            Action::ClearFilters => {
                view.set_filter_inputs(FilterInputs::default());
                view.on_filter_click();
                view.layer_mut().print_markers();
            }
            Action::ShowMarkers => view.layer_mut().print_markers(),
            Action::Quit => break,
        }
    }

    Ok(())
}

fn print_status(view: &View) {
    let inputs = view.filter_inputs();
    let show = |s: &str| if s.trim().is_empty() { "any".to_owned() } else { s.trim().to_owned() };
    println!(
        "Year: {} | From: {} | To: {} | Type: {} | Shown: {}",
        view.current_year().unwrap_or("-"),
        show(&inputs.start_date),
        show(&inputs.end_date),
        show(&inputs.claim_type),
        view.layer().count(),
    );
}

fn select_year(
    config: &AppConfig,
    current: Option<&str>,
) -> Result<String, Box<dyn std::error::Error>> {
    if config.years.is_empty() {
        let year: String = Input::new()
            .with_prompt("Year")
            .default(config.default_year.clone())
            .interact_text()?;
        return Ok(year);
    }

    let preferred = current.unwrap_or(&config.default_year);
    let default = config
        .years
        .iter()
        .position(|y| y == preferred)
        .unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Year")
        .items(&config.years)
        .default(default)
        .interact()?;

    Ok(config.years[idx].clone())
}

fn prompt_filters(current: &FilterInputs) -> Result<FilterInputs, Box<dyn std::error::Error>> {
    let start_date: String = Input::new()
        .with_prompt("Start date (YYYY-MM-DD, blank for none)")
        .with_initial_text(current.start_date.clone())
        .allow_empty(true)
        .interact_text()?;

    let end_date: String = Input::new()
        .with_prompt("End date (YYYY-MM-DD, blank for none)")
        .with_initial_text(current.end_date.clone())
        .allow_empty(true)
        .interact_text()?;

    let claim_type: String = Input::new()
        .with_prompt("Type (pothole, property damage, slip and fall, trip and fall, other; blank for all)")
        .with_initial_text(current.claim_type.clone())
        .allow_empty(true)
        .interact_text()?;

    Ok(FilterInputs {
        start_date,
        end_date,
        claim_type,
    })
}
