use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use f1_whatif::config::{load_config, validate_config, write_default_config, Config};
use f1_whatif::ergast::{create_client, ErgastClient, ResultsSource, SourceError};
use f1_whatif::output;
use f1_whatif::scoring::{race_results, sprint_results, Exclusions, SessionOutcome};
use f1_whatif::standings::{
    circuit_location_code, constructors_standings, drivers_standings, EntityKind, StandingsTable,
};
use f1_whatif::tui::{run_chart, App, TeamPalette};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// Aligned table (coloured on a terminal)
    Table,
    /// Tab-separated values for scripting
    Tsv,
}

#[derive(Args, Debug)]
struct ScenarioArgs {
    /// Driver codes or ids to take out of the season (e.g. VER,HAM)
    #[arg(short = 'x', long = "exclude", value_delimiter = ',')]
    exclude: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Re-score one race
    Race {
        /// Round number within the season
        #[arg(short, long)]
        round: u32,
        #[command(flatten)]
        scenario: ScenarioArgs,
    },
    /// Re-score one sprint (empty if the round had none)
    Sprint {
        /// Round number within the season
        #[arg(short, long)]
        round: u32,
        #[command(flatten)]
        scenario: ScenarioArgs,
    },
    /// Drivers' championship up to a round
    Drivers {
        /// Last round to include (defaults to the latest completed round)
        #[arg(short, long)]
        round: Option<u32>,
        #[command(flatten)]
        scenario: ScenarioArgs,
        /// Plot cumulative points in the terminal
        #[arg(long)]
        chart: bool,
    },
    /// Constructors' championship up to a round
    Constructors {
        /// Last round to include (defaults to the latest completed round)
        #[arg(short, long)]
        round: Option<u32>,
        #[command(flatten)]
        scenario: ScenarioArgs,
        /// Constructor ids to drop from the table (e.g. red_bull)
        #[arg(long = "exclude-constructor", value_delimiter = ',')]
        exclude_constructor: Vec<String>,
        /// Plot cumulative points in the terminal
        #[arg(long)]
        chart: bool,
    },
    /// Print the column label used for a round's circuit
    Location {
        /// Round number within the season
        #[arg(short, long)]
        round: u32,
    },
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "f1-whatif")]
#[command(about = "Recompute F1 standings with drivers or teams taken out of the season", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/f1-whatif/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Championship season (defaults to config, then the current year)
    #[arg(short, long, global = true)]
    season: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    f1_whatif::logging::init_logging(cli.verbose);

    // Install rustls crypto provider (required for rustls 0.23+)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }

    let config_path = cli.config.map(PathBuf::from);

    // Init runs before loading, so a broken config can be replaced
    if let Commands::Init { force } = cli.command {
        match write_default_config(config_path, force) {
            Ok(path) => {
                println!("Config written to {}", path.display());
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
    }

    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let season = cli
        .season
        .or(config.season)
        .unwrap_or_else(|| chrono::Local::now().year() as u32);

    let client = match create_client(&config.api_base_url) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create HTTP client: {:#}", e);
            std::process::exit(EXIT_NETWORK);
        }
    };

    tracing::debug!(base_url = client.base_url(), season, "client ready");

    let start_time = Instant::now();
    let use_colors = output::should_use_colors();

    match run(cli.command, &client, &config, season, use_colors).await {
        Ok(()) => {
            tracing::debug!(season, elapsed = ?start_time.elapsed(), "done");
            std::process::exit(EXIT_SUCCESS);
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(exit_code_for(&e));
        }
    }
}

/// Upstream failures anywhere in the chain map to the network exit code
fn exit_code_for(err: &anyhow::Error) -> i32 {
    if err.chain().any(|cause| cause.downcast_ref::<SourceError>().is_some()) {
        EXIT_NETWORK
    } else {
        EXIT_FAILURE
    }
}

async fn run(
    command: Commands,
    client: &ErgastClient,
    config: &Config,
    season: u32,
    use_colors: bool,
) -> Result<()> {
    match command {
        Commands::Race { round, scenario } => {
            let exclusions = Exclusions::drivers(&scenario.exclude);
            let outcome = race_results(client, &config.scoring, &exclusions, season, round).await?;
            print_session(&outcome, scenario.format, use_colors);
        }
        Commands::Sprint { round, scenario } => {
            let exclusions = Exclusions::drivers(&scenario.exclude);
            let outcome = sprint_results(client, &config.scoring, &exclusions, season, round).await?;
            print_session(&outcome, scenario.format, use_colors);
        }
        Commands::Drivers { round, scenario, chart } => {
            let exclusions = Exclusions::drivers(&scenario.exclude);
            let round = resolve_round(client, season, round).await?;
            let table = drivers_standings(client, &config.scoring, &exclusions, season, round).await?;
            print_standings(&table, scenario.format, use_colors);
            if chart {
                show_chart(&table, &exclusions, round, config).await?;
            }
        }
        Commands::Constructors {
            round,
            scenario,
            exclude_constructor,
            chart,
        } => {
            let exclusions = Exclusions::new(&scenario.exclude, &exclude_constructor);
            let round = resolve_round(client, season, round).await?;
            let table =
                constructors_standings(client, &config.scoring, &exclusions, season, round).await?;
            print_standings(&table, scenario.format, use_colors);
            if chart {
                show_chart(&table, &exclusions, round, config).await?;
            }
        }
        Commands::Location { round } => {
            println!("{}", circuit_location_code(client, season, round).await?);
        }
        // Handled before the config is loaded
        Commands::Init { .. } => {}
    }
    Ok(())
}

async fn resolve_round(client: &ErgastClient, season: u32, round: Option<u32>) -> Result<u32> {
    match round {
        Some(round) => Ok(round),
        None => {
            let round = client
                .last_completed_round(season)
                .await
                .with_context(|| format!("Failed to find the latest round of {}", season))?;
            tracing::info!(season, round, "using latest completed round");
            Ok(round)
        }
    }
}

fn print_session(outcome: &SessionOutcome, format: Format, use_colors: bool) {
    match format {
        Format::Table => println!("{}", output::format_session_table(outcome, use_colors)),
        Format::Tsv => {
            if !outcome.is_empty() {
                println!("{}", output::format_session_tsv(outcome));
            }
        }
    }
}

fn print_standings(table: &StandingsTable, format: Format, use_colors: bool) {
    match format {
        Format::Table => println!("{}", output::format_standings_table(table, use_colors)),
        Format::Tsv => println!("{}", output::format_standings_tsv(table)),
    }
}

fn chart_title(table: &StandingsTable, exclusions: &Exclusions, round: u32) -> String {
    let kind = match table.kind {
        EntityKind::Driver => "Drivers'",
        EntityKind::Constructor => "Constructors'",
    };
    let mut title = format!("{} standings {} after round {}", kind, table.season, round);

    if !exclusions.is_empty() {
        let excluded: Vec<String> = exclusions
            .driver_keys()
            .into_iter()
            .chain(exclusions.constructor_keys())
            .map(str::to_uppercase)
            .collect();
        title.push_str(&format!(" without {}", excluded.join(", ")));
    }
    title
}

async fn show_chart(
    table: &StandingsTable,
    exclusions: &Exclusions,
    round: u32,
    config: &Config,
) -> Result<()> {
    let palette = TeamPalette::with_overrides(&config.palette);
    let app = App::new(chart_title(table, exclusions, round), table, &palette);
    run_chart(app).await
}
