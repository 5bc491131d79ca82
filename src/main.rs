use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

use race_results::race::{load_snapshot, save_report, RaceType};
use race_results::scoring::{score_race, AwardDepth, EngineConfig, RaceReport};
use race_results::{output, timing};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum TimeCommand {
    /// Show elapsed seconds as MM:SS.mmm or HH:MM:SS.mmm
    #[command(allow_negative_numbers = true)]
    Format { seconds: f64 },
    /// Convert MM:SS.mmm or HH:MM:SS.mmm to elapsed seconds
    Parse { text: String },
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Overall finish order
    Individual { snapshot: PathBuf },
    /// Cross-country team standings
    Teams { snapshot: PathBuf },
    /// Road-race age group standings
    AgeGroups { snapshot: PathBuf },
    /// Top finishers
    Awards {
        snapshot: PathBuf,
        /// Number of award places (overrides config)
        #[arg(short, long, allow_negative_numbers = true)]
        depth: Option<i64>,
    },
    /// Every result section for the race
    Report {
        snapshot: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Also write the JSON report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Convert between seconds and clock text
    Time {
        #[command(subcommand)]
        command: TimeCommand,
    },
}

#[derive(Parser, Debug)]
#[command(name = "race-results")]
#[command(about = "Footrace results: individual places, team scores and age groups", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/race-results/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    let filter = if verbose {
        EnvFilter::new("race_results=debug")
    } else {
        EnvFilter::new("race_results=warn")
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let start_time = Instant::now();

    // Time conversions need neither config nor snapshot
    if let Commands::Time { command } = &cli.command {
        run_time_command(command);
    }

    let config_path = cli.config.map(PathBuf::from);
    let config = match race_results::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    let scoring = config.scoring.unwrap_or_default();
    if let Err(errors) = race_results::scoring::validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    let mut engine_config = match scoring.engine_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let use_colors = output::should_use_colors();

    match cli.command {
        Commands::Individual { snapshot } => {
            let report = load_and_score(&snapshot, &engine_config);
            println!("{}", output::format_individual(&report.individual, use_colors));
            print_diagnostics(&report, use_colors);
        }
        Commands::Teams { snapshot } => {
            let report = load_and_score(&snapshot, &engine_config);
            if report.race_type != RaceType::CrossCountry {
                eprintln!("Team results are only available for cross country races.");
                std::process::exit(EXIT_INPUT);
            }
            println!(
                "{}",
                output::format_team_standings(&report.teams, &report.unscored_teams, use_colors)
            );
            print_diagnostics(&report, use_colors);
        }
        Commands::AgeGroups { snapshot } => {
            let report = load_and_score(&snapshot, &engine_config);
            if report.race_type != RaceType::RoadRace {
                eprintln!("Age group results are only available for road races.");
                std::process::exit(EXIT_INPUT);
            }
            println!("{}", output::format_age_groups(&report.age_groups, use_colors));
            print_diagnostics(&report, use_colors);
        }
        Commands::Awards { snapshot, depth } => {
            if let Some(depth) = depth {
                engine_config.award_depth = match AwardDepth::new(depth) {
                    Ok(d) => d,
                    Err(e) => {
                        eprintln!("{}", e);
                        std::process::exit(EXIT_CONFIG);
                    }
                };
            }
            let report = load_and_score(&snapshot, &engine_config);
            println!("{}", output::format_awards(&report.awards, use_colors));
            if !report.age_group_awards.is_empty() {
                println!();
                println!(
                    "{}",
                    output::format_age_group_awards(&report.age_group_awards, use_colors)
                );
            }
        }
        Commands::Report {
            snapshot,
            json,
            output: output_path,
        } => {
            let report = load_and_score(&snapshot, &engine_config);
            if json {
                match serde_json::to_string_pretty(&report) {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        eprintln!("Failed to serialize report: {}", e);
                        std::process::exit(EXIT_INPUT);
                    }
                }
            } else {
                println!("{}", output::format_report(&report, use_colors));
            }
            if let Some(path) = output_path {
                if let Err(e) = save_report(&path, &report) {
                    eprintln!("{:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
                debug!(path = %path.display(), "wrote report");
            }
        }
        Commands::Time { .. } => unreachable!("handled before config loading"),
    }

    if cli.verbose {
        eprintln!("Done in {:?}", start_time.elapsed());
    }
    std::process::exit(EXIT_SUCCESS);
}

fn run_time_command(command: &TimeCommand) -> ! {
    match command {
        TimeCommand::Format { seconds } => {
            println!("{}", timing::format_time(Some(*seconds)));
        }
        TimeCommand::Parse { text } => match timing::parse_time(text) {
            Ok(seconds) => println!("{}", seconds),
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(EXIT_INPUT);
            }
        },
    }
    std::process::exit(EXIT_SUCCESS);
}

fn load_and_score(path: &Path, config: &EngineConfig) -> RaceReport {
    let snapshot = match load_snapshot(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    };
    let input = match snapshot.into_input() {
        Ok(i) => i,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    debug!(
        runners = input.runners.len(),
        results = input.results.len(),
        race_type = %input.race_type,
        "loaded snapshot"
    );
    score_race(&input, config)
}

fn print_diagnostics(report: &RaceReport, use_colors: bool) {
    let diagnostics = output::format_diagnostics(&report.diagnostics, use_colors);
    if !diagnostics.is_empty() {
        eprintln!();
        eprintln!("{}", diagnostics);
    }
}
