use crate::commands::{run_report, run_score, run_weights, ReportArgs, ScoreArgs, WeightsArgs};
use clap::{Parser, Subcommand};
use leadership_360::config::AppConfig;
use leadership_360::error::AppError;
use leadership_360::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "leadership-360",
    about = "Score 360-degree leadership assessments from questionnaire exports",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score one respondent's answers and print the evaluation result
    Score(ScoreArgs),
    /// Build the weighted 360 report for an assessed person
    Report(ReportArgs),
    /// Print the validated relationship weight table
    Weights(WeightsArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, "configuration loaded");

    match cli.command {
        Command::Score(args) => run_score(&config, args),
        Command::Report(args) => run_report(&config, args),
        Command::Weights(args) => run_weights(&config, args),
    }
}
