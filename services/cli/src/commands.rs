use crate::inputs::{load_catalog, print_json, read_records, read_responses};
use clap::Args;
use leadership_360::assessment::{
    InMemoryQuestionCatalog, LeadershipScoringService, RoleWeightTable, UserId,
};
use leadership_360::config::AppConfig;
use leadership_360::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Question catalog CSV (defaults to SCORING_CATALOG_PATH)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Role title of the assessed person, e.g. 中层管理者
    #[arg(long)]
    pub(crate) role: String,
    /// Identifier of the respondent whose answers are scored
    #[arg(long)]
    pub(crate) user_id: u64,
    /// JSON array of {question_code, score, open_text} answers
    #[arg(long)]
    pub(crate) responses: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Question catalog CSV (defaults to SCORING_CATALOG_PATH)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Role title of the assessed person
    #[arg(long)]
    pub(crate) role: String,
    /// Identifier of the assessed person
    #[arg(long)]
    pub(crate) target_id: u64,
    /// JSON array of answer rows from every respondent
    #[arg(long)]
    pub(crate) records: PathBuf,
}

#[derive(Args, Debug, Default)]
pub(crate) struct WeightsArgs {
    /// JSON weight table to validate instead of SCORING_WEIGHTS_PATH
    #[arg(long)]
    pub(crate) weights: Option<PathBuf>,
}

fn build_service(
    config: &AppConfig,
    catalog: Option<PathBuf>,
) -> Result<LeadershipScoringService<InMemoryQuestionCatalog>, AppError> {
    let catalog = load_catalog(&config.scoring, catalog)?;
    let weights = config.scoring.weight_table()?;
    Ok(LeadershipScoringService::new(
        Arc::new(catalog),
        weights,
        config.scoring.policy(),
    ))
}

pub(crate) fn run_score(config: &AppConfig, args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        catalog,
        role,
        user_id,
        responses,
    } = args;

    let service = build_service(config, catalog)?;
    let responses = read_responses(&responses)?;
    let result = service.evaluate(UserId(user_id), &role, &responses)?;
    print_json(&result)
}

pub(crate) fn run_report(config: &AppConfig, args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        catalog,
        role,
        target_id,
        records,
    } = args;

    let service = build_service(config, catalog)?;
    let records = read_records(&records)?;
    info!(rows = records.len(), "answer rows loaded");
    let report = service.evaluate_360(UserId(target_id), &role, records)?;
    print_json(&report)
}

pub(crate) fn run_weights(config: &AppConfig, args: WeightsArgs) -> Result<(), AppError> {
    let table = match args.weights {
        Some(path) => RoleWeightTable::from_path(path)?,
        None => config.scoring.weight_table()?,
    };
    print_json(&table.rows())
}
