use leadership_360::assessment::{
    InMemoryQuestionCatalog, QuestionCatalogImporter, RawResponse, ResponseRecord, ResponseSet,
};
use leadership_360::config::ScoringConfig;
use leadership_360::error::AppError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub(crate) fn load_catalog(
    config: &ScoringConfig,
    explicit: Option<PathBuf>,
) -> Result<InMemoryQuestionCatalog, AppError> {
    let path = config.catalog_path(explicit)?;
    let catalog = QuestionCatalogImporter::from_path(&path)?;
    info!(
        path = %path.display(),
        questions = catalog.questions().len(),
        "question catalog loaded"
    );
    Ok(catalog)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// A JSON array of raw answers; open-text-only answers are dropped.
pub(crate) fn read_responses(path: &Path) -> Result<ResponseSet, AppError> {
    let raw: Vec<RawResponse> = read_json(path)?;
    Ok(ResponseSet::from_raw(raw))
}

/// A JSON array of persisted answer rows across all respondents.
pub(crate) fn read_records(path: &Path) -> Result<Vec<ResponseRecord>, AppError> {
    read_json(path)
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)?;
    writeln!(handle)?;
    Ok(())
}
