use crate::assessment::catalog::CatalogError;
use crate::assessment::scoring::ScoringError;
use crate::assessment::weights::WeightTableError;
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use std::fmt;

/// Failure of a batch run, from configuration through to scoring.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Json(serde_json::Error),
    Catalog(CatalogError),
    Weights(WeightTableError),
    Scoring(ScoringError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Json(err) => write!(f, "invalid JSON input: {}", err),
            AppError::Catalog(err) => write!(f, "catalog error: {}", err),
            AppError::Weights(err) => write!(f, "weight table error: {}", err),
            AppError::Scoring(err) => write!(f, "scoring error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Catalog(err) => Some(err),
            AppError::Weights(err) => Some(err),
            AppError::Scoring(err) => Some(err),
        }
    }
}

impl AppError {
    /// Whether the failure came from the input data rather than the environment.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            AppError::Json(_)
                | AppError::Catalog(CatalogError::InvalidRow { .. })
                | AppError::Scoring(_)
        )
    }

    /// Process exit status: 2 for rejected input, 1 for environment failures.
    pub fn exit_code(&self) -> i32 {
        if self.is_data_error() {
            2
        } else {
            1
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<CatalogError> for AppError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<WeightTableError> for AppError {
    fn from(value: WeightTableError) -> Self {
        Self::Weights(value)
    }
}

impl From<ScoringError> for AppError {
    fn from(value: ScoringError) -> Self {
        Self::Scoring(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoring_failures_are_data_errors() {
        let err = AppError::from(ScoringError::EmptyAggregation);
        assert!(err.is_data_error());
        assert_eq!(
            err.to_string(),
            "scoring error: cannot aggregate an empty set of evaluation results"
        );

        let io = AppError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(!io.is_data_error());
    }

    #[test]
    fn exit_code_separates_bad_input_from_environment() {
        assert_eq!(AppError::from(ScoringError::EmptyAggregation).exit_code(), 2);
        let io = AppError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.exit_code(), 1);
    }
}
