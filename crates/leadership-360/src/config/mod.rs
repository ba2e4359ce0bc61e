use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::assessment::scoring::{
    ScoringPolicy, DEFAULT_RELEVANCE_WEIGHT, DEFAULT_RENORMALIZATION_THRESHOLD,
};
use crate::assessment::weights::{RoleWeightTable, WeightTableError};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub scoring: ScoringConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let relevance_weight =
            parse_f64("SCORING_RELEVANCE_WEIGHT", DEFAULT_RELEVANCE_WEIGHT)?;
        if !(0.0..=1.0).contains(&relevance_weight) {
            return Err(ConfigError::RelevanceWeightOutOfRange(relevance_weight));
        }

        let renormalization_threshold = parse_f64(
            "SCORING_RENORMALIZATION_THRESHOLD",
            DEFAULT_RENORMALIZATION_THRESHOLD,
        )?;
        if !(renormalization_threshold > 0.0 && renormalization_threshold <= 1.0) {
            return Err(ConfigError::ThresholdOutOfRange(renormalization_threshold));
        }

        let weights_path = optional_path("SCORING_WEIGHTS_PATH");
        let catalog_path = optional_path("SCORING_CATALOG_PATH");
        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            scoring: ScoringConfig {
                relevance_weight,
                renormalization_threshold,
                weights_path,
                catalog_path,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Scoring constants and the optional data files that override built-in tables.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub relevance_weight: f64,
    pub renormalization_threshold: f64,
    pub weights_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
}

impl ScoringConfig {
    pub fn policy(&self) -> ScoringPolicy {
        ScoringPolicy {
            relevance_weight: self.relevance_weight,
            renormalization_threshold: self.renormalization_threshold,
        }
    }

    /// Validated weight table from `SCORING_WEIGHTS_PATH`, or the standard table.
    pub fn weight_table(&self) -> Result<RoleWeightTable, WeightTableError> {
        match &self.weights_path {
            Some(path) => RoleWeightTable::from_path(path),
            None => Ok(RoleWeightTable::standard()),
        }
    }

    /// An explicit catalog path wins over `SCORING_CATALOG_PATH`.
    pub fn catalog_path(&self, explicit: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
        explicit
            .or_else(|| self.catalog_path.clone())
            .ok_or(ConfigError::MissingCatalog)
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn parse_f64(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
        Err(_) => Ok(default),
    }
}

fn optional_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber { key: &'static str, value: String },
    RelevanceWeightOutOfRange(f64),
    ThresholdOutOfRange(f64),
    MissingCatalog,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a number, got '{value}'")
            }
            ConfigError::RelevanceWeightOutOfRange(value) => write!(
                f,
                "SCORING_RELEVANCE_WEIGHT must lie in [0, 1], got {value}"
            ),
            ConfigError::ThresholdOutOfRange(value) => write!(
                f,
                "SCORING_RENORMALIZATION_THRESHOLD must lie in (0, 1], got {value}"
            ),
            ConfigError::MissingCatalog => write!(
                f,
                "no question catalog given; pass --catalog or set SCORING_CATALOG_PATH"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("SCORING_RELEVANCE_WEIGHT");
        env::remove_var("SCORING_RENORMALIZATION_THRESHOLD");
        env::remove_var("SCORING_WEIGHTS_PATH");
        env::remove_var("SCORING_CATALOG_PATH");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.scoring.policy(), ScoringPolicy::default());
        assert!(config.scoring.weights_path.is_none());
        assert_eq!(
            config.scoring.weight_table().expect("standard table"),
            RoleWeightTable::standard()
        );
    }

    #[test]
    fn reads_scoring_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        env::set_var("SCORING_RENORMALIZATION_THRESHOLD", "1.0");
        env::set_var("SCORING_RELEVANCE_WEIGHT", " 0.5 ");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.scoring.renormalization_threshold, 1.0);
        assert_eq!(config.scoring.relevance_weight, 0.5);
    }

    #[test]
    fn rejects_out_of_range_scoring_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCORING_RELEVANCE_WEIGHT", "1.5");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::RelevanceWeightOutOfRange(_))
        ));

        reset_env();
        env::set_var("SCORING_RENORMALIZATION_THRESHOLD", "abc");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidNumber {
                key: "SCORING_RENORMALIZATION_THRESHOLD",
                ..
            })
        ));
        reset_env();
    }

    #[test]
    fn explicit_catalog_path_overrides_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SCORING_CATALOG_PATH", "questions.csv");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(
            config.scoring.catalog_path(None).expect("env path"),
            PathBuf::from("questions.csv")
        );
        assert_eq!(
            config
                .scoring
                .catalog_path(Some(PathBuf::from("override.csv")))
                .expect("explicit path"),
            PathBuf::from("override.csv")
        );

        let bare = ScoringConfig {
            catalog_path: None,
            ..config.scoring
        };
        assert!(matches!(
            bare.catalog_path(None),
            Err(ConfigError::MissingCatalog)
        ));
    }
}
