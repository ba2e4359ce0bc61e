mod calculator;
mod composer;
mod dimensions;
mod groups;
mod weighted;

pub use calculator::{RelevanceLookup, ScoreCalculator};
pub use composer::UserEvaluationComposer;
pub use dimensions::DimensionAggregator;
pub use groups::GroupAggregator;
pub use weighted::{RespondentEvaluation, WeightedComposition, WeightedCompositor};

use serde::{Deserialize, Serialize};

use super::catalog::CatalogError;
use super::domain::{QuestionCode, UserId};
use super::weights::RoleWeightTable;

/// Share of a linked self-directed score blended into a role-specific score.
pub const DEFAULT_RELEVANCE_WEIGHT: f64 = 0.4;
/// Below this much applied weight the 360 composite is rescaled to a full-weight scale.
pub const DEFAULT_RENORMALIZATION_THRESHOLD: f64 = 0.99;

/// Tunable constants of the scoring pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub relevance_weight: f64,
    pub renormalization_threshold: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            relevance_weight: DEFAULT_RELEVANCE_WEIGHT,
            renormalization_threshold: DEFAULT_RENORMALIZATION_THRESHOLD,
        }
    }
}

/// Stateless engine handing out the pipeline stages configured from one policy.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    policy: ScoringPolicy,
    weights: RoleWeightTable,
}

impl ScoringEngine {
    pub fn new(policy: ScoringPolicy, weights: RoleWeightTable) -> Self {
        Self { policy, weights }
    }

    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    pub fn weights(&self) -> &RoleWeightTable {
        &self.weights
    }

    pub fn calculator(&self) -> ScoreCalculator {
        ScoreCalculator::new(self.policy.relevance_weight)
    }

    pub fn aggregator(&self) -> DimensionAggregator {
        DimensionAggregator::new(self.calculator())
    }

    pub fn composer(&self) -> UserEvaluationComposer {
        UserEvaluationComposer::new(self.aggregator())
    }

    pub fn compositor(&self) -> WeightedCompositor<'_> {
        WeightedCompositor::new(&self.weights, self.policy.renormalization_threshold)
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringPolicy::default(), RoleWeightTable::standard())
    }
}

/// Data-integrity failures; all are deterministic, none are retried.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("question {code} not found in catalog")]
    QuestionNotFound { code: QuestionCode },
    #[error("unsupported user role: {role}")]
    UnsupportedRole { role: String },
    #[error("cannot aggregate an empty set of evaluation results")]
    EmptyAggregation,
    #[error("user {user_id} has no answered questions to score")]
    NoAnsweredQuestions { user_id: UserId },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
