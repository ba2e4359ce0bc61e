//! Multi-rater leadership assessment scoring.
//!
//! Raw Likert answers flow upward through question scoring, dimension roll-up, one
//! result per rater, relationship-group averages, and finally the role-weighted 360
//! composite. Every stage is a pure computation over already fetched inputs.

pub mod catalog;
pub mod domain;
mod normalizer;
pub mod profile;
pub mod report;
pub mod respondents;
mod roles;
pub mod scoring;
pub mod service;
pub mod weights;

#[cfg(test)]
mod tests;

pub use catalog::{
    CatalogError, InMemoryQuestionCatalog, QuestionCatalog, QuestionCatalogImporter, QuestionSet,
};
pub use domain::{
    DimensionScore, LikertScore, Question, QuestionCode, QuestionScoreResult, Questionnaire,
    RawResponse, RelationshipGroup, ResponseRecord, ResponseSet, RoleCategory, ScoringRule,
    UserEvaluationResult, UserId, WeightedResult,
};
pub use profile::{LeadershipProfile, ProfileAnalyzer, ProfileThresholds, SubDimensionFallbacks};
pub use report::{Evaluation360, ParticipantSummary};
pub use respondents::{assemble, RespondentResponses};
pub use scoring::{
    RespondentEvaluation, ScoringEngine, ScoringError, ScoringPolicy, WeightedComposition,
};
pub use service::LeadershipScoringService;
pub use weights::{RelationshipWeights, RoleWeightTable, WeightRow, WeightTableError};
