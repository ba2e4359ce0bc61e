use super::calculator::RelevanceLookup;
use super::dimensions::DimensionAggregator;
use super::ScoringError;
use crate::assessment::catalog::{QuestionCatalog, QuestionSet};
use crate::assessment::domain::{
    percentage, DimensionScore, ResponseSet, RoleCategory, UserEvaluationResult, UserId,
};

/// Builds one respondent's result from both questionnaires.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserEvaluationComposer {
    aggregator: DimensionAggregator,
}

impl UserEvaluationComposer {
    pub fn new(aggregator: DimensionAggregator) -> Self {
        Self { aggregator }
    }

    pub fn compose<C>(
        &self,
        catalog: &C,
        user_id: UserId,
        user_role: &str,
        responses: &ResponseSet,
    ) -> Result<UserEvaluationResult, ScoringError>
    where
        C: QuestionCatalog + ?Sized,
    {
        let category = RoleCategory::resolve(user_role)?;
        let questions = QuestionSet::fetch(catalog, category)?;
        self.compose_with(&questions, user_id, user_role, responses)
    }

    /// Same as [`compose`](Self::compose) against a question set the caller fetched for
    /// `user_role`, so several respondents can share one catalog fetch.
    pub fn compose_with(
        &self,
        questions: &QuestionSet,
        user_id: UserId,
        user_role: &str,
        responses: &ResponseSet,
    ) -> Result<UserEvaluationResult, ScoringError> {
        if let Some(code) = responses.codes().find(|code| !questions.contains(code)) {
            return Err(ScoringError::QuestionNotFound { code: code.clone() });
        }

        let self_directed_scores =
            self.aggregator
                .aggregate(questions.self_directed(), responses, None);
        let lookup = RelevanceLookup::from_dimensions(&self_directed_scores);
        let role_specific_scores =
            self.aggregator
                .aggregate(questions.role_specific(), responses, Some(&lookup));

        let (total_score, max_total_score) = totals(&self_directed_scores, &role_specific_scores);
        if max_total_score <= 0.0 {
            return Err(ScoringError::NoAnsweredQuestions { user_id });
        }

        Ok(UserEvaluationResult {
            user_id,
            user_role: user_role.to_string(),
            self_directed_scores,
            role_specific_scores,
            total_score,
            max_total_score,
            overall_percentage: percentage(total_score, max_total_score),
        })
    }
}

fn totals(self_directed: &[DimensionScore], role_specific: &[DimensionScore]) -> (f64, f64) {
    self_directed
        .iter()
        .chain(role_specific)
        .fold((0.0, 0.0), |(total, max), dimension| {
            (total + dimension.total_score, max + dimension.max_score)
        })
}
