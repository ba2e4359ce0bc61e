use std::sync::Arc;

use tracing::{debug, info};

use super::catalog::{QuestionCatalog, QuestionSet};
use super::domain::{
    RelationshipGroup, ResponseRecord, ResponseSet, RoleCategory, UserEvaluationResult, UserId,
};
use super::profile::{LeadershipProfile, ProfileAnalyzer};
use super::report::{Evaluation360, ParticipantSummary};
use super::respondents::assemble;
use super::scoring::{
    GroupAggregator, RespondentEvaluation, ScoringEngine, ScoringError, ScoringPolicy,
};
use super::weights::RoleWeightTable;

/// Service composing the question catalog, weight table, and scoring pipeline.
pub struct LeadershipScoringService<C: ?Sized> {
    catalog: Arc<C>,
    engine: Arc<ScoringEngine>,
    analyzer: Arc<ProfileAnalyzer>,
}

impl<C> LeadershipScoringService<C>
where
    C: QuestionCatalog + ?Sized + 'static,
{
    pub fn new(catalog: Arc<C>, weights: RoleWeightTable, policy: ScoringPolicy) -> Self {
        Self::with_analyzer(catalog, weights, policy, ProfileAnalyzer::default())
    }

    pub fn with_analyzer(
        catalog: Arc<C>,
        weights: RoleWeightTable,
        policy: ScoringPolicy,
        analyzer: ProfileAnalyzer,
    ) -> Self {
        Self {
            catalog,
            engine: Arc::new(ScoringEngine::new(policy, weights)),
            analyzer: Arc::new(analyzer),
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Score one respondent's answers against the questionnaires for `user_role`.
    pub fn evaluate(
        &self,
        user_id: UserId,
        user_role: &str,
        responses: &ResponseSet,
    ) -> Result<UserEvaluationResult, ScoringError> {
        let result = self
            .engine
            .composer()
            .compose(self.catalog.as_ref(), user_id, user_role, responses)?;

        info!(
            user = %user_id,
            role = user_role,
            answered = responses.len(),
            overall_percentage = result.overall_percentage,
            "respondent evaluation scored"
        );
        Ok(result)
    }

    /// Build the full 360 report for `target_user_id` from raw answer rows.
    pub fn evaluate_360<I>(
        &self,
        target_user_id: UserId,
        target_role: &str,
        records: I,
    ) -> Result<Evaluation360, ScoringError>
    where
        I: IntoIterator<Item = ResponseRecord>,
    {
        let category = RoleCategory::resolve(target_role)?;
        let questions = QuestionSet::fetch(self.catalog.as_ref(), category)?;
        let composer = self.engine.composer();

        let mut respondents = Vec::new();
        for respondent in assemble(records) {
            // every rater answers the assessed person's questionnaire
            let result = composer.compose_with(
                &questions,
                target_user_id,
                target_role,
                &respondent.responses,
            )?;
            debug!(
                respondent = %respondent.respondent_id,
                overall_percentage = result.overall_percentage,
                "rater result composed"
            );
            respondents.push(RespondentEvaluation {
                respondent_id: respondent.respondent_id,
                relationship: respondent.relationship,
                result,
            });
        }

        let composition = self.engine.compositor().compose_360_detailed(
            target_user_id,
            &respondents,
            target_role,
        )?;

        let self_results: Vec<&UserEvaluationResult> = respondents
            .iter()
            .filter(|respondent| {
                respondent.resolved_relationship(target_user_id)
                    == Some(RelationshipGroup::SelfAssessment)
            })
            .map(|respondent| &respondent.result)
            .collect();
        let other_results: Vec<&UserEvaluationResult> = respondents
            .iter()
            .filter(|respondent| {
                respondent.respondent_id != target_user_id
                    && matches!(
                        respondent.resolved_relationship(target_user_id),
                        Some(relationship) if relationship != RelationshipGroup::SelfAssessment
                    )
            })
            .map(|respondent| &respondent.result)
            .collect();

        let self_result = optional_average(&self_results)?;
        let others_result = optional_average(&other_results)?;

        let participants = respondents
            .iter()
            .map(|respondent| ParticipantSummary {
                respondent_id: respondent.respondent_id,
                relationship: respondent.resolved_relationship(target_user_id),
                overall_percentage: respondent.result.overall_percentage,
            })
            .collect();

        let profile = self.analyzer.analyze(&composition.result);

        info!(
            target_user = %target_user_id,
            role = target_role,
            raters = respondents.len(),
            excluded = composition.excluded_respondents.len(),
            total_weight_applied = composition.total_weight_applied,
            renormalized = composition.renormalized,
            overall_percentage = composition.result.overall_percentage,
            "360 evaluation composed"
        );

        Ok(Evaluation360 {
            target_user_id,
            target_role: target_role.to_string(),
            category: composition.category,
            weighted: composition.result,
            total_weight_applied: composition.total_weight_applied,
            renormalized: composition.renormalized,
            self_result,
            others_result,
            participants,
            excluded_respondents: composition.excluded_respondents,
            profile,
        })
    }

    pub fn profile(&self, result: &UserEvaluationResult) -> LeadershipProfile {
        self.analyzer.analyze(result)
    }
}

fn optional_average(
    results: &[&UserEvaluationResult],
) -> Result<Option<UserEvaluationResult>, ScoringError> {
    if results.is_empty() {
        return Ok(None);
    }
    GroupAggregator.average(results.iter().copied()).map(Some)
}
