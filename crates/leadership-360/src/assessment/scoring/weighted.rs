use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::groups::{matching_dimension, GroupAggregator};
use super::ScoringError;
use crate::assessment::domain::{
    percentage, DimensionScore, QuestionScoreResult, RelationshipGroup, RoleCategory,
    UserEvaluationResult, UserId, WeightedResult,
};
use crate::assessment::weights::RoleWeightTable;

/// One rater's result as fed into the 360 composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespondentEvaluation {
    pub respondent_id: UserId,
    pub relationship: Option<RelationshipGroup>,
    pub result: UserEvaluationResult,
}

impl RespondentEvaluation {
    /// Unlabelled raters count as a self-assessment only when they are the target.
    pub fn resolved_relationship(&self, target_user_id: UserId) -> Option<RelationshipGroup> {
        match self.relationship {
            Some(relationship) => Some(relationship),
            None if self.respondent_id == target_user_id => Some(RelationshipGroup::SelfAssessment),
            None => None,
        }
    }
}

/// Weighted result plus the bookkeeping behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedComposition {
    pub result: WeightedResult,
    pub category: RoleCategory,
    pub groups_present: Vec<RelationshipGroup>,
    pub total_weight_applied: f64,
    pub renormalized: bool,
    pub excluded_respondents: Vec<UserId>,
}

/// Combines relationship-group averages with the target role's weights.
#[derive(Debug, Clone, Copy)]
pub struct WeightedCompositor<'a> {
    weights: &'a RoleWeightTable,
    renormalization_threshold: f64,
    groups: GroupAggregator,
}

impl<'a> WeightedCompositor<'a> {
    pub fn new(weights: &'a RoleWeightTable, renormalization_threshold: f64) -> Self {
        Self {
            weights,
            renormalization_threshold,
            groups: GroupAggregator,
        }
    }

    pub fn compose_360(
        &self,
        target_user_id: UserId,
        respondents: &[RespondentEvaluation],
        target_role: &str,
    ) -> Result<WeightedResult, ScoringError> {
        self.compose_360_detailed(target_user_id, respondents, target_role)
            .map(|composition| composition.result)
    }

    pub fn compose_360_detailed(
        &self,
        target_user_id: UserId,
        respondents: &[RespondentEvaluation],
        target_role: &str,
    ) -> Result<WeightedComposition, ScoringError> {
        let category = RoleCategory::resolve(target_role)?;
        let weights = self.weights.weights_for(category);

        let mut buckets: Vec<(RelationshipGroup, Vec<&UserEvaluationResult>)> = Vec::new();
        let mut excluded_respondents = Vec::new();
        for respondent in respondents {
            let Some(relationship) = respondent.resolved_relationship(target_user_id) else {
                warn!(
                    target_user = %target_user_id,
                    respondent = %respondent.respondent_id,
                    "respondent has no relationship label; excluded from weighting"
                );
                excluded_respondents.push(respondent.respondent_id);
                continue;
            };
            match buckets.iter_mut().find(|(group, _)| *group == relationship) {
                Some((_, results)) => results.push(&respondent.result),
                None => buckets.push((relationship, vec![&respondent.result])),
            }
        }
        buckets.sort_by_key(|(group, _)| *group);

        if buckets.is_empty() {
            return Err(ScoringError::EmptyAggregation);
        }

        let mut averages = Vec::with_capacity(buckets.len());
        for (relationship, results) in &buckets {
            averages.push((*relationship, self.groups.average(results.iter().copied())?));
        }

        // zero-weight groups (self-assessment) may cover less of the questionnaire
        let template = averages
            .iter()
            .find(|(relationship, _)| {
                weights
                    .weight_for(*relationship)
                    .is_some_and(|weight| weight > 0.0)
            })
            .or_else(|| averages.first())
            .map(|(_, average)| average)
            .ok_or(ScoringError::EmptyAggregation)?;
        let mut accumulator = WeightedAccumulator::zeroed(template);
        let mut total_weight_applied = 0.0;
        for (relationship, average) in &averages {
            let weight = weights.weight_for(*relationship).unwrap_or(0.0);
            if weight <= 0.0 {
                continue;
            }
            total_weight_applied += weight;
            accumulator.add(average, weight);
            debug!(
                %relationship,
                weight,
                group_total = average.total_score,
                "applied group weight"
            );
        }

        let renormalized =
            total_weight_applied > 0.0 && total_weight_applied < self.renormalization_threshold;
        let factor = if renormalized {
            1.0 / total_weight_applied
        } else {
            1.0
        };
        if total_weight_applied <= 0.0 {
            warn!(
                target_user = %target_user_id,
                "no weighted rater group present; composite is zero"
            );
        }

        Ok(WeightedComposition {
            result: accumulator.finish(factor, target_user_id),
            category,
            groups_present: buckets.iter().map(|(group, _)| *group).collect(),
            total_weight_applied,
            renormalized,
            excluded_respondents,
        })
    }
}

/// Zero-initialised copy of the template's shape that weighted scores are summed into.
struct WeightedAccumulator {
    user_role: String,
    self_directed: Vec<DimensionScore>,
    role_specific: Vec<DimensionScore>,
    total_score: f64,
    max_total_score: f64,
}

impl WeightedAccumulator {
    fn zeroed(template: &UserEvaluationResult) -> Self {
        Self {
            user_role: template.user_role.clone(),
            self_directed: zeroed_dimensions(&template.self_directed_scores),
            role_specific: zeroed_dimensions(&template.role_specific_scores),
            total_score: 0.0,
            max_total_score: template.max_total_score,
        }
    }

    fn add(&mut self, source: &UserEvaluationResult, weight: f64) {
        add_weighted(&mut self.self_directed, &source.self_directed_scores, weight);
        add_weighted(&mut self.role_specific, &source.role_specific_scores, weight);
        self.total_score += source.total_score * weight;
    }

    fn finish(self, factor: f64, user_id: UserId) -> WeightedResult {
        let total_score = self.total_score * factor;
        WeightedResult {
            user_id,
            user_role: self.user_role,
            self_directed_scores: scaled_dimensions(self.self_directed, factor),
            role_specific_scores: scaled_dimensions(self.role_specific, factor),
            total_score,
            max_total_score: self.max_total_score,
            overall_percentage: percentage(total_score, self.max_total_score),
        }
    }
}

fn zeroed_dimensions(template: &[DimensionScore]) -> Vec<DimensionScore> {
    template
        .iter()
        .map(|dimension| {
            let question_scores = dimension
                .question_scores
                .iter()
                .map(|question| QuestionScoreResult {
                    final_score: 0.0,
                    ..question.clone()
                })
                .collect();
            DimensionScore {
                dimension: dimension.dimension.clone(),
                total_score: 0.0,
                max_score: dimension.max_score,
                percentage: 0.0,
                question_scores,
            }
        })
        .collect()
}

fn add_weighted(target: &mut [DimensionScore], source: &[DimensionScore], weight: f64) {
    for (position, dimension) in target.iter_mut().enumerate() {
        let Some(from) = matching_dimension(source, position, dimension) else {
            continue;
        };
        dimension.total_score += from.total_score * weight;
        for question in &mut dimension.question_scores {
            if let Some(score) = from.question(&question.question_code) {
                question.final_score += score.final_score * weight;
            }
        }
    }
}

fn scaled_dimensions(dimensions: Vec<DimensionScore>, factor: f64) -> Vec<DimensionScore> {
    dimensions
        .into_iter()
        .map(|dimension| {
            let question_scores = dimension
                .question_scores
                .into_iter()
                .map(|question| QuestionScoreResult {
                    final_score: question.final_score * factor,
                    ..question
                })
                .collect();
            DimensionScore::with_totals(
                dimension.dimension,
                dimension.total_score * factor,
                dimension.max_score,
                question_scores,
            )
        })
        .collect()
}
