use tracing::debug;

use super::ScoringError;
use crate::assessment::domain::{
    percentage, DimensionScore, QuestionScoreResult, UserEvaluationResult,
};

/// Averages the results of raters sharing one relationship label.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupAggregator;

impl GroupAggregator {
    /// The first result is the structural template; all results are expected to share
    /// its dimension order and question codes.
    pub fn average<'a, I>(&self, results: I) -> Result<UserEvaluationResult, ScoringError>
    where
        I: IntoIterator<Item = &'a UserEvaluationResult>,
    {
        let results: Vec<&UserEvaluationResult> = results.into_iter().collect();
        let Some(template) = results.first().copied() else {
            return Err(ScoringError::EmptyAggregation);
        };

        let self_directed: Vec<&[DimensionScore]> = results
            .iter()
            .map(|result| result.self_directed_scores.as_slice())
            .collect();
        let role_specific: Vec<&[DimensionScore]> = results
            .iter()
            .map(|result| result.role_specific_scores.as_slice())
            .collect();

        let total_score = mean(results.iter().map(|result| result.total_score));

        Ok(UserEvaluationResult {
            user_id: template.user_id,
            user_role: template.user_role.clone(),
            self_directed_scores: average_dimensions(
                &template.self_directed_scores,
                &self_directed,
            ),
            role_specific_scores: average_dimensions(
                &template.role_specific_scores,
                &role_specific,
            ),
            total_score,
            max_total_score: template.max_total_score,
            overall_percentage: percentage(total_score, template.max_total_score),
        })
    }
}

fn average_dimensions(
    template: &[DimensionScore],
    sources: &[&[DimensionScore]],
) -> Vec<DimensionScore> {
    template
        .iter()
        .enumerate()
        .map(|(position, shape)| {
            let present: Vec<&DimensionScore> = sources
                .iter()
                .filter_map(|dimensions| matching_dimension(dimensions, position, shape))
                .collect();

            let question_scores = shape
                .question_scores
                .iter()
                .map(|question| QuestionScoreResult {
                    final_score: mean(
                        present
                            .iter()
                            .filter_map(|dimension| dimension.question(&question.question_code))
                            .map(|score| score.final_score),
                    ),
                    ..question.clone()
                })
                .collect();

            DimensionScore::with_totals(
                shape.dimension.clone(),
                mean(present.iter().map(|dimension| dimension.total_score)),
                shape.max_score,
                question_scores,
            )
        })
        .collect()
}

/// The dimension at `position` when it carries the template's name, otherwise the
/// first dimension of that name. Raters who skipped a whole dimension shift positions.
pub(super) fn matching_dimension<'a>(
    dimensions: &'a [DimensionScore],
    position: usize,
    shape: &DimensionScore,
) -> Option<&'a DimensionScore> {
    match dimensions.get(position) {
        Some(dimension) if dimension.dimension == shape.dimension => Some(dimension),
        _ => {
            let found = dimensions
                .iter()
                .find(|dimension| dimension.dimension == shape.dimension);
            if found.is_none() {
                debug!(dimension = %shape.dimension, "dimension missing from a result");
            }
            found
        }
    }
}

/// Arithmetic mean; callers always pass at least the template's own value.
fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
