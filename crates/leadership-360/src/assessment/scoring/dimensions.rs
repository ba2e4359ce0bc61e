use super::calculator::{RelevanceLookup, ScoreCalculator};
use crate::assessment::domain::{DimensionScore, Question, QuestionScoreResult, ResponseSet};

/// Rolls answered questions up into per-dimension totals.
#[derive(Debug, Clone, Copy, Default)]
pub struct DimensionAggregator {
    calculator: ScoreCalculator,
}

impl DimensionAggregator {
    pub fn new(calculator: ScoreCalculator) -> Self {
        Self { calculator }
    }

    /// Dimensions come out in order of first appearance in `questions`.
    /// Unanswered questions neither score nor raise the maximum.
    pub fn aggregate(
        &self,
        questions: &[Question],
        responses: &ResponseSet,
        lookup: Option<&RelevanceLookup>,
    ) -> Vec<DimensionScore> {
        let mut groups: Vec<(String, Vec<QuestionScoreResult>)> = Vec::new();

        for question in questions {
            let Some(raw) = responses.get(&question.code) else {
                continue;
            };
            let scored = self.calculator.score(question, raw, lookup);

            match groups
                .iter_mut()
                .find(|(dimension, _)| *dimension == question.dimension)
            {
                Some((_, scores)) => scores.push(scored),
                None => groups.push((question.dimension.clone(), vec![scored])),
            }
        }

        groups
            .into_iter()
            .map(|(dimension, scores)| DimensionScore::from_questions(dimension, scores))
            .collect()
    }
}
