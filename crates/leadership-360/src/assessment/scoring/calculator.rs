use std::collections::HashMap;

use super::ScoringError;
use crate::assessment::catalog::QuestionSet;
use crate::assessment::domain::{
    DimensionScore, LikertScore, Question, QuestionCode, QuestionScoreResult, ScoringRule,
};

/// Final self-directed scores of one respondent, consulted for relevance blending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelevanceLookup {
    scores: HashMap<QuestionCode, f64>,
}

impl RelevanceLookup {
    pub fn from_dimensions(dimensions: &[DimensionScore]) -> Self {
        dimensions
            .iter()
            .flat_map(|dimension| dimension.question_scores.iter())
            .map(|score| (score.question_code.clone(), score.final_score))
            .collect()
    }

    pub fn get(&self, code: &QuestionCode) -> Option<f64> {
        self.scores.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl FromIterator<(QuestionCode, f64)> for RelevanceLookup {
    fn from_iter<T: IntoIterator<Item = (QuestionCode, f64)>>(iter: T) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

/// Scores a single answer: reverse scoring first, then at most one relevance blend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreCalculator {
    relevance_weight: f64,
}

impl ScoreCalculator {
    pub fn new(relevance_weight: f64) -> Self {
        Self { relevance_weight }
    }

    pub fn score(
        &self,
        question: &Question,
        raw: LikertScore,
        lookup: Option<&RelevanceLookup>,
    ) -> QuestionScoreResult {
        let is_reversed = question.scoring_rule == ScoringRule::Reverse;
        let mut final_score = if is_reversed {
            f64::from(raw.reversed().value())
        } else {
            f64::from(raw.value())
        };

        let mut relevance_applied = false;
        let mut relevant_question_code = None;
        let mut relevant_question_score = None;

        if !question.is_self_directed() {
            if let (Some(code), Some(lookup)) = (question.relevance(), lookup) {
                relevant_question_code = Some(code.clone());
                // an unanswered linked question leaves the own score standing
                if let Some(relevant) = lookup.get(code) {
                    final_score = relevant * self.relevance_weight
                        + final_score * (1.0 - self.relevance_weight);
                    relevance_applied = true;
                    relevant_question_score = Some(relevant);
                }
            }
        }

        QuestionScoreResult {
            question_code: question.code.clone(),
            original_score: raw.value(),
            final_score,
            is_reversed,
            relevance_applied,
            relevant_question_code,
            relevant_question_score,
            sub_dimension: question.sub_dimension.clone(),
            question_text: question.text.clone(),
        }
    }

    /// Looks the code up in an already fetched question set before scoring.
    pub fn score_code(
        &self,
        questions: &QuestionSet,
        code: &QuestionCode,
        raw: LikertScore,
        lookup: Option<&RelevanceLookup>,
    ) -> Result<QuestionScoreResult, ScoringError> {
        let question = questions
            .find(code)
            .ok_or_else(|| ScoringError::QuestionNotFound { code: code.clone() })?;
        Ok(self.score(question, raw, lookup))
    }
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new(super::DEFAULT_RELEVANCE_WEIGHT)
    }
}
