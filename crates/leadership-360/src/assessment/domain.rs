use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::normalizer::normalize_label;

/// Highest answer on the Likert scale; every question is worth this many points.
pub const MAX_QUESTION_SCORE: f64 = LikertScore::MAX as f64;

/// Identifier wrapper for assessed users and respondents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Question number as printed on the questionnaire sheet.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionCode(pub String);

impl QuestionCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionCode {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A single answer on the 1..=5 agreement scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LikertScore(u8);

impl LikertScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, InvalidLikertScore> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidLikertScore(value))
        }
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// Mirror image on the scale, used for reverse-scored questions.
    pub const fn reversed(self) -> Self {
        Self(Self::MIN + Self::MAX - self.0)
    }
}

impl TryFrom<u8> for LikertScore {
    type Error = InvalidLikertScore;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LikertScore> for u8 {
    fn from(value: LikertScore) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("likert score {0} is outside the 1..=5 scale")]
pub struct InvalidLikertScore(pub u8);

/// How a raw answer maps onto the favourable direction of a trait.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringRule {
    #[default]
    Normal,
    Reverse,
}

impl ScoringRule {
    /// Accepts the labels used on catalog sheets; an empty label means normal scoring.
    pub fn from_label(value: &str) -> Option<Self> {
        match normalize_label(value).as_str() {
            "" | "normal" | "正向" | "正向计分" => Some(Self::Normal),
            "reverse" | "反向" | "反向计分" => Some(Self::Reverse),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "正向计分",
            Self::Reverse => "反向计分",
        }
    }
}

/// Seniority band of the assessed person; selects the role-specific questionnaire and weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleCategory {
    HighLevel,
    MidLevel,
    LowLevel,
}

impl RoleCategory {
    pub const fn ordered() -> [Self; 3] {
        [Self::HighLevel, Self::MidLevel, Self::LowLevel]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::HighLevel => "high_level",
            Self::MidLevel => "mid_level",
            Self::LowLevel => "low_level",
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::HighLevel => 0,
            Self::MidLevel => 1,
            Self::LowLevel => 2,
        }
    }
}

impl fmt::Display for RoleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Questionnaire a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Questionnaire {
    SelfDirected,
    RoleSpecific(RoleCategory),
}

impl Questionnaire {
    pub fn from_label(value: &str) -> Option<Self> {
        match normalize_label(value).as_str() {
            "self_directed" | "selfdirected" | "自主导向" => Some(Self::SelfDirected),
            "high_level" | "highlevel" | "高层" => {
                Some(Self::RoleSpecific(RoleCategory::HighLevel))
            }
            "mid_level" | "mediumlevel" | "中层" => {
                Some(Self::RoleSpecific(RoleCategory::MidLevel))
            }
            "low_level" | "lowlevel" | "基层" => Some(Self::RoleSpecific(RoleCategory::LowLevel)),
            _ => None,
        }
    }

    pub const fn is_self_directed(self) -> bool {
        matches!(self, Self::SelfDirected)
    }
}

/// Immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub code: QuestionCode,
    pub questionnaire: Questionnaire,
    pub dimension: String,
    pub sub_dimension: Option<String>,
    pub text: String,
    pub indicator_meaning: Option<String>,
    pub scoring_rule: ScoringRule,
    /// Self-directed question whose score is blended into this one.
    pub relevance: Option<QuestionCode>,
}

impl Question {
    pub fn is_self_directed(&self) -> bool {
        self.questionnaire.is_self_directed()
    }

    pub fn relevance(&self) -> Option<&QuestionCode> {
        self.relevance
            .as_ref()
            .filter(|code| !code.as_str().trim().is_empty())
    }
}

/// Relationship of a rater to the assessed person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipGroup {
    #[serde(alias = "自评", alias = "self")]
    SelfAssessment,
    #[serde(alias = "上级")]
    Superior,
    #[serde(alias = "平级")]
    Peer,
    #[serde(alias = "下级")]
    Subordinate,
}

impl RelationshipGroup {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::SelfAssessment,
            Self::Superior,
            Self::Peer,
            Self::Subordinate,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SelfAssessment => "自评",
            Self::Superior => "上级",
            Self::Peer => "平级",
            Self::Subordinate => "下级",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match normalize_label(value).as_str() {
            "自评" | "self" | "self_assessment" => Some(Self::SelfAssessment),
            "上级" | "superior" => Some(Self::Superior),
            "平级" | "peer" => Some(Self::Peer),
            "下级" | "subordinate" => Some(Self::Subordinate),
            _ => None,
        }
    }
}

impl fmt::Display for RelationshipGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One answer as captured on the questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResponse {
    pub question_code: QuestionCode,
    #[serde(default)]
    pub score: Option<LikertScore>,
    #[serde(default)]
    pub open_text: Option<String>,
}

/// Persisted answer row, tagged with the respondent who gave it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub respondent_id: UserId,
    pub question_code: QuestionCode,
    #[serde(default)]
    pub score: Option<LikertScore>,
    #[serde(default)]
    pub open_text: Option<String>,
    #[serde(default, deserialize_with = "relationship_label")]
    pub relationship: Option<RelationshipGroup>,
    #[serde(default)]
    pub answered_at: Option<DateTime<Utc>>,
}

fn relationship_label<'de, D>(deserializer: D) -> Result<Option<RelationshipGroup>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) => RelationshipGroup::from_label(label)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown relationship '{label}'"))),
    }
}

/// Scored answers of one respondent, keyed by question code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseSet {
    scores: BTreeMap<QuestionCode, LikertScore>,
}

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the scored answers; open-text-only answers carry nothing to score.
    pub fn from_raw<I>(responses: I) -> Self
    where
        I: IntoIterator<Item = RawResponse>,
    {
        responses
            .into_iter()
            .filter_map(|response| response.score.map(|score| (response.question_code, score)))
            .collect()
    }

    pub fn insert(&mut self, code: QuestionCode, score: LikertScore) -> Option<LikertScore> {
        self.scores.insert(code, score)
    }

    pub fn get(&self, code: &QuestionCode) -> Option<LikertScore> {
        self.scores.get(code).copied()
    }

    pub fn codes(&self) -> impl Iterator<Item = &QuestionCode> {
        self.scores.keys()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl FromIterator<(QuestionCode, LikertScore)> for ResponseSet {
    fn from_iter<T: IntoIterator<Item = (QuestionCode, LikertScore)>>(iter: T) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

/// Score of one answered question after reverse scoring and relevance blending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionScoreResult {
    pub question_code: QuestionCode,
    pub original_score: u8,
    pub final_score: f64,
    pub is_reversed: bool,
    pub relevance_applied: bool,
    pub relevant_question_code: Option<QuestionCode>,
    pub relevant_question_score: Option<f64>,
    pub sub_dimension: Option<String>,
    pub question_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub dimension: String,
    pub total_score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub question_scores: Vec<QuestionScoreResult>,
}

impl DimensionScore {
    /// Rolls up answered questions; `question_scores` must not be empty.
    pub fn from_questions(dimension: String, question_scores: Vec<QuestionScoreResult>) -> Self {
        let total_score = question_scores.iter().map(|score| score.final_score).sum();
        let max_score = question_scores.len() as f64 * MAX_QUESTION_SCORE;
        Self::with_totals(dimension, total_score, max_score, question_scores)
    }

    pub(crate) fn with_totals(
        dimension: String,
        total_score: f64,
        max_score: f64,
        question_scores: Vec<QuestionScoreResult>,
    ) -> Self {
        Self {
            dimension,
            total_score,
            max_score,
            percentage: percentage(total_score, max_score),
            question_scores,
        }
    }

    pub fn question(&self, code: &QuestionCode) -> Option<&QuestionScoreResult> {
        self.question_scores
            .iter()
            .find(|score| &score.question_code == code)
    }
}

/// Full result for one respondent (or a composite standing in for one).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserEvaluationResult {
    pub user_id: UserId,
    pub user_role: String,
    pub self_directed_scores: Vec<DimensionScore>,
    pub role_specific_scores: Vec<DimensionScore>,
    pub total_score: f64,
    pub max_total_score: f64,
    pub overall_percentage: f64,
}

/// Weighted 360-degree composite; same shape as a single respondent's result.
pub type WeightedResult = UserEvaluationResult;

impl UserEvaluationResult {
    pub fn dimensions(&self) -> impl Iterator<Item = &DimensionScore> {
        self.self_directed_scores
            .iter()
            .chain(self.role_specific_scores.iter())
    }
}

pub(crate) fn percentage(total: f64, max: f64) -> f64 {
    total / max * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn likert_score_rejects_values_outside_scale() {
        assert!(LikertScore::new(0).is_err());
        assert!(LikertScore::new(6).is_err());
        assert_eq!(LikertScore::new(2).expect("in range").reversed().value(), 4);
        assert!(serde_json::from_str::<LikertScore>("7").is_err());
    }

    #[test]
    fn response_set_skips_open_text_answers() {
        let responses = ResponseSet::from_raw(vec![
            RawResponse {
                question_code: QuestionCode::from("S1"),
                score: Some(LikertScore::new(4).expect("in range")),
                open_text: None,
            },
            RawResponse {
                question_code: QuestionCode::from("OPEN-1"),
                score: None,
                open_text: Some("More delegation".to_string()),
            },
        ]);

        assert_eq!(responses.len(), 1);
        assert!(responses.get(&QuestionCode::from("OPEN-1")).is_none());
    }

    #[test]
    fn response_record_reads_source_relationship_labels() {
        let json = r#"[
            {"respondent_id": 3, "question_code": "S1", "score": 4, "relationship": "上级"},
            {"respondent_id": 4, "question_code": "S1", "score": 2, "relationship": ""}
        ]"#;
        let records: Vec<ResponseRecord> = serde_json::from_str(json).expect("records parse");

        assert_eq!(records[0].relationship, Some(RelationshipGroup::Superior));
        assert_eq!(records[1].relationship, None);
        assert!(serde_json::from_str::<ResponseRecord>(
            r#"{"respondent_id": 1, "question_code": "S1", "relationship": "mentor"}"#
        )
        .is_err());
    }

    #[test]
    fn scoring_rule_labels_round_trip_through_catalog_terms() {
        assert_eq!(ScoringRule::from_label(""), Some(ScoringRule::Normal));
        assert_eq!(ScoringRule::from_label("反向计分"), Some(ScoringRule::Reverse));
        assert_eq!(ScoringRule::from_label("Reverse"), Some(ScoringRule::Reverse));
        assert_eq!(ScoringRule::from_label("sometimes"), None);
    }
}
