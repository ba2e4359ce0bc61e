use crate::assessment::catalog::{CatalogError, InMemoryQuestionCatalog, QuestionCatalog};
use crate::assessment::domain::{
    DimensionScore, LikertScore, Question, QuestionCode, QuestionScoreResult, Questionnaire,
    RelationshipGroup, ResponseRecord, ResponseSet, RoleCategory, ScoringRule,
    UserEvaluationResult, UserId,
};
use crate::assessment::scoring::RespondentEvaluation;

pub(super) const MID_ROLE: &str = "中层管理者";
pub(super) const HIGH_ROLE: &str = "总经理";

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub(super) fn likert(value: u8) -> LikertScore {
    LikertScore::new(value).expect("fixture score on scale")
}

pub(super) fn question(
    code: &str,
    questionnaire: Questionnaire,
    dimension: &str,
    sub_dimension: Option<&str>,
    scoring_rule: ScoringRule,
    relevance: Option<&str>,
) -> Question {
    Question {
        code: QuestionCode::from(code),
        questionnaire,
        dimension: dimension.to_string(),
        sub_dimension: sub_dimension.map(str::to_string),
        text: format!("Statement {code}"),
        indicator_meaning: None,
        scoring_rule,
        relevance: relevance.map(QuestionCode::from),
    }
}

/// Three self-directed questions plus a handful of role-specific ones per band.
pub(super) fn catalog() -> InMemoryQuestionCatalog {
    let mid = Questionnaire::RoleSpecific(RoleCategory::MidLevel);
    InMemoryQuestionCatalog::new(vec![
        question(
            "SD01",
            Questionnaire::SelfDirected,
            "自我认知",
            Some("优势认知"),
            ScoringRule::Normal,
            None,
        ),
        question(
            "SD02",
            Questionnaire::SelfDirected,
            "自我认知",
            Some("不足认知"),
            ScoringRule::Reverse,
            None,
        ),
        question(
            "SD03",
            Questionnaire::SelfDirected,
            "自我管理",
            None,
            ScoringRule::Normal,
            None,
        ),
        question(
            "M01",
            mid,
            "沟通协调",
            Some("影响力"),
            ScoringRule::Normal,
            Some("SD01"),
        ),
        question(
            "M02",
            mid,
            "沟通协调",
            Some("协调能力"),
            ScoringRule::Normal,
            None,
        ),
        question("M03", mid, "组织与文化", None, ScoringRule::Normal, Some("SD02")),
        question(
            "H01",
            Questionnaire::RoleSpecific(RoleCategory::HighLevel),
            "战略与远见",
            None,
            ScoringRule::Normal,
            Some("SD03"),
        ),
        question(
            "L01",
            Questionnaire::RoleSpecific(RoleCategory::LowLevel),
            "危机韧性",
            None,
            ScoringRule::Normal,
            None,
        ),
    ])
}

pub(super) fn responses(answers: &[(&str, u8)]) -> ResponseSet {
    answers
        .iter()
        .map(|(code, score)| (QuestionCode::from(*code), likert(*score)))
        .collect()
}

/// Answers to every question a mid-level target is assessed on.
pub(super) fn mid_level_answers() -> ResponseSet {
    responses(&[
        ("SD01", 5),
        ("SD02", 2),
        ("SD03", 3),
        ("M01", 3),
        ("M02", 4),
        ("M03", 1),
    ])
}

pub(super) fn record(
    respondent: u64,
    code: &str,
    score: u8,
    relationship: Option<RelationshipGroup>,
) -> ResponseRecord {
    ResponseRecord {
        respondent_id: UserId(respondent),
        question_code: QuestionCode::from(code),
        score: Some(likert(score)),
        open_text: None,
        relationship,
        answered_at: None,
    }
}

/// One answer row per question, every answer `score`.
pub(super) fn uniform_records(
    respondent: u64,
    score: u8,
    relationship: Option<RelationshipGroup>,
) -> Vec<ResponseRecord> {
    ["SD01", "SD02", "SD03", "M01", "M02", "M03"]
        .into_iter()
        .map(|code| record(respondent, code, score, relationship))
        .collect()
}

/// Result with a single self-directed dimension holding one question worth `total`.
pub(super) fn synthetic_result(user_id: u64, total: f64, max: f64) -> UserEvaluationResult {
    let question = QuestionScoreResult {
        question_code: QuestionCode::from("SD01"),
        original_score: 0,
        final_score: total,
        is_reversed: false,
        relevance_applied: false,
        relevant_question_code: None,
        relevant_question_score: None,
        sub_dimension: Some("优势认知".to_string()),
        question_text: "Statement SD01".to_string(),
    };
    let dimension = DimensionScore {
        dimension: "自我认知".to_string(),
        total_score: total,
        max_score: max,
        percentage: total / max * 100.0,
        question_scores: vec![question],
    };

    UserEvaluationResult {
        user_id: UserId(user_id),
        user_role: HIGH_ROLE.to_string(),
        self_directed_scores: vec![dimension],
        role_specific_scores: Vec::new(),
        total_score: total,
        max_total_score: max,
        overall_percentage: total / max * 100.0,
    }
}

pub(super) fn rater(
    respondent: u64,
    relationship: Option<RelationshipGroup>,
    total: f64,
) -> RespondentEvaluation {
    RespondentEvaluation {
        respondent_id: UserId(respondent),
        relationship,
        result: synthetic_result(respondent, total, 50.0),
    }
}

pub(super) struct OfflineCatalog;

impl QuestionCatalog for OfflineCatalog {
    fn self_directed_questions(&self) -> Result<Vec<Question>, CatalogError> {
        Err(CatalogError::Unavailable("catalog database offline".to_string()))
    }

    fn role_specific_questions(
        &self,
        _category: RoleCategory,
    ) -> Result<Vec<Question>, CatalogError> {
        Err(CatalogError::Unavailable("catalog database offline".to_string()))
    }

    fn find_question_by_code(
        &self,
        _code: &QuestionCode,
    ) -> Result<Option<Question>, CatalogError> {
        Err(CatalogError::Unavailable("catalog database offline".to_string()))
    }
}
