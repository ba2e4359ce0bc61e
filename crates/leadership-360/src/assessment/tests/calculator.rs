use super::common::*;
use crate::assessment::catalog::QuestionSet;
use crate::assessment::domain::{QuestionCode, Questionnaire, RoleCategory, ScoringRule};
use crate::assessment::scoring::{RelevanceLookup, ScoreCalculator, ScoringError};

#[test]
fn reverse_scored_answer_is_mirrored() {
    let calculator = ScoreCalculator::default();
    let question = question(
        "SD02",
        Questionnaire::SelfDirected,
        "自我认知",
        None,
        ScoringRule::Reverse,
        None,
    );

    let scored = calculator.score(&question, likert(2), None);

    assert_close(scored.final_score, 4.0);
    assert_eq!(scored.original_score, 2);
    assert!(scored.is_reversed);
    assert!(!scored.relevance_applied);
}

#[test]
fn role_specific_answer_blends_linked_self_directed_score() {
    let calculator = ScoreCalculator::default();
    let question = question(
        "M01",
        Questionnaire::RoleSpecific(RoleCategory::MidLevel),
        "沟通协调",
        None,
        ScoringRule::Normal,
        Some("SD01"),
    );
    let lookup: RelevanceLookup = [(QuestionCode::from("SD01"), 5.0)].into_iter().collect();

    let scored = calculator.score(&question, likert(3), Some(&lookup));

    assert_close(scored.final_score, 3.8);
    assert!(scored.relevance_applied);
    assert_eq!(scored.relevant_question_code, Some(QuestionCode::from("SD01")));
    assert_eq!(scored.relevant_question_score, Some(5.0));
}

#[test]
fn missing_linked_answer_leaves_score_unblended() {
    let calculator = ScoreCalculator::default();
    let question = question(
        "M01",
        Questionnaire::RoleSpecific(RoleCategory::MidLevel),
        "沟通协调",
        None,
        ScoringRule::Normal,
        Some("SD01"),
    );

    let scored = calculator.score(&question, likert(3), Some(&RelevanceLookup::default()));

    assert_close(scored.final_score, 3.0);
    assert!(!scored.relevance_applied);
    assert_eq!(scored.relevant_question_code, Some(QuestionCode::from("SD01")));
    assert_eq!(scored.relevant_question_score, None);
}

#[test]
fn self_directed_questions_never_blend() {
    let calculator = ScoreCalculator::default();
    let question = question(
        "SD03",
        Questionnaire::SelfDirected,
        "自我管理",
        None,
        ScoringRule::Normal,
        Some("SD01"),
    );
    let lookup: RelevanceLookup = [(QuestionCode::from("SD01"), 1.0)].into_iter().collect();

    let scored = calculator.score(&question, likert(5), Some(&lookup));

    assert_close(scored.final_score, 5.0);
    assert!(!scored.relevance_applied);
}

#[test]
fn reverse_then_blend_applies_each_step_once() {
    let calculator = ScoreCalculator::new(0.5);
    let question = question(
        "M09",
        Questionnaire::RoleSpecific(RoleCategory::MidLevel),
        "沟通协调",
        None,
        ScoringRule::Reverse,
        Some("SD01"),
    );
    let lookup: RelevanceLookup = [(QuestionCode::from("SD01"), 2.0)].into_iter().collect();

    // reversed 1 -> 5, then 0.5 * 2 + 0.5 * 5
    let scored = calculator.score(&question, likert(1), Some(&lookup));

    assert_close(scored.final_score, 3.5);
    assert!(scored.is_reversed);
}

#[test]
fn final_scores_stay_on_scale() {
    let calculator = ScoreCalculator::default();
    let question = question(
        "M01",
        Questionnaire::RoleSpecific(RoleCategory::MidLevel),
        "沟通协调",
        None,
        ScoringRule::Reverse,
        Some("SD01"),
    );

    for raw in 1..=5 {
        for relevant in [1.0, 2.5, 5.0] {
            let lookup: RelevanceLookup =
                [(QuestionCode::from("SD01"), relevant)].into_iter().collect();
            let scored = calculator.score(&question, likert(raw), Some(&lookup));
            assert!(scored.final_score > 1.0 - 1e-9 && scored.final_score < 5.0 + 1e-9);
        }
    }
}

#[test]
fn score_code_reports_unknown_codes() {
    let questions = QuestionSet::fetch(&catalog(), RoleCategory::MidLevel).expect("in memory");
    let calculator = ScoreCalculator::default();

    let scored = calculator
        .score_code(&questions, &QuestionCode::from("SD02"), likert(1), None)
        .expect("known code");
    assert_close(scored.final_score, 5.0);

    match calculator.score_code(&questions, &QuestionCode::from("X99"), likert(3), None) {
        Err(ScoringError::QuestionNotFound { code }) => assert_eq!(code.as_str(), "X99"),
        other => panic!("expected missing question, got {other:?}"),
    }
}
