use serde::{Deserialize, Serialize};

use super::domain::{
    RelationshipGroup, RoleCategory, UserEvaluationResult, UserId, WeightedResult,
};
use super::profile::LeadershipProfile;

/// Per-rater line of a 360 report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub respondent_id: UserId,
    pub relationship: Option<RelationshipGroup>,
    pub overall_percentage: f64,
}

/// Everything the reporting collaborator needs for one assessed person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation360 {
    pub target_user_id: UserId,
    pub target_role: String,
    pub category: RoleCategory,
    pub weighted: WeightedResult,
    pub total_weight_applied: f64,
    pub renormalized: bool,
    pub self_result: Option<UserEvaluationResult>,
    /// Average of every labelled rater other than the target.
    pub others_result: Option<UserEvaluationResult>,
    pub participants: Vec<ParticipantSummary>,
    pub excluded_respondents: Vec<UserId>,
    pub profile: LeadershipProfile,
}

impl Evaluation360 {
    pub fn participant_count(&self, relationship: RelationshipGroup) -> usize {
        self.participants
            .iter()
            .filter(|participant| participant.relationship == Some(relationship))
            .count()
    }
}
