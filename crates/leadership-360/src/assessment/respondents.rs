use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    LikertScore, QuestionCode, RelationshipGroup, ResponseRecord, ResponseSet, UserId,
};

/// Everything one rater answered about the assessed person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondentResponses {
    pub respondent_id: UserId,
    pub relationship: Option<RelationshipGroup>,
    pub responses: ResponseSet,
}

/// Groups persisted answer rows by respondent, in order of first appearance.
///
/// A later answer to the same question replaces an earlier one (by `answered_at` when
/// both rows carry it, by position otherwise). The last non-empty relationship label wins.
/// Respondents without a single scored answer are dropped.
pub fn assemble<I>(records: I) -> Vec<RespondentResponses>
where
    I: IntoIterator<Item = ResponseRecord>,
{
    let mut respondents: Vec<Pending> = Vec::new();

    for record in records {
        let position = match respondents
            .iter()
            .position(|pending| pending.respondent_id == record.respondent_id)
        {
            Some(position) => position,
            None => {
                respondents.push(Pending::new(record.respondent_id));
                respondents.len() - 1
            }
        };
        respondents[position].absorb(record);
    }

    respondents
        .into_iter()
        .filter_map(Pending::finish)
        .collect()
}

struct Pending {
    respondent_id: UserId,
    relationship: Option<RelationshipGroup>,
    answers: BTreeMap<QuestionCode, (Option<DateTime<Utc>>, LikertScore)>,
}

impl Pending {
    fn new(respondent_id: UserId) -> Self {
        Self {
            respondent_id,
            relationship: None,
            answers: BTreeMap::new(),
        }
    }

    fn absorb(&mut self, record: ResponseRecord) {
        if record.relationship.is_some() {
            self.relationship = record.relationship;
        }

        let Some(score) = record.score else {
            return;
        };
        let superseded = match self.answers.get(&record.question_code) {
            Some((Some(existing), _)) => match record.answered_at {
                Some(answered_at) => answered_at >= *existing,
                None => true,
            },
            _ => true,
        };
        if superseded {
            self.answers
                .insert(record.question_code, (record.answered_at, score));
        }
    }

    fn finish(self) -> Option<RespondentResponses> {
        if self.answers.is_empty() {
            return None;
        }
        Some(RespondentResponses {
            respondent_id: self.respondent_id,
            relationship: self.relationship,
            responses: self
                .answers
                .into_iter()
                .map(|(code, (_, score))| (code, score))
                .collect(),
        })
    }
}
