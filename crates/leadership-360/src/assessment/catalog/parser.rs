use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::CatalogError;
use crate::assessment::domain::{Question, QuestionCode, Questionnaire, ScoringRule};

/// Reads a catalog sheet with one question per row.
///
/// Expected headers: `questionnaire`, `dimension`, `sub_dimension`, `code`, `text`,
/// `indicator_meaning`, `relevance`, `scoring_rule`. Only the first five are required.
pub(crate) fn parse_questions<R: Read>(reader: R) -> Result<Vec<Question>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut questions = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|position| position.line()).unwrap_or(0);
        let row: CatalogRow = record.deserialize(Some(&headers))?;
        questions.push(row.into_question(line)?);
    }

    Ok(questions)
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    questionnaire: String,
    dimension: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    sub_dimension: Option<String>,
    code: String,
    text: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    indicator_meaning: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    relevance: Option<String>,
    #[serde(default)]
    scoring_rule: String,
}

impl CatalogRow {
    fn into_question(self, line: u64) -> Result<Question, CatalogError> {
        let questionnaire =
            Questionnaire::from_label(&self.questionnaire).ok_or_else(|| CatalogError::InvalidRow {
                line,
                reason: format!("unknown questionnaire '{}'", self.questionnaire),
            })?;
        let scoring_rule =
            ScoringRule::from_label(&self.scoring_rule).ok_or_else(|| CatalogError::InvalidRow {
                line,
                reason: format!("unknown scoring rule '{}'", self.scoring_rule),
            })?;

        if self.code.is_empty() {
            return Err(CatalogError::InvalidRow {
                line,
                reason: "question code is empty".to_string(),
            });
        }
        if self.dimension.is_empty() {
            return Err(CatalogError::InvalidRow {
                line,
                reason: format!("question {} has no dimension", self.code),
            });
        }

        Ok(Question {
            code: QuestionCode(self.code),
            questionnaire,
            dimension: self.dimension,
            sub_dimension: self.sub_dimension,
            text: self.text,
            indicator_meaning: self.indicator_meaning,
            scoring_rule,
            relevance: self.relevance.map(QuestionCode),
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
