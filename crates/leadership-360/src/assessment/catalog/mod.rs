//! Read-only access to question definitions.
//!
//! The catalog itself is owned elsewhere; scoring fetches each questionnaire once per
//! computation into a [`QuestionSet`] and works purely in memory from there.

mod parser;

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use super::domain::{Question, QuestionCode, Questionnaire, RoleCategory};

/// Source of question definitions (database, export file, fixture).
pub trait QuestionCatalog: Send + Sync {
    fn self_directed_questions(&self) -> Result<Vec<Question>, CatalogError>;
    fn role_specific_questions(&self, category: RoleCategory)
        -> Result<Vec<Question>, CatalogError>;
    fn find_question_by_code(&self, code: &QuestionCode) -> Result<Option<Question>, CatalogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("question catalog unavailable: {0}")]
    Unavailable(String),
    #[error("failed to read question catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid question catalog CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid catalog row at line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },
}

/// Catalog held entirely in memory, preserving sheet order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuestionCatalog {
    questions: Vec<Question>,
}

impl InMemoryQuestionCatalog {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    fn filtered(&self, questionnaire: Questionnaire) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|question| question.questionnaire == questionnaire)
            .cloned()
            .collect()
    }
}

impl QuestionCatalog for InMemoryQuestionCatalog {
    fn self_directed_questions(&self) -> Result<Vec<Question>, CatalogError> {
        Ok(self.filtered(Questionnaire::SelfDirected))
    }

    fn role_specific_questions(
        &self,
        category: RoleCategory,
    ) -> Result<Vec<Question>, CatalogError> {
        Ok(self.filtered(Questionnaire::RoleSpecific(category)))
    }

    fn find_question_by_code(&self, code: &QuestionCode) -> Result<Option<Question>, CatalogError> {
        Ok(self
            .questions
            .iter()
            .find(|question| &question.code == code)
            .cloned())
    }
}

pub struct QuestionCatalogImporter;

impl QuestionCatalogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<InMemoryQuestionCatalog, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<InMemoryQuestionCatalog, CatalogError> {
        let questions = parser::parse_questions(reader)?;
        Ok(InMemoryQuestionCatalog::new(questions))
    }
}

/// Both questionnaires a respondent answers about one assessed role, indexed by code.
#[derive(Debug, Clone)]
pub struct QuestionSet {
    category: RoleCategory,
    self_directed: Vec<Question>,
    role_specific: Vec<Question>,
    index: HashMap<QuestionCode, (Questionnaire, usize)>,
}

impl QuestionSet {
    pub fn new(
        category: RoleCategory,
        self_directed: Vec<Question>,
        role_specific: Vec<Question>,
    ) -> Self {
        let mut index = HashMap::with_capacity(self_directed.len() + role_specific.len());
        for (position, question) in role_specific.iter().enumerate() {
            index.insert(
                question.code.clone(),
                (Questionnaire::RoleSpecific(category), position),
            );
        }
        // a code present in both questionnaires resolves to the self-directed entry
        for (position, question) in self_directed.iter().enumerate() {
            index.insert(
                question.code.clone(),
                (Questionnaire::SelfDirected, position),
            );
        }

        Self {
            category,
            self_directed,
            role_specific,
            index,
        }
    }

    /// Single batched fetch of everything a computation for `category` needs.
    pub fn fetch<C>(catalog: &C, category: RoleCategory) -> Result<Self, CatalogError>
    where
        C: QuestionCatalog + ?Sized,
    {
        let self_directed = catalog.self_directed_questions()?;
        let role_specific = catalog.role_specific_questions(category)?;
        Ok(Self::new(category, self_directed, role_specific))
    }

    pub fn category(&self) -> RoleCategory {
        self.category
    }

    pub fn self_directed(&self) -> &[Question] {
        &self.self_directed
    }

    pub fn role_specific(&self) -> &[Question] {
        &self.role_specific
    }

    pub fn find(&self, code: &QuestionCode) -> Option<&Question> {
        self.index
            .get(code)
            .and_then(|(questionnaire, position)| match questionnaire {
                Questionnaire::SelfDirected => self.self_directed.get(*position),
                Questionnaire::RoleSpecific(_) => self.role_specific.get(*position),
            })
    }

    pub fn contains(&self, code: &QuestionCode) -> bool {
        self.index.contains_key(code)
    }
}
