use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{RelationshipGroup, RoleCategory};

/// Rows may drift from 1.0 by float rounding, nothing more.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Share of the 360 composite contributed by each rater group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelationshipWeights {
    pub superior: f64,
    pub peer: f64,
    pub subordinate: f64,
}

impl RelationshipWeights {
    pub const fn new(superior: f64, peer: f64, subordinate: f64) -> Self {
        Self {
            superior,
            peer,
            subordinate,
        }
    }

    /// Self-assessments are reported separately and never weighted.
    pub fn weight_for(&self, relationship: RelationshipGroup) -> Option<f64> {
        match relationship {
            RelationshipGroup::SelfAssessment => None,
            RelationshipGroup::Superior => Some(self.superior),
            RelationshipGroup::Peer => Some(self.peer),
            RelationshipGroup::Subordinate => Some(self.subordinate),
        }
    }

    pub fn sum(&self) -> f64 {
        self.superior + self.peer + self.subordinate
    }

    fn validate(&self, category: RoleCategory) -> Result<(), WeightTableError> {
        for (relationship, value) in [
            (RelationshipGroup::Superior, self.superior),
            (RelationshipGroup::Peer, self.peer),
            (RelationshipGroup::Subordinate, self.subordinate),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(WeightTableError::OutOfRange {
                    category,
                    relationship,
                    value,
                });
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightTableError::DoesNotSumToOne { category, sum });
        }

        Ok(())
    }
}

/// One line of a weight table file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightRow {
    pub role: RoleCategory,
    pub superior: f64,
    pub peer: f64,
    pub subordinate: f64,
}

/// Relationship weights per role category, validated on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleWeightTable {
    rows: [RelationshipWeights; 3],
}

impl RoleWeightTable {
    /// Weights used by the assessment programme unless a table file overrides them.
    pub fn standard() -> Self {
        Self {
            rows: [
                RelationshipWeights::new(0.5, 0.3, 0.2),
                RelationshipWeights::new(0.4, 0.4, 0.2),
                RelationshipWeights::new(0.3, 0.3, 0.4),
            ],
        }
    }

    pub fn from_rows<I>(rows: I) -> Result<Self, WeightTableError>
    where
        I: IntoIterator<Item = WeightRow>,
    {
        let mut slots: [Option<RelationshipWeights>; 3] = [None; 3];

        for row in rows {
            let weights = RelationshipWeights::new(row.superior, row.peer, row.subordinate);
            weights.validate(row.role)?;
            let slot = &mut slots[row.role.index()];
            if slot.is_some() {
                return Err(WeightTableError::DuplicateCategory(row.role));
            }
            *slot = Some(weights);
        }

        let mut table = Self::standard();
        for category in RoleCategory::ordered() {
            table.rows[category.index()] =
                slots[category.index()].ok_or(WeightTableError::MissingCategory(category))?;
        }
        Ok(table)
    }

    /// Reads a JSON array of [`WeightRow`]s.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, WeightTableError> {
        let rows: Vec<WeightRow> = serde_json::from_reader(reader)?;
        Self::from_rows(rows)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, WeightTableError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn weights_for(&self, category: RoleCategory) -> RelationshipWeights {
        self.rows[category.index()]
    }

    pub fn rows(&self) -> Vec<WeightRow> {
        RoleCategory::ordered()
            .into_iter()
            .map(|role| {
                let weights = self.weights_for(role);
                WeightRow {
                    role,
                    superior: weights.superior,
                    peer: weights.peer,
                    subordinate: weights.subordinate,
                }
            })
            .collect()
    }
}

impl Default for RoleWeightTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WeightTableError {
    #[error("weight table has no row for {0}")]
    MissingCategory(RoleCategory),
    #[error("weight table lists {0} more than once")]
    DuplicateCategory(RoleCategory),
    #[error("{category} weight for {relationship} must lie in [0, 1], got {value}")]
    OutOfRange {
        category: RoleCategory,
        relationship: RelationshipGroup,
        value: f64,
    },
    #[error("{category} weights sum to {sum:.4}, expected 1.0")]
    DoesNotSumToOne { category: RoleCategory, sum: f64 },
    #[error("failed to read weight table: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid weight table JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(role: RoleCategory, superior: f64, peer: f64, subordinate: f64) -> WeightRow {
        WeightRow {
            role,
            superior,
            peer,
            subordinate,
        }
    }

    #[test]
    fn standard_rows_sum_to_one() {
        let table = RoleWeightTable::standard();
        for category in RoleCategory::ordered() {
            assert!((table.weights_for(category).sum() - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
        }
        assert_eq!(
            RoleWeightTable::from_rows(table.rows()).expect("standard rows validate"),
            table
        );
    }

    #[test]
    fn self_assessment_carries_no_weight() {
        let weights = RoleWeightTable::standard().weights_for(RoleCategory::HighLevel);
        assert_eq!(weights.weight_for(RelationshipGroup::SelfAssessment), None);
        assert_eq!(weights.weight_for(RelationshipGroup::Superior), Some(0.5));
    }

    #[test]
    fn rejects_rows_that_do_not_sum_to_one() {
        let rows = vec![
            row(RoleCategory::HighLevel, 0.5, 0.3, 0.3),
            row(RoleCategory::MidLevel, 0.4, 0.4, 0.2),
            row(RoleCategory::LowLevel, 0.3, 0.3, 0.4),
        ];

        match RoleWeightTable::from_rows(rows) {
            Err(WeightTableError::DoesNotSumToOne { category, sum }) => {
                assert_eq!(category, RoleCategory::HighLevel);
                assert!((sum - 1.1).abs() < 1e-9);
            }
            other => panic!("expected sum violation, got {other:?}"),
        }
    }

    #[test]
    fn rejects_missing_and_negative_rows() {
        let missing = vec![
            row(RoleCategory::HighLevel, 0.5, 0.3, 0.2),
            row(RoleCategory::LowLevel, 0.3, 0.3, 0.4),
        ];
        assert!(matches!(
            RoleWeightTable::from_rows(missing),
            Err(WeightTableError::MissingCategory(RoleCategory::MidLevel))
        ));

        let negative = vec![row(RoleCategory::HighLevel, 1.2, -0.2, 0.0)];
        assert!(matches!(
            RoleWeightTable::from_rows(negative),
            Err(WeightTableError::OutOfRange { .. })
        ));
    }

    #[test]
    fn loads_json_rows() {
        let json = r#"[
            {"role": "high_level", "superior": 0.6, "peer": 0.2, "subordinate": 0.2},
            {"role": "mid_level", "superior": 0.4, "peer": 0.4, "subordinate": 0.2},
            {"role": "low_level", "superior": 0.3, "peer": 0.3, "subordinate": 0.4}
        ]"#;

        let table = RoleWeightTable::from_reader(json.as_bytes()).expect("table loads");
        assert_eq!(table.weights_for(RoleCategory::HighLevel).superior, 0.6);
    }
}
