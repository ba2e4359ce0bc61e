//! Sub-dimension breakdown and strength / development-area classification of a result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{percentage, DimensionScore, UserEvaluationResult, MAX_QUESTION_SCORE};

/// Sub-dimension names used when a dimension's questions carry none of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubDimensionFallbacks {
    by_dimension: BTreeMap<String, Vec<String>>,
    default: Vec<String>,
}

impl SubDimensionFallbacks {
    pub fn new(by_dimension: BTreeMap<String, Vec<String>>, default: Vec<String>) -> Self {
        Self {
            by_dimension,
            default,
        }
    }

    pub fn standard() -> Self {
        let table: [(&str, [&str; 3]); 8] = [
            ("心智模式", ["思维开放性", "成长型思维", "学习能力"]),
            ("自我认知", ["优势认知", "不足认知", "行为动机"]),
            ("自我管理", ["情绪管理", "压力应对", "自我驱动"]),
            ("战略与远见", ["商业洞察", "战略规划", "创新能力"]),
            ("组织与文化", ["文化塑造", "人才培养", "决策与授权"]),
            ("资源利用能力", ["资源整合", "资源配置", "资源优化"]),
            ("危机韧性", ["风险识别", "应急处理", "恢复能力"]),
            ("沟通协调", ["沟通技巧", "协调能力", "影响力"]),
        ];

        let by_dimension = table
            .into_iter()
            .map(|(dimension, subs)| {
                (
                    dimension.to_string(),
                    subs.into_iter().map(str::to_string).collect(),
                )
            })
            .collect();
        let default = ["子维度1", "子维度2", "子维度3"]
            .into_iter()
            .map(str::to_string)
            .collect();

        Self::new(by_dimension, default)
    }

    pub fn fallback_for(&self, dimension: &str) -> &[String] {
        self.by_dimension
            .get(dimension)
            .filter(|subs| !subs.is_empty())
            .unwrap_or(&self.default)
    }
}

impl Default for SubDimensionFallbacks {
    fn default() -> Self {
        Self::standard()
    }
}

/// Percentage cut-offs for calling a dimension a strength or a development area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileThresholds {
    pub strength: f64,
    pub development: f64,
}

impl Default for ProfileThresholds {
    fn default() -> Self {
        Self {
            strength: 75.0,
            development: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubDimensionScore {
    pub parent_dimension: String,
    pub sub_dimension: String,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionHighlight {
    pub dimension: String,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
}

impl From<&DimensionScore> for DimensionHighlight {
    fn from(dimension: &DimensionScore) -> Self {
        Self {
            dimension: dimension.dimension.clone(),
            score: dimension.total_score,
            max_score: dimension.max_score,
            percentage: dimension.percentage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadershipProfile {
    pub dimensions: Vec<DimensionHighlight>,
    pub sub_dimensions: Vec<SubDimensionScore>,
    /// Highest percentage first.
    pub strengths: Vec<DimensionHighlight>,
    /// Lowest percentage first.
    pub development_areas: Vec<DimensionHighlight>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileAnalyzer {
    fallbacks: SubDimensionFallbacks,
    thresholds: ProfileThresholds,
}

impl ProfileAnalyzer {
    pub fn new(fallbacks: SubDimensionFallbacks, thresholds: ProfileThresholds) -> Self {
        Self {
            fallbacks,
            thresholds,
        }
    }

    pub fn analyze(&self, result: &UserEvaluationResult) -> LeadershipProfile {
        let (strengths, development_areas) = self.classify(result);
        LeadershipProfile {
            dimensions: result.dimensions().map(DimensionHighlight::from).collect(),
            sub_dimensions: self.sub_dimension_scores(result),
            strengths,
            development_areas,
        }
    }

    pub fn sub_dimension_scores(&self, result: &UserEvaluationResult) -> Vec<SubDimensionScore> {
        result
            .dimensions()
            .flat_map(|dimension| self.split_dimension(dimension))
            .collect()
    }

    fn split_dimension(&self, dimension: &DimensionScore) -> Vec<SubDimensionScore> {
        let mut groups: Vec<(&str, f64, usize)> = Vec::new();
        for question in &dimension.question_scores {
            let Some(sub) = question.sub_dimension.as_deref() else {
                continue;
            };
            match groups.iter_mut().find(|(name, _, _)| *name == sub) {
                Some((_, score, count)) => {
                    *score += question.final_score;
                    *count += 1;
                }
                None => groups.push((sub, question.final_score, 1)),
            }
        }

        if !groups.is_empty() {
            return groups
                .into_iter()
                .map(|(sub, score, count)| sub_score(dimension, sub, score, count))
                .collect();
        }

        let names = self.fallbacks.fallback_for(&dimension.dimension);
        if names.is_empty() || dimension.question_scores.is_empty() {
            return Vec::new();
        }
        let chunk = dimension.question_scores.len().div_ceil(names.len());
        names
            .iter()
            .zip(dimension.question_scores.chunks(chunk))
            .map(|(name, questions)| {
                let score = questions.iter().map(|question| question.final_score).sum();
                sub_score(dimension, name, score, questions.len())
            })
            .collect()
    }

    /// Splits dimensions of both questionnaires into strengths and development areas.
    pub fn classify(
        &self,
        result: &UserEvaluationResult,
    ) -> (Vec<DimensionHighlight>, Vec<DimensionHighlight>) {
        let mut strengths: Vec<DimensionHighlight> = result
            .dimensions()
            .filter(|dimension| dimension.percentage >= self.thresholds.strength)
            .map(DimensionHighlight::from)
            .collect();
        strengths.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

        let mut development_areas: Vec<DimensionHighlight> = result
            .dimensions()
            .filter(|dimension| dimension.percentage < self.thresholds.development)
            .map(DimensionHighlight::from)
            .collect();
        development_areas.sort_by(|a, b| a.percentage.total_cmp(&b.percentage));

        (strengths, development_areas)
    }
}

fn sub_score(parent: &DimensionScore, sub: &str, score: f64, count: usize) -> SubDimensionScore {
    let max_score = count as f64 * MAX_QUESTION_SCORE;
    SubDimensionScore {
        parent_dimension: parent.dimension.clone(),
        sub_dimension: sub.to_string(),
        score,
        max_score,
        percentage: percentage(score, max_score),
    }
}
