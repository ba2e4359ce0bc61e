use super::domain::RoleCategory;
use super::normalizer::normalize_label;
use super::scoring::ScoringError;

/// Every role title the organisation uses, folded to its lookup key.
const ROLE_ALIASES: &[(&str, RoleCategory)] = &[
    ("高层领导者", RoleCategory::HighLevel),
    ("总经理", RoleCategory::HighLevel),
    ("总经理-1", RoleCategory::HighLevel),
    ("high_level", RoleCategory::HighLevel),
    ("中层管理者", RoleCategory::MidLevel),
    ("总经理-2", RoleCategory::MidLevel),
    ("mid_level", RoleCategory::MidLevel),
    ("基层管理者", RoleCategory::LowLevel),
    ("一线管理者", RoleCategory::LowLevel),
    ("low_level", RoleCategory::LowLevel),
];

impl RoleCategory {
    /// Maps a user's role title onto its category.
    pub fn resolve(role: &str) -> Result<Self, ScoringError> {
        let key = normalize_label(role);
        ROLE_ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, category)| *category)
            .ok_or_else(|| ScoringError::UnsupportedRole {
                role: role.to_string(),
            })
    }
}
