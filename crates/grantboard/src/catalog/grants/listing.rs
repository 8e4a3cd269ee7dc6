use serde::Serialize;

use super::domain::Grant;

/// Badge text shown when a grant has no usable deadline.
pub const DEADLINE_FALLBACK: &str = "Deadline: TBA";

/// Display strings for one grant card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrantDisplay {
    pub id: String,
    pub title: String,
    pub description: String,
    pub funding_badge: String,
    pub deadline_badge: String,
    pub type_badge: String,
    pub location: String,
    pub details_path: String,
}

pub fn format_grant_for_display(grant: &Grant) -> GrantDisplay {
    let deadline_badge = match grant.deadline {
        Some(deadline) => deadline.format("%d-%m-%Y").to_string(),
        None => DEADLINE_FALLBACK.to_string(),
    };

    GrantDisplay {
        id: grant.id.clone(),
        title: grant.title.clone(),
        description: grant.description.clone(),
        funding_badge: grant.funding_label.clone(),
        deadline_badge,
        type_badge: grant.grant_type.clone(),
        location: grant.location.clone(),
        details_path: format!("/find-grants/{}", grant.id),
    }
}
