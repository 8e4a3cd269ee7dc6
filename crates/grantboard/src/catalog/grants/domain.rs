use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantStatus {
    Open,
    Closed,
    Upcoming,
}

impl GrantStatus {
    /// Unrecognized values are treated as open so the grant stays listed.
    pub(crate) fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "closed" => Self::Closed,
            "upcoming" => Self::Upcoming,
            _ => Self::Open,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
            Self::Upcoming => "Upcoming",
        }
    }
}

/// A funding opportunity as published by the grant service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    pub id: String,
    pub title: String,
    pub description: String,
    pub grant_type: String,
    pub funding_label: String,
    pub industry: String,
    pub activity: String,
    pub location: String,
    pub image_url: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub status: GrantStatus,
    pub file_urls: Vec<String>,
}
