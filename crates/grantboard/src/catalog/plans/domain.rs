use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub(crate) fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "yearly" | "annual" | "annually" => Self::Yearly,
            _ => Self::Monthly,
        }
    }

    pub const fn per_label(self) -> &'static str {
        match self {
            Self::Monthly => "month",
            Self::Yearly => "year",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Active,
    Inactive,
}

impl PlanStatus {
    pub(crate) fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("active") {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

/// A subscription plan offered on the pricing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub title: String,
    pub price: f64,
    pub billing_cycle: BillingCycle,
    pub features: Vec<String>,
    pub status: PlanStatus,
}

impl Plan {
    /// Case-insensitive comparison against a plan tier name.
    pub fn is_named(&self, tier: &str) -> bool {
        self.name.to_lowercase() == tier
    }
}
