use serde_json::Value;

use super::domain::{BillingCycle, Plan, PlanStatus};
use crate::catalog::normalize::{identified, text, text_list, NormalizationError, Record};

/// Builds a [`Plan`] from one raw record of the plan collection.
pub fn normalize_plan(raw: &Value) -> Result<Plan, NormalizationError> {
    let (record, id) = identified(raw)?;

    Ok(Plan {
        id,
        name: text(record, "name"),
        title: text(record, "title"),
        price: price(record),
        billing_cycle: BillingCycle::parse(&text(record, "billingCycle")),
        features: text_list(record, "features"),
        status: PlanStatus::parse(&text(record, "status")),
    })
}

fn price(record: &Record) -> f64 {
    let amount = match record.get("price") {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
        _ => None,
    };

    amount
        .filter(|value| value.is_finite() && *value >= 0.0)
        .unwrap_or(0.0)
}
