use std::cmp::Ordering;

use serde::Serialize;

use super::domain::Plan;

const PREMIUM: &str = "premium";
const BASIC: &str = "basic";

/// Placement of plans on the pricing page.
///
/// The desktop layout has three columns with the premium plan in the middle.
/// `rest` is the single-column order: premium first, then everything else.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Arrangement {
    pub left: Option<Plan>,
    pub center: Option<Plan>,
    pub right: Option<Plan>,
    pub rest: Vec<Plan>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanSlot {
    Left,
    Center,
    Right,
    Stacked,
}

impl PlanSlot {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Stacked => "stacked",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanCard {
    pub slot: PlanSlot,
    pub is_popular: bool,
    pub plan: Plan,
}

/// Splits `plans` into the premium plan and the rest, then fills the slots.
///
/// Only the first plan named "premium" is promoted; later duplicates stay with
/// the others. Plans named "basic" move behind every other plan while all
/// remaining plans keep their arrival order.
pub fn arrange_plans(plans: &[Plan]) -> Arrangement {
    let premium_index = plans.iter().position(|plan| plan.is_named(PREMIUM));
    let center = premium_index.map(|index| plans[index].clone());

    let mut others: Vec<Plan> = plans
        .iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != premium_index)
        .map(|(_, plan)| plan.clone())
        .collect();
    // sort_by is stable, so ties keep arrival order
    others.sort_by(basic_last);

    let right = others.first().cloned();
    let left = others.get(1).cloned();
    let rest = center.iter().cloned().chain(others).collect();

    Arrangement {
        left,
        center,
        right,
        rest,
    }
}

fn basic_last(a: &Plan, b: &Plan) -> Ordering {
    match (a.is_named(BASIC), b.is_named(BASIC)) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

impl Arrangement {
    pub fn is_empty(&self) -> bool {
        self.rest.is_empty()
    }

    /// Desktop cards in column order, skipping empty columns.
    pub fn cards(&self) -> Vec<PlanCard> {
        [
            (PlanSlot::Left, &self.left),
            (PlanSlot::Center, &self.center),
            (PlanSlot::Right, &self.right),
        ]
        .into_iter()
        .filter_map(|(slot, plan)| {
            plan.as_ref().map(|plan| PlanCard {
                slot,
                is_popular: slot == PlanSlot::Center,
                plan: plan.clone(),
            })
        })
        .collect()
    }

    /// Single-column cards; the premium plan leads and is highlighted.
    pub fn stacked(&self) -> Vec<PlanCard> {
        let has_center = self.center.is_some();
        self.rest
            .iter()
            .enumerate()
            .map(|(index, plan)| PlanCard {
                slot: PlanSlot::Stacked,
                is_popular: has_center && index == 0,
                plan: plan.clone(),
            })
            .collect()
    }
}
