//! Strict records built from the loosely typed catalog API payloads.

pub mod grants;
mod normalize;
pub mod plans;

pub use grants::{format_grant_for_display, normalize_grant, Grant, GrantDisplay, GrantStatus};
pub use normalize::NormalizationError;
pub use plans::{
    arrange_plans, normalize_plan, Arrangement, BillingCycle, Plan, PlanCard, PlanSlot,
    PlanStatus,
};
