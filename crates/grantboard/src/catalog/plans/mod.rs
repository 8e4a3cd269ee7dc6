mod arrangement;
mod domain;
mod normalizer;

pub use arrangement::{arrange_plans, Arrangement, PlanCard, PlanSlot};
pub use domain::{BillingCycle, Plan, PlanStatus};
pub use normalizer::normalize_plan;
