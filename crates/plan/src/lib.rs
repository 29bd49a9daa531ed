//! Meal plan domain types and the expiration status deriver.

pub mod currency;
pub mod expiration;
pub mod types;

pub use currency::format_brl;
pub use expiration::{
    classify, days_remaining, days_remaining_str, has_other_active_plan, render_alert,
    render_badge, select_relevant_plan, AlertAction, AlertPayload, BadgePayload, DisplayContext,
    Tier,
};
pub use types::{PlanStatus, PlanSummary};

/// Default price of a renewed meal plan, in BRL. Used when no price is
/// configured.
pub const DEFAULT_PLAN_PRICE: f64 = 97.0;
