//! Plan expiration status deriver.
//!
//! Pure functions over already-fetched plan summaries: given a patient's
//! plans and an injected "today", decide whether a renewal nudge should be
//! shown and with which urgency tier. No I/O and no clock reads happen here;
//! callers pass `Local::now().date_naive()` at the edge so everything below
//! is deterministic under test.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::currency::format_brl;
use crate::types::{parse_calendar_date, PlanSummary};

/// Urgency tier for a plan's renewal nudge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Ok,
    Warning,
    Critical,
    DueToday,
    Expired,
}

/// Where the alert is rendered. List views only surface the two most urgent
/// tiers to avoid cluttering every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayContext {
    List,
    Detail,
}

/// What the alert asks the patient to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlertAction {
    /// A renewal is already under way: pay (external URL or in-app route) or
    /// update registration data.
    Pay { payment_url: String, update_url: String },
    /// No renewal started yet: fill the renewal form.
    FillForm { form_url: String },
    /// A previous renewal attempt lapsed: fill the form again.
    RefillForm { form_url: String },
}

/// Renewal alert shown on a patient's plan pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertPayload {
    pub plan_id: String,
    pub tier: Tier,
    pub days_remaining: Option<i64>,
    pub message: String,
    pub action: AlertAction,
    /// Set only for the `warning` tier, formatted as `R$ 97,00`.
    pub price_display: Option<String>,
}

/// Short label + icon tag shown next to a plan in list views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgePayload {
    pub plan_id: String,
    pub tier: Tier,
    pub label: String,
    pub icon: String,
}

/// Pick the plan whose renewal state matters: the one with the latest
/// non-null end date.
///
/// A plan without an end date is not comparable; it only wins when every
/// other plan also lacks one. Status is deliberately ignored, so a cancelled
/// or completed plan can still be the most recent.
pub fn select_relevant_plan(plans: &[PlanSummary]) -> Option<&PlanSummary> {
    plans.iter().reduce(|best, candidate| {
        match (best.parsed_end_date(), candidate.parsed_end_date()) {
            (None, Some(_)) => candidate,
            (Some(b), Some(c)) if c > b => candidate,
            _ => best,
        }
    })
}

/// True when any plan other than `selected_id` has an end date that is not
/// yet in the past. The nudge is only for patients whose single relevant
/// plan is about to lapse; a second live plan suppresses it entirely.
pub fn has_other_active_plan(plans: &[PlanSummary], selected_id: &str, today: NaiveDate) -> bool {
    plans
        .iter()
        .filter(|p| p.id != selected_id)
        .any(|p| matches!(days_remaining(p.parsed_end_date(), today), Some(d) if d >= 0))
}

/// Whole days from `today` until `target`, negative once past.
pub fn days_remaining(target: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    Some(target?.signed_duration_since(today).num_days())
}

/// Same as [`days_remaining`] but from a raw `YYYY-MM-DD` string. Malformed
/// input degrades to `None` rather than erroring.
pub fn days_remaining_str(target: Option<&str>, today: NaiveDate) -> Option<i64> {
    days_remaining(parse_calendar_date(target), today)
}

/// Map days-remaining to an urgency tier.
///
/// Precedence is encoded as one ordered match instead of nested branches so
/// the cutoffs stay unambiguous.
pub fn classify(days_remaining: Option<i64>) -> Tier {
    match days_remaining {
        None => Tier::Ok,
        Some(d) if d < 0 => Tier::Expired,
        Some(0) => Tier::DueToday,
        Some(d) if d <= 2 => Tier::Critical,
        Some(d) if d <= 5 => Tier::Warning,
        Some(_) => Tier::Ok,
    }
}

/// Derive the renewal alert for a patient's plan set, or `None` when nothing
/// should be shown.
pub fn render_alert(
    plans: &[PlanSummary],
    context: DisplayContext,
    today: NaiveDate,
    plan_price: f64,
) -> Option<AlertPayload> {
    let plan = select_relevant_plan(plans)?;
    if has_other_active_plan(plans, &plan.id, today) {
        return None;
    }

    let days = days_remaining(plan.parsed_end_date(), today);
    let tier = classify(days);

    let visible = match (context, tier) {
        (_, Tier::Ok) => false,
        (DisplayContext::List, Tier::DueToday | Tier::Expired) => true,
        (DisplayContext::List, _) => false,
        (DisplayContext::Detail, _) => true,
    };
    if !visible {
        return None;
    }

    let action = alert_action(plan, tier, today);
    let message = alert_message(tier, days, &action);
    let price_display = (tier == Tier::Warning).then(|| format_brl(plan_price));

    Some(AlertPayload {
        plan_id: plan.id.clone(),
        tier,
        days_remaining: days,
        message,
        action,
        price_display,
    })
}

/// Derive the short list badge, or `None`. Only the `expired`, `due_today`
/// and `critical` tiers produce a badge.
pub fn render_badge(plans: &[PlanSummary], today: NaiveDate) -> Option<BadgePayload> {
    let plan = select_relevant_plan(plans)?;
    if has_other_active_plan(plans, &plan.id, today) {
        return None;
    }

    let days = days_remaining(plan.parsed_end_date(), today);
    let (tier, label, icon) = match classify(days) {
        Tier::Expired => (Tier::Expired, "Expirado".to_string(), "alert-circle"),
        Tier::DueToday => (Tier::DueToday, "Vence hoje".to_string(), "alert-triangle"),
        Tier::Critical => {
            let d = days.unwrap_or(0);
            let label = if d == 1 {
                "Vence em 1 dia".to_string()
            } else {
                format!("Vence em {d} dias")
            };
            (Tier::Critical, label, "clock")
        }
        Tier::Warning | Tier::Ok => return None,
    };

    Some(BadgePayload {
        plan_id: plan.id.clone(),
        tier,
        label,
        icon: icon.to_string(),
    })
}

fn alert_action(plan: &PlanSummary, tier: Tier, today: NaiveDate) -> AlertAction {
    let form_url = format!("/plans/{}/renew", plan.id);
    let due = days_remaining(plan.parsed_due_date(), today);

    match due {
        // Renewal already in progress: the due date for the new plan is
        // still ahead, so steer the patient towards payment.
        Some(d) if d >= 0 => AlertAction::Pay {
            payment_url: plan
                .payment_url_new_meal_plan
                .clone()
                .unwrap_or_else(|| format!("/plans/{}/pay", plan.id)),
            update_url: "/me/settings".to_string(),
        },
        // The previous renewal attempt lapsed; only relevant once the plan
        // itself has expired.
        Some(_) if tier == Tier::Expired => AlertAction::RefillForm { form_url },
        _ => AlertAction::FillForm { form_url },
    }
}

fn alert_message(tier: Tier, days: Option<i64>, action: &AlertAction) -> String {
    let headline = match tier {
        Tier::Expired => "Seu plano alimentar expirou.".to_string(),
        Tier::DueToday => "Seu plano alimentar vence hoje.".to_string(),
        Tier::Critical | Tier::Warning => match days {
            Some(1) => "Seu plano alimentar vence em 1 dia.".to_string(),
            Some(d) => format!("Seu plano alimentar vence em {d} dias."),
            None => "Seu plano alimentar está prestes a vencer.".to_string(),
        },
        Tier::Ok => String::new(),
    };

    let instruction = match action {
        AlertAction::Pay { .. } => "Realize o pagamento ou atualize seus dados para continuar.",
        AlertAction::FillForm { .. } => "Preencha o formulário de renovação para continuar.",
        AlertAction::RefillForm { .. } => {
            "O prazo da renovação anterior passou. Preencha o formulário novamente."
        }
    };

    format!("{headline} {instruction}")
}
