use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle status of a meal plan.
///
/// Status does NOT influence which plan the expiration deriver considers
/// "most relevant"; a cancelled plan with the latest end date still wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlanStatus {
    Active,
    Completed,
    Cancelled,
}

/// Read-only summary of a meal plan, as produced by the data layer.
///
/// Dates are kept as raw `YYYY-MM-DD` strings and parsed lazily: the UI must
/// stay resilient to bad data, so a malformed date degrades to "no date"
/// instead of failing the whole render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub id: String,
    pub end_date: Option<String>,
    pub due_date_new_meal_plan: Option<String>,
    pub payment_url_new_meal_plan: Option<String>,
    pub status: PlanStatus,
}

impl PlanSummary {
    /// End date parsed as a local calendar date. Malformed strings are `None`.
    pub fn parsed_end_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(self.end_date.as_deref())
    }

    /// Deadline for paying the renewal, parsed the same way as `end_date`.
    pub fn parsed_due_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(self.due_date_new_meal_plan.as_deref())
    }
}

/// Parse a `YYYY-MM-DD` string as a plain calendar date.
///
/// The string is never interpreted as UTC midnight; both it and "today" live
/// in the same local day reference frame, which avoids off-by-one tiers near
/// timezone boundaries.
pub fn parse_calendar_date(value: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value?, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trips_through_strings() {
        assert_eq!(PlanStatus::from_str("active").unwrap(), PlanStatus::Active);
        assert_eq!(PlanStatus::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn malformed_dates_parse_as_none() {
        assert!(parse_calendar_date(Some("not-a-date")).is_none());
        assert!(parse_calendar_date(Some("2025-13-40")).is_none());
        assert!(parse_calendar_date(None).is_none());
    }

    #[test]
    fn valid_date_parses() {
        let d = parse_calendar_date(Some("2025-01-10")).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
    }
}
