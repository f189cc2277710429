use crate::error::AnalyticsError;
use chrono::{DateTime, Datelike, Month, Utc};
use core_types::MonthSelector;

/// Parses the `month` request parameter into a month number (1..=12).
///
/// A full English month name is tried first ("January", case-sensitive), then
/// a plain integer. Abbreviations and other casings are rejected.
pub fn parse_month(raw: &str) -> Result<u32, AnalyticsError> {
    if let Some(number) = month_number_from_name(raw) {
        return Ok(number);
    }

    match raw.trim().parse::<u32>() {
        Ok(number) if (1..=12).contains(&number) => Ok(number),
        _ => Err(AnalyticsError::InvalidMonth(raw.to_string())),
    }
}

fn month_number_from_name(raw: &str) -> Option<u32> {
    (1u8..=12)
        .filter_map(|n| Month::try_from(n).ok())
        .find(|m| m.name() == raw)
        .map(|m| m.number_from_month())
}

/// Builds the selector for a request made at `now`.
///
/// The year is always the year of `now`; the month defaults to the month of
/// `now` when the parameter is absent.
pub fn resolve_selector(
    month_param: Option<&str>,
    now: DateTime<Utc>,
) -> Result<MonthSelector, AnalyticsError> {
    match month_param {
        Some(raw) => Ok(MonthSelector::new(now.year(), parse_month(raw)?)?),
        None => Ok(MonthSelector::containing(now)),
    }
}
