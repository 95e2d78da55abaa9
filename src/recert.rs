use chrono::{Months, NaiveDate};

use crate::record::Recertification;

pub const DATE_FORMAT: &str = "%d-%m-%Y";
/// Approval date recorded when the source value is missing or unreadable.
pub const UNKNOWN_APPROVAL_DATE: &str = "00-00-0000";
/// Due date for records whose approval date is unknown.
pub const EPOCH_DUE_DATE: &str = "01-01-2000";

const PLACEHOLDERS: &[&str] = &["", "tbd", "dd-mm-yyyy"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecertPolicy {
    pub offset_months: u32,
    pub window_months: u32,
}

impl Default for RecertPolicy {
    fn default() -> Self {
        RecertPolicy {
            offset_months: 10,
            window_months: 3,
        }
    }
}

pub fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `DD-MM-YYYY` approval date; placeholders and garbage give `None`.
pub fn parse_approval_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if PLACEHOLDERS.contains(&trimmed.to_lowercase().as_str()) {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok()
}

/// Derive due date, due month and the upcoming flag from an approval date.
/// Never fails: an unusable date yields the epoch sentinel triple.
pub fn calculate(raw_approval: &str, policy: &RecertPolicy, today: NaiveDate) -> Recertification {
    let due = parse_approval_date(raw_approval).and_then(|approved| {
        let due_date = approved.checked_add_months(Months::new(policy.offset_months))?;
        Some((approved, due_date))
    });

    let Some((approved, due_date)) = due else {
        return sentinel();
    };

    Recertification {
        basis_date: format_date(approved),
        due_date,
        due_month: due_date.format("%b").to_string(),
        upcoming: is_upcoming(due_date, today, policy.window_months),
    }
}

pub fn sentinel() -> Recertification {
    let due_date = epoch();
    Recertification {
        basis_date: UNKNOWN_APPROVAL_DATE.to_string(),
        due_date,
        due_month: due_date.format("%b").to_string(),
        upcoming: false,
    }
}

/// `today <= due <= today + window`, inclusive on both ends.
pub fn is_upcoming(due: NaiveDate, today: NaiveDate, window_months: u32) -> bool {
    let Some(horizon) = today.checked_add_months(Months::new(window_months)) else {
        return false;
    };
    today <= due && due <= horizon
}
