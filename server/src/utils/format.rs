use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

pub const FREE: &str = "FREE";

/// The three renderings of a timestamp used across cards and detail pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedDateTime {
    /// `Mon, Oct 25, 8:30 PM`
    pub date_time: String,
    /// `Mon, Oct 25, 2023`
    pub date_only: String,
    /// `8:30 PM`
    pub time_only: String,
}

pub fn format_date_time(value: DateTime<Utc>) -> FormattedDateTime {
    FormattedDateTime {
        date_time: value.format("%a, %b %-d, %-I:%M %p").to_string(),
        date_only: value.format("%a, %b %-d, %Y").to_string(),
        time_only: value.format("%-I:%M %p").to_string(),
    }
}

pub fn price_label(is_free: bool, price: Decimal) -> String {
    if is_free {
        FREE.to_string()
    } else {
        format!("${}", price)
    }
}
