//! Domain-specific shared validations and formatting utilities

use crate::calendar::Locale;
use crate::errors::AppError;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// February is 29 so that leap-day name days stay addressable in every year.
const DAYS_IN_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Parse an optional locale argument, defaulting to `sk` as the original
/// calendar service does.
pub fn normalize_locale(locale: Option<String>) -> Result<Locale, AppError> {
    let Some(value) = locale else {
        return Ok(Locale::Sk);
    };

    value.parse::<Locale>().map_err(|_| {
        AppError::bad_request(
            "invalid_locale",
            format!(
                "Invalid locale: {value}. Supported locales are: {}",
                Locale::supported_codes()
            ),
        )
    })
}

/// Validate a month/day pair and render it as e.g. `January 14`.
pub fn format_date(month: u32, day: u32) -> Result<String, AppError> {
    if !(1..=12).contains(&month) {
        return Err(AppError::bad_request(
            "invalid_month",
            format!("Invalid month: {month}. Month must be an integer between 1 and 12."),
        ));
    }

    if !(1..=31).contains(&day) {
        return Err(AppError::bad_request(
            "invalid_day",
            format!("Invalid day: {day}. Day must be an integer between 1 and 31."),
        ));
    }

    let max_day = DAYS_IN_MONTH[(month - 1) as usize];
    if day > max_day {
        return Err(AppError::bad_request(
            "invalid_day",
            format!(
                "Invalid day: {day} for month {month}. Maximum day for this month is {max_day}."
            ),
        ));
    }

    Ok(format!("{} {day}", MONTH_NAMES[(month - 1) as usize]))
}

/// The short `d.m.` form used for "today" answers across all locales.
pub fn format_short_date(month: u32, day: u32) -> String {
    format!("{day}.{month}.")
}
