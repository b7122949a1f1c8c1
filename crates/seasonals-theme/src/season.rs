//! Calendar-driven theme choice
//!
//! Rules are evaluated top to bottom and the first match wins. Several
//! windows overlap (Dec 29 is both "fireworks" and "december"), so the
//! order below is part of the behavior.

use chrono::Datelike;

/// Pick the theme for a month (0 = January) and day of month (1-31)
pub fn determine_theme_for_date(month: u32, day: u32) -> &'static str {
    // New year and early July
    if (month == 11 && day >= 29) || (month == 0 && day <= 3) || (month == 6 && (1..=5).contains(&day)) {
        return "fireworks";
    }

    if month == 1 && (10..=16).contains(&day) {
        return "hearts";
    }

    if month == 11 && (22..=27).contains(&day) {
        return "santa";
    }

    if month == 11 {
        return "snowflakes";
    }

    if month == 0 || month == 1 {
        return "snowfall";
    }

    if (month == 2 && day >= 25) || (month == 3 && day <= 25) {
        return "easter";
    }

    if (month == 9 && day >= 24) || (month == 10 && day <= 1) {
        return "halloween";
    }

    if (8..=10).contains(&month) {
        return "autumn";
    }

    "none"
}

/// Pick the theme for a calendar date
pub fn determine_theme(date: impl Datelike) -> &'static str {
    determine_theme_for_date(date.month0(), date.day())
}
